//! 商品フォームの入力項目とカタログ参照データのモデル。

use serde::{Deserialize, Serialize};
use std::fmt;

/// フォーム上の入力項目の識別子。
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Title,
    Msrp,
    Moq,
    UnitPrice,
    PackPrice,
    Quantity,
    Description,
    Category,
    SubCategory,
    ProductType,
    BrandName,
    Sizes,
    Color,
}

impl Field {
    /// フォーム上の項目名（エラー表示のキー）。
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Msrp => "msrp",
            Field::Moq => "moq",
            Field::UnitPrice => "unitPrice",
            Field::PackPrice => "packPrice",
            Field::Quantity => "quantity",
            Field::Description => "description",
            Field::Category => "category",
            Field::SubCategory => "subCategory",
            Field::ProductType => "productType",
            Field::BrandName => "brandName",
            Field::Sizes => "size",
            Field::Color => "color",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 新規商品1件分の入力値。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldValues {
    /// 商品名（必須）。
    pub title: String,
    /// 希望小売価格。
    pub msrp: String,
    /// 最小発注数量。
    pub moq: String,
    /// 単価。
    pub unit_price: String,
    /// パック価格（送信時は discountPrice）。
    pub pack_price: String,
    /// 在庫数量。
    pub quantity: String,
    /// リッチテキストの説明文（エディタからそのまま受け取る）。
    pub description: String,
    /// カテゴリID（必須）。
    pub category: String,
    /// サブカテゴリID（必須）。
    pub sub_category: String,
    /// 商品タイプ（カテゴリ埋め込みの候補から選択）。
    pub product_type: String,
    /// ブランド名（送信時は brand）。
    pub brand_name: String,
    /// サイズ一覧（入力順を保持、重複なし）。
    pub sizes: Vec<String>,
    /// カラーID（必須）。
    pub color: String,
}

impl FieldValues {
    /// 単一値の項目を取得する。sizes は対象外。
    pub fn get(&self, field: Field) -> Option<&str> {
        let v = match field {
            Field::Title => &self.title,
            Field::Msrp => &self.msrp,
            Field::Moq => &self.moq,
            Field::UnitPrice => &self.unit_price,
            Field::PackPrice => &self.pack_price,
            Field::Quantity => &self.quantity,
            Field::Description => &self.description,
            Field::Category => &self.category,
            Field::SubCategory => &self.sub_category,
            Field::ProductType => &self.product_type,
            Field::BrandName => &self.brand_name,
            Field::Color => &self.color,
            Field::Sizes => return None,
        };
        Some(v.as_str())
    }

    /// 単一値の項目を書き換える。sizes を渡した場合は false を返す。
    pub fn set(&mut self, field: Field, value: String) -> bool {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Msrp => &mut self.msrp,
            Field::Moq => &mut self.moq,
            Field::UnitPrice => &mut self.unit_price,
            Field::PackPrice => &mut self.pack_price,
            Field::Quantity => &mut self.quantity,
            Field::Description => &mut self.description,
            Field::Category => &mut self.category,
            Field::SubCategory => &mut self.sub_category,
            Field::ProductType => &mut self.product_type,
            Field::BrandName => &mut self.brand_name,
            Field::Color => &mut self.color,
            Field::Sizes => return false,
        };
        *slot = value;
        true
    }

    /// サイズ一覧を置き換える。タグ入力と同じく空文字と重複は捨てる。
    pub fn set_sizes<I, S>(&mut self, sizes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes.clear();
        for s in sizes {
            let s = s.into().trim().to_string();
            if !s.is_empty() && !self.sizes.contains(&s) {
                self.sizes.push(s);
            }
        }
    }
}

/// カテゴリ（商品タイプ候補を内包する）。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// このカテゴリで選択できる商品タイプ。
    #[serde(rename = "productType", default)]
    pub product_types: Vec<String>,
}

/// カテゴリ配下のサブカテゴリ。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// 親カテゴリID（レスポンスに含まれない場合は空）。
    #[serde(default, deserialize_with = "parent_id")]
    pub category: String,
}

/// カラーの選択肢。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// 表示用のカラーコード（例: "#ff0000"）。
    #[serde(default)]
    pub code: String,
}

/// 作成された商品（サーバーのレスポンスから必要な部分のみ）。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreatedProduct {
    /// 作成された商品のID（取れなければ None）。
    pub id: Option<String>,
    /// レスポンス本体。
    pub raw: serde_json::Value,
}

/// 送信処理の状態。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// 未送信。
    #[default]
    Idle,
    /// 作成APIの応答待ち。
    Pending,
    /// 作成成功。
    Success,
    /// 失敗（ユーザー向けメッセージ付き）。
    Error(String),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }
}

/// 親カテゴリは ID 文字列か、展開済みのオブジェクトのどちらかで返る。
fn parent_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Parent {
        Id(String),
        Object {
            #[serde(rename = "_id")]
            id: String,
        },
        Null(()),
    }

    Ok(match Parent::deserialize(deserializer)? {
        Parent::Id(id) | Parent::Object { id } => id,
        Parent::Null(()) => String::new(),
    })
}
