//! 一括登録用の商品ドラフトファイル（TOML）。

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// ドラフト1件。カテゴリ・サブカテゴリ・カラーはIDでも名前でも指定できる。
#[derive(Debug, Clone, Deserialize)]
pub struct Draft {
    pub title: String,
    #[serde(default)]
    pub msrp: String,
    #[serde(default)]
    pub moq: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    pub pack_price: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub sub_category: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub sizes: Vec<String>,
    pub color: String,
    /// 画像パス（相対パスはドラフトファイルの場所から解決する）。
    #[serde(default)]
    pub images: Vec<PathBuf>,
}

impl Draft {
    /// ファイルから読み込む。
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("failed to read draft {}", path.display()))?;
        Ok(toml::from_str(&s)?)
    }
}

/// IDの完全一致を優先し、次に名前（大文字小文字無視）で探す。
pub fn lookup<'a, I>(needle: &str, items: I) -> Option<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)> + Clone,
{
    let needle = needle.trim();
    items
        .clone()
        .into_iter()
        .find(|(id, _)| *id == needle)
        .or_else(|| {
            items
                .into_iter()
                .find(|(_, name)| name.eq_ignore_ascii_case(needle))
        })
        .map(|(id, _)| id.to_string())
}
