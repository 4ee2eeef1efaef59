//! Multipart body for the create-product call.

use reqwest::multipart::{Form, Part};

use crate::{images::StagedFile, model::FieldValues};

/// Value of one multipart entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File(StagedFile),
}

/// Ordered multipart entries; keys may repeat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductPayload {
    parts: Vec<(&'static str, PartValue)>,
}

impl ProductPayload {
    /// Build the body from a values snapshot and the staged files.
    pub fn assemble<'a, I>(values: &FieldValues, files: I) -> Self
    where
        I: IntoIterator<Item = &'a StagedFile>,
    {
        let mut p = Self::default();

        for file in files {
            p.push("images", PartValue::File(file.clone()));
        }

        // Backend keys differ from form names for packPrice and brandName.
        let scalars = [
            ("title", &values.title),
            ("msrp", &values.msrp),
            ("moq", &values.moq),
            ("unitPrice", &values.unit_price),
            ("discountPrice", &values.pack_price),
            ("quantity", &values.quantity),
            ("description", &values.description),
            ("category", &values.category),
            ("subCategory", &values.sub_category),
            ("productType", &values.product_type),
            ("brand", &values.brand_name),
        ];
        for (key, value) in scalars {
            if !value.is_empty() {
                p.push(key, PartValue::Text(value.clone()));
            }
        }

        for size in &values.sizes {
            p.push("sizes[]", PartValue::Text(size.clone()));
        }
        // One color per product even though the key is a list.
        if !values.color.is_empty() {
            p.push("colors[]", PartValue::Text(values.color.clone()));
        }

        p
    }

    fn push(&mut self, key: &'static str, value: PartValue) {
        self.parts.push((key, value));
    }

    pub fn parts(&self) -> &[(&'static str, PartValue)] {
        &self.parts
    }

    /// Text values stored under `key`, in insertion order.
    pub fn texts(&self, key: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter(|(k, _)| *k == key)
            .filter_map(|(_, v)| match v {
                PartValue::Text(s) => Some(s.as_str()),
                PartValue::File(_) => None,
            })
            .collect()
    }

    /// Files stored under `key`, in insertion order.
    pub fn files(&self, key: &str) -> Vec<&StagedFile> {
        self.parts
            .iter()
            .filter(|(k, _)| *k == key)
            .filter_map(|(_, v)| match v {
                PartValue::File(f) => Some(f),
                PartValue::Text(_) => None,
            })
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.parts.iter().any(|(k, _)| *k == key)
    }

    /// Convert into a reqwest multipart form.
    pub fn into_form(self) -> reqwest::Result<Form> {
        let mut form = Form::new();
        for (key, value) in self.parts {
            form = match value {
                PartValue::Text(s) => form.text(key, s),
                PartValue::File(f) => form.part(
                    key,
                    Part::bytes(f.bytes).file_name(f.name).mime_str(&f.mime)?,
                ),
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> FieldValues {
        let mut v = FieldValues {
            title: "Runner".into(),
            category: "cat-shoes".into(),
            sub_category: "sub-boots".into(),
            color: "c1".into(),
            pack_price: "9.99".into(),
            brand_name: "Acme".into(),
            ..Default::default()
        };
        v.set_sizes(["S", "M"]);
        v
    }

    #[test]
    fn test_wire_keys_for_sizes_color_and_pack_price() {
        let p = ProductPayload::assemble(&values(), std::iter::empty());

        assert_eq!(p.texts("sizes[]"), vec!["S", "M"]);
        assert_eq!(p.texts("colors[]"), vec!["c1"]);
        assert_eq!(p.texts("discountPrice"), vec!["9.99"]);
        assert!(!p.contains("packPrice"));
        assert_eq!(p.texts("brand"), vec!["Acme"]);
        assert!(!p.contains("brandName"));
    }

    #[test]
    fn test_empty_optionals_are_omitted() {
        let p = ProductPayload::assemble(&values(), std::iter::empty());
        for key in ["msrp", "moq", "unitPrice", "quantity", "description", "productType"] {
            assert!(!p.contains(key), "{key} should be absent");
        }
        assert_eq!(p.texts("title"), vec!["Runner"]);
    }

    #[test]
    fn test_one_images_entry_per_file_in_order() {
        let files = [
            StagedFile::new("a.png", "image/png", vec![1]),
            StagedFile::new("b.jpg", "image/jpeg", vec![2]),
        ];
        let p = ProductPayload::assemble(&values(), files.iter());
        let names: Vec<&str> = p.files("images").iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn test_into_form_accepts_valid_mime() {
        let files = [StagedFile::new("a.png", "image/png", vec![1, 2, 3])];
        let p = ProductPayload::assemble(&values(), files.iter());
        assert!(p.into_form().is_ok());
    }
}
