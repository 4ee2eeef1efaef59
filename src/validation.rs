//! Required-field rules for the product form.

use std::collections::BTreeMap;

use crate::model::{Field, FieldValues};

/// Per-field error messages, empty when the snapshot passes.
pub type FieldErrors = BTreeMap<Field, &'static str>;

/// Check a snapshot against the form rules.
///
/// Only presence is checked. The numeric inputs (msrp, moq, prices, quantity) are free text
/// here and pass unconditionally.
pub fn validate(values: &FieldValues) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if values.title.is_empty() {
        errors.insert(Field::Title, "Title is required");
    }
    if values.category.is_empty() {
        errors.insert(Field::Category, "Category is required");
    }
    if values.sub_category.is_empty() {
        errors.insert(Field::SubCategory, "Sub-category is required");
    }
    if values.sizes.is_empty() {
        errors.insert(Field::Sizes, "At least one size is required");
    }
    if values.color.is_empty() {
        errors.insert(Field::Color, "Color is required");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> FieldValues {
        let mut v = FieldValues {
            title: "Runner".into(),
            category: "cat-shoes".into(),
            sub_category: "sub-boots".into(),
            color: "c1".into(),
            ..Default::default()
        };
        v.set_sizes(["42"]);
        v
    }

    #[test]
    fn test_complete_values_pass() {
        assert!(validate(&complete()).is_empty());
    }

    #[test]
    fn test_empty_title_is_the_only_error() {
        let mut v = complete();
        v.title.clear();
        let errors = validate(&v);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(&Field::Title), Some(&"Title is required"));
    }

    #[test]
    fn test_defaults_report_every_required_field() {
        let errors = validate(&FieldValues::default());
        let fields: Vec<Field> = errors.keys().copied().collect();
        assert_eq!(
            fields,
            vec![
                Field::Title,
                Field::Category,
                Field::SubCategory,
                Field::Sizes,
                Field::Color
            ]
        );
    }

    #[test]
    fn test_numeric_fields_are_not_checked() {
        let mut v = complete();
        v.msrp = "not a number".into();
        v.quantity = "-3".into();
        assert!(validate(&v).is_empty());
    }
}
