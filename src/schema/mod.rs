//! Catalog schema: products, embedded variants, and their validation rules
//!
//! The schema defines:
//! - The `Product` document and its embedded `Variant` sequence
//! - The fixed set of categories
//! - Construction functions that turn raw input (`ProductSpec`, `VariantSpec`)
//!   into valid values or fail with a field-level `ValidationError`
//! - The secondary indexes every store must provide
//!
//! Raw input mirrors the seed file format:
//!
//! ```json
//! {
//!   "name": "Running Shoes",
//!   "price": 89.99,
//!   "category": "Footwear",
//!   "variants": [{ "color": "Red", "size": "M", "stock": 10 }]
//! }
//! ```

mod category;
mod index;
mod product;
mod variant;

pub use category::Category;
pub use index::{IndexKind, IndexSpec, INDEXES};
pub use product::{Product, ProductId, ProductSpec};
pub use variant::{Variant, VariantId, VariantSpec};

/// Field-level constraint violation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Field '{field}' cannot be empty")]
    Empty { field: String },

    #[error("Invalid category '{value}': expected one of {}", Category::names())]
    InvalidCategory { value: String },

    #[error("Field '{field}' cannot be negative (got {value})")]
    Negative { field: String, value: String },

    #[error("Field '{field}' must be a finite number")]
    NotFinite { field: String },

    #[error("Field '{field}' is out of range (got {value})")]
    OutOfRange { field: String, value: String },
}

impl ValidationError {
    /// Name of the offending field (`variants[1].stock` for nested fields)
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingRequired { field }
            | ValidationError::Empty { field }
            | ValidationError::Negative { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::OutOfRange { field, .. } => field,
            ValidationError::InvalidCategory { .. } => "category",
        }
    }
}

/// Require a string field, rejecting missing or blank values
pub(crate) fn required_string(field: &str, value: Option<String>) -> Result<String, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::MissingRequired {
        field: field.to_string(),
    })?;
    if value.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Require a string field and trim surrounding whitespace
pub(crate) fn required_trimmed(field: &str, value: Option<String>) -> Result<String, ValidationError> {
    required_string(field, value).map(|s| s.trim().to_string())
}

/// Check a stock count, rejecting negatives instead of clamping
pub fn stock_count(field: &str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Check a price, rejecting negatives and non-finite values
pub(crate) fn price_value(field: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trimmed() {
        assert_eq!(
            required_trimmed("name", Some("  Winter Jacket ".into())).unwrap(),
            "Winter Jacket"
        );
        assert_eq!(required_string("color", Some(" Red".into())).unwrap(), " Red");
    }

    #[test]
    fn test_required_string_rejects_missing_and_blank() {
        assert_eq!(
            required_string("name", None),
            Err(ValidationError::MissingRequired { field: "name".into() })
        );
        assert_eq!(
            required_string("name", Some("   ".into())),
            Err(ValidationError::Empty { field: "name".into() })
        );
    }

    #[test]
    fn test_stock_count() {
        assert_eq!(stock_count("stock", 0), Ok(0));
        assert_eq!(stock_count("stock", 12), Ok(12));
        assert!(matches!(
            stock_count("stock", -1),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            stock_count("stock", i64::MAX),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_price_value() {
        assert_eq!(price_value("price", 0.0), Ok(0.0));
        assert!(matches!(
            price_value("price", -0.01),
            Err(ValidationError::Negative { .. })
        ));
        assert!(matches!(
            price_value("price", f64::NAN),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_error_names_field() {
        let err = ValidationError::Negative {
            field: "variants[1].stock".into(),
            value: "-3".into(),
        };
        assert_eq!(err.field(), "variants[1].stock");
        assert_eq!(
            err.to_string(),
            "Field 'variants[1].stock' cannot be negative (got -3)"
        );
    }
}
