//! The product document

use super::{
    price_value, required_trimmed, Category, ValidationError, Variant, VariantId, VariantSpec,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Primary key assigned by the store when a product is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A catalog product with its embedded variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: Category,
    #[serde(default)]
    pub variants: Vec<Variant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw product input, as found in the seed file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub variants: Vec<VariantSpec>,
}

impl ProductSpec {
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            category: Some(category.into()),
            variants: Vec::new(),
        }
    }

    pub fn with_variant(mut self, variant: VariantSpec) -> Self {
        self.variants.push(variant);
        self
    }
}

impl Product {
    /// Validate a raw product, assigning ids and timestamps
    ///
    /// Fields are checked in order (`name`, `price`, `category`, then each
    /// variant) and the first violation is returned.
    pub fn from_spec(spec: ProductSpec, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let name = required_trimmed("name", spec.name)?;

        let price = spec.price.ok_or_else(|| ValidationError::MissingRequired {
            field: "price".into(),
        })?;
        let price = price_value("price", price)?;

        let category = spec
            .category
            .ok_or_else(|| ValidationError::MissingRequired {
                field: "category".into(),
            })?
            .parse::<Category>()?;

        let variants = spec
            .variants
            .into_iter()
            .enumerate()
            .map(|(i, v)| Variant::from_spec_at(&format!("variants[{}].", i), v))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: ProductId::new(),
            name,
            price,
            category,
            variants,
            created_at: now,
            updated_at: now,
        })
    }

    /// Re-check invariants of a product read back from storage
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name".into() });
        }
        price_value("price", self.price)?;
        for (i, variant) in self.variants.iter().enumerate() {
            variant.check_at(&format!("variants[{}].", i))?;
        }
        Ok(())
    }

    /// Total stock across all variants
    pub fn total_stock(&self) -> u64 {
        self.variants.iter().map(|v| u64::from(v.stock)).sum()
    }

    /// First variant with the given color, if any
    pub fn variant_by_color(&self, color: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.color == color)
    }

    pub fn variant_by_id(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jacket() -> ProductSpec {
        ProductSpec::new("  Winter Jacket  ", 129.99, "Apparel")
            .with_variant(VariantSpec::new("Black", "S", 8))
            .with_variant(VariantSpec::new("Gray", "M", 12))
    }

    #[test]
    fn test_from_spec() {
        let now = Utc::now();
        let product = Product::from_spec(jacket(), now).unwrap();

        assert_eq!(product.name, "Winter Jacket");
        assert_eq!(product.category, Category::Apparel);
        assert_eq!(product.variants.len(), 2);
        assert_eq!(product.created_at, now);
        assert_eq!(product.updated_at, now);
        assert_eq!(product.total_stock(), 20);
    }

    #[test]
    fn test_variants_default_to_empty() {
        let spec: ProductSpec =
            serde_json::from_str(r#"{"name": "Smartphone", "price": 699.99, "category": "Electronics"}"#)
                .unwrap();
        let product = Product::from_spec(spec, Utc::now()).unwrap();
        assert!(product.variants.is_empty());
    }

    #[test]
    fn test_missing_fields() {
        let mut spec = jacket();
        spec.price = None;
        assert_eq!(
            Product::from_spec(spec, Utc::now()),
            Err(ValidationError::MissingRequired { field: "price".into() })
        );

        let mut spec = jacket();
        spec.category = None;
        assert_eq!(
            Product::from_spec(spec, Utc::now()).unwrap_err().field(),
            "category"
        );
    }

    #[test]
    fn test_invalid_category() {
        let mut spec = jacket();
        spec.category = Some("Toys".into());
        assert!(matches!(
            Product::from_spec(spec, Utc::now()),
            Err(ValidationError::InvalidCategory { value }) if value == "Toys"
        ));
    }

    #[test]
    fn test_negative_price() {
        let mut spec = jacket();
        spec.price = Some(-1.0);
        assert!(matches!(
            Product::from_spec(spec, Utc::now()),
            Err(ValidationError::Negative { field, .. }) if field == "price"
        ));
    }

    #[test]
    fn test_invalid_variant_is_named_by_position() {
        let spec = jacket().with_variant(VariantSpec::new("Navy", "L", -1));
        let err = Product::from_spec(spec, Utc::now()).unwrap_err();
        assert_eq!(err.field(), "variants[2].stock");
    }

    #[test]
    fn test_serialized_field_names() {
        let product = Product::from_spec(jacket(), Utc::now()).unwrap();
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json["variants"][0].get("_id").is_some());
        assert_eq!(json["category"], "Apparel");
    }

    #[test]
    fn test_product_id_parse() {
        let id = ProductId::new();
        assert_eq!(id.to_string().parse::<ProductId>().unwrap(), id);
        assert!("not-a-uuid".parse::<ProductId>().is_err());
    }
}
