//! Product filters
//!
//! A filter is a predicate over whole products. Variant conditions hold when
//! at least one embedded variant satisfies them.

use crate::schema::{Category, Product, VariantId};

/// A predicate over products
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every product
    All,
    /// `category` equals the value
    Category(Category),
    /// `name` equals the value exactly
    Name(String),
    /// Some variant has this color
    VariantColor(String),
    /// Some variant has this size
    VariantSize(String),
    /// Some variant has this id
    VariantId(VariantId),
    /// Some variant has `stock < threshold`
    StockBelow(i64),
    /// Some variant has `stock > threshold`
    StockAbove(i64),
    /// Every sub-filter holds
    And(Vec<Filter>),
}

impl Filter {
    /// Evaluate the filter against a product
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(category) => product.category == *category,
            Filter::Name(name) => product.name == *name,
            Filter::VariantColor(color) => product.variant_by_color(color).is_some(),
            Filter::VariantSize(size) => product.variants.iter().any(|v| v.size == *size),
            Filter::VariantId(id) => product.variant_by_id(*id).is_some(),
            Filter::StockBelow(threshold) => product
                .variants
                .iter()
                .any(|v| i64::from(v.stock) < *threshold),
            Filter::StockAbove(threshold) => product
                .variants
                .iter()
                .any(|v| i64::from(v.stock) > *threshold),
            Filter::And(filters) => filters.iter().all(|f| f.matches(product)),
        }
    }

    pub fn and(self, other: Filter) -> Filter {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            first => Filter::And(vec![first, other]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ProductSpec, VariantSpec};

    fn shoes() -> Product {
        let spec = ProductSpec::new("Running Shoes", 89.99, "Footwear")
            .with_variant(VariantSpec::new("Red", "M", 10))
            .with_variant(VariantSpec::new("Blue", "L", 5));
        Product::from_spec(spec, chrono::Utc::now()).unwrap()
    }

    fn phone() -> Product {
        let spec = ProductSpec::new("Smartphone", 699.99, "Electronics");
        Product::from_spec(spec, chrono::Utc::now()).unwrap()
    }

    #[test]
    fn test_scalar_fields() {
        let product = shoes();
        assert!(Filter::All.matches(&product));
        assert!(Filter::Category(Category::Footwear).matches(&product));
        assert!(!Filter::Category(Category::Apparel).matches(&product));
        assert!(Filter::Name("Running Shoes".into()).matches(&product));
        assert!(!Filter::Name("running shoes".into()).matches(&product));
    }

    #[test]
    fn test_variant_fields() {
        let product = shoes();
        assert!(Filter::VariantColor("Blue".into()).matches(&product));
        assert!(!Filter::VariantColor("Green".into()).matches(&product));
        assert!(Filter::VariantSize("M".into()).matches(&product));
        assert!(!Filter::VariantSize("S".into()).matches(&product));
        assert!(Filter::VariantId(product.variants[1].id).matches(&product));
        assert!(!Filter::VariantId(VariantId::new()).matches(&product));
    }

    #[test]
    fn test_stock_thresholds_are_strict() {
        let product = shoes();
        assert!(Filter::StockBelow(10).matches(&product)); // Blue/L/5
        assert!(!Filter::StockBelow(5).matches(&product));
        assert!(Filter::StockAbove(5).matches(&product)); // Red/M/10
        assert!(!Filter::StockAbove(10).matches(&product));
    }

    #[test]
    fn test_no_variants_never_match_variant_conditions() {
        let product = phone();
        assert!(!Filter::StockBelow(i64::MAX).matches(&product));
        assert!(!Filter::VariantColor("Black".into()).matches(&product));
    }

    #[test]
    fn test_and() {
        let product = shoes();
        let filter = Filter::Name("Running Shoes".into()).and(Filter::VariantColor("Blue".into()));
        assert!(filter.matches(&product));

        let filter = filter.and(Filter::VariantSize("XL".into()));
        assert!(matches!(&filter, Filter::And(fs) if fs.len() == 3));
        assert!(!filter.matches(&product));
    }
}
