//! Projections: returning part of a product

use crate::schema::{Category, Product, ProductId};
use serde::Serialize;

/// Keep only the first variant with the given color
///
/// Products without such a variant come back with no variants.
pub fn first_variant_with_color(mut product: Product, color: &str) -> Product {
    let first = product.variants.iter().position(|v| v.color == color);
    product.variants = match first {
        Some(i) => vec![product.variants.swap_remove(i)],
        None => Vec::new(),
    };
    product
}

/// Color and size of a variant, without stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantLabel {
    pub color: String,
    pub size: String,
}

/// Listing view of a product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub variants: Vec<VariantLabel>,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            category: product.category,
            variants: product
                .variants
                .iter()
                .map(|v| VariantLabel {
                    color: v.color.clone(),
                    size: v.size.clone(),
                })
                .collect(),
        }
    }
}
