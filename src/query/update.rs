//! Variant mutations
//!
//! Updates address the embedded variant sequence by color or by variant id.
//! By color, setting stock touches only the first variant with the color and
//! pulling removes every variant with it. By id, exactly one variant is
//! addressed. Sibling variants are left exactly as they were.

use crate::schema::{Product, Variant, VariantId};

/// A single-document update applied to the embedded variants
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Append a variant
    PushVariant(Variant),
    /// Set the stock of the first variant with this color
    SetFirstVariantStock { color: String, stock: u32 },
    /// Remove all variants with this color
    PullVariants { color: String },
    /// Set the stock of the variant with this id
    SetVariantStockById { id: VariantId, stock: u32 },
    /// Remove the variant with this id
    PullVariantById { id: VariantId },
}

impl Update {
    /// Apply the update, returning how many variants it touched
    pub fn apply(&self, product: &mut Product) -> usize {
        match self {
            Update::PushVariant(variant) => {
                product.variants.push(variant.clone());
                1
            }
            Update::SetFirstVariantStock { color, stock } => {
                match product.variants.iter_mut().find(|v| v.color == *color) {
                    Some(variant) => {
                        variant.stock = *stock;
                        1
                    }
                    None => 0,
                }
            }
            Update::PullVariants { color } => {
                let before = product.variants.len();
                product.variants.retain(|v| v.color != *color);
                before - product.variants.len()
            }
            Update::SetVariantStockById { id, stock } => {
                match product.variants.iter_mut().find(|v| v.id == *id) {
                    Some(variant) => {
                        variant.stock = *stock;
                        1
                    }
                    None => 0,
                }
            }
            Update::PullVariantById { id } => {
                match product.variants.iter().position(|v| v.id == *id) {
                    Some(i) => {
                        product.variants.remove(i);
                        1
                    }
                    None => 0,
                }
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Update::PushVariant(variant) => {
                format!("push variant {}/{}", variant.color, variant.size)
            }
            Update::SetFirstVariantStock { color, stock } => {
                format!("set {} stock to {}", color, stock)
            }
            Update::PullVariants { color } => format!("pull {} variants", color),
            Update::SetVariantStockById { id, stock } => {
                format!("set variant {} stock to {}", id, stock)
            }
            Update::PullVariantById { id } => format!("pull variant {}", id),
        }
    }
}
