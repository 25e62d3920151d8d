//! Embedded product variants

use super::{required_string, stock_count, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier assigned to a variant when it is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(Uuid);

impl VariantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VariantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for VariantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A color/size/stock combination embedded in a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(rename = "_id")]
    pub id: VariantId,
    pub color: String,
    pub size: String,
    pub stock: u32,
}

/// Raw variant input, as found in seed files and CLI arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSpec {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
}

impl VariantSpec {
    pub fn new(color: impl Into<String>, size: impl Into<String>, stock: i64) -> Self {
        Self {
            color: Some(color.into()),
            size: Some(size.into()),
            stock: Some(stock),
        }
    }
}

impl Variant {
    /// Validate a raw variant and assign it a fresh identifier
    pub fn from_spec(spec: VariantSpec) -> Result<Self, ValidationError> {
        Self::from_spec_at("", spec)
    }

    /// Like `from_spec`, naming fields relative to `prefix` (e.g. `variants[2].`)
    pub(crate) fn from_spec_at(prefix: &str, spec: VariantSpec) -> Result<Self, ValidationError> {
        let field = |name: &str| format!("{}{}", prefix, name);

        let color = required_string(&field("color"), spec.color)?;
        let size = required_string(&field("size"), spec.size)?;
        let stock = spec.stock.ok_or_else(|| ValidationError::MissingRequired {
            field: field("stock"),
        })?;
        let stock = stock_count(&field("stock"), stock)?;

        Ok(Self {
            id: VariantId::new(),
            color,
            size,
            stock,
        })
    }

    /// Re-check invariants of a variant read back from storage
    pub(crate) fn check_at(&self, prefix: &str) -> Result<(), ValidationError> {
        for (name, value) in [("color", &self.color), ("size", &self.size)] {
            if value.trim().is_empty() {
                return Err(ValidationError::Empty {
                    field: format!("{}{}", prefix, name),
                });
            }
        }
        Ok(())
    }
}
