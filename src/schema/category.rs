//! Product categories

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of categories a product may belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Apparel,
    Electronics,
    Footwear,
    Accessories,
    Home,
}

impl Category {
    /// All categories, in declaration order
    pub const ALL: [Category; 5] = [
        Category::Apparel,
        Category::Electronics,
        Category::Footwear,
        Category::Accessories,
        Category::Home,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Apparel => "Apparel",
            Category::Electronics => "Electronics",
            Category::Footwear => "Footwear",
            Category::Accessories => "Accessories",
            Category::Home => "Home",
        }
    }

    /// Comma-separated list of valid category names
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// Exact, case-sensitive match against the category names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidCategory {
                value: s.to_string(),
            })
    }
}
