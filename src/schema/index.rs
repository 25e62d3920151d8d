//! Secondary index declarations
//!
//! These describe the access paths every store backing the catalog has to
//! serve without a collection scan. The markdown store builds exactly these
//! in memory when a session connects (see `storage::index`).

use serde::Serialize;

/// How an index organises its keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    /// Equality lookups on a scalar field
    Ascending,
    /// One entry per element of an embedded array
    Multikey,
    /// Tokenized free-text search with relevance ranking
    Text,
}

/// A declared secondary index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexSpec {
    pub name: &'static str,
    pub path: &'static str,
    pub kind: IndexKind,
}

/// Indexes on the products collection
pub const INDEXES: [IndexSpec; 3] = [
    IndexSpec {
        name: "category_1",
        path: "category",
        kind: IndexKind::Ascending,
    },
    IndexSpec {
        name: "variants.color_1",
        path: "variants.color",
        kind: IndexKind::Multikey,
    },
    IndexSpec {
        name: "name_text",
        path: "name",
        kind: IndexKind::Text,
    },
];
