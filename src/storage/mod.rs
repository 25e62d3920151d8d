//! Storage layer for the catalog
//!
//! Products are markdown documents with YAML frontmatter, grouped in a
//! collection directory. The `Store` keeps an indexed in-memory image of the
//! collection and records writes in git.

pub mod collection;
pub mod document;
pub mod frontmatter;
pub mod index;
pub mod store;
pub mod text;

pub use store::{Documents, HistoryStatus, Store, StoreStatus};
