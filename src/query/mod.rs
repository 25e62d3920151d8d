//! Query layer: filters, planning, updates, projections and aggregations

pub mod aggregate;
pub mod executor;
pub mod filter;
pub mod projection;
pub mod update;

pub use aggregate::{CategoryCount, StockTotal};
pub use filter::Filter;
pub use projection::{ProductSummary, VariantLabel};
pub use update::Update;
