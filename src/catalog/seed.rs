//! Seeding and resetting the catalog

use crate::error::{BatchFailure, Error, ItemFailure, Result};
use crate::query::Filter;
use crate::schema::{Product, ProductSpec};
use crate::Session;
use std::path::Path;

const SAMPLE_PRODUCTS: &str = include_str!("../../data/sample_products.json");

/// How a seed batch treats invalid items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BatchMode {
    /// Insert items in order and stop at the first invalid one
    #[default]
    Ordered,
    /// Insert every valid item and report all invalid ones
    Unordered,
    /// Write nothing unless every item is valid
    ValidateFirst,
}

/// The bundled sample catalog
pub fn sample_products() -> Result<Vec<ProductSpec>> {
    Ok(serde_json::from_str(SAMPLE_PRODUCTS)?)
}

/// Read a seed file: a JSON array of product specs
pub async fn load_seed_file(path: &Path) -> Result<Vec<ProductSpec>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::FileReadError {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(serde_json::from_str(&content)?)
}

/// Remove every product, returning how many were removed
pub async fn reset_catalog(session: &Session) -> Result<usize> {
    session.store().delete_many(&Filter::All).await
}

/// Insert a batch of products in order, returning how many were inserted
///
/// Stops at the first invalid product. Products before it stay inserted and
/// the returned [`Error::Batch`] says how many.
pub async fn seed_catalog(session: &Session, products: Vec<ProductSpec>) -> Result<usize> {
    seed_catalog_with(session, products, BatchMode::Ordered)
        .await
        .map(|inserted| inserted.len())
}

/// Insert a batch of products under the given batch mode
///
/// Returns the inserted products as stored. When any item is invalid the
/// result is an [`Error::Batch`] listing the offending items and how many
/// products were written anyway. A storage failure part way through is an
/// [`Error::PartialInsert`].
pub async fn seed_catalog_with(
    session: &Session,
    products: Vec<ProductSpec>,
    mode: BatchMode,
) -> Result<Vec<Product>> {
    session.ensure_open()?;

    let mut valid = Vec::new();
    let mut failures = Vec::new();

    for (index, spec) in products.into_iter().enumerate() {
        let name = spec.name.clone();
        match Product::from_spec(spec, chrono::Utc::now()) {
            Ok(product) => {
                if failures.is_empty() || mode == BatchMode::Unordered {
                    valid.push(product);
                }
            }
            Err(error) => {
                tracing::warn!("Seed item {} is invalid: {}", index, error);
                failures.push(ItemFailure { index, name, error });
                if mode == BatchMode::Ordered {
                    break;
                }
            }
        }
    }

    if mode == BatchMode::ValidateFirst && !failures.is_empty() {
        return Err(Error::Batch(BatchFailure {
            inserted: 0,
            failures,
        }));
    }

    // A storage failure surfaces as `Error::PartialInsert` with the count
    let inserted = session.store().insert_many(valid).await?;
    tracing::info!("Seeded {} product(s) ({:?})", inserted.len(), mode);

    if failures.is_empty() {
        Ok(inserted)
    } else {
        Err(Error::Batch(BatchFailure {
            inserted: inserted.len(),
            failures,
        }))
    }
}
