//! Catalog access layer
//!
//! Canned reads and variant mutations over an open [`Session`]. Reads never
//! fail except on invalid input or a closed session. Mutations address "the
//! product named X" and act on the first such product in natural order;
//! when nothing matches they return `None` rather than an error.
//!
//! Variant targeting differs by operation: [`add_variant`] appends one
//! variant, [`update_variant_stock`] sets the stock of the first variant with
//! the color, and [`remove_variant`] removes every variant with the color.
//! [`update_variant_stock_by_id`] and [`remove_variant_by_id`] address one
//! variant by its `_id`, so same-color siblings can be told apart.

mod seed;

pub use seed::{
    load_seed_file, reset_catalog, sample_products, seed_catalog, seed_catalog_with, BatchMode,
};

use crate::error::{Error, Result};
use crate::query::{aggregate, projection, CategoryCount, Filter, ProductSummary, StockTotal, Update};
use crate::schema::{
    stock_count, Category, Product, ProductId, ProductSpec, Variant, VariantId, VariantSpec,
};
use crate::validation::validate_document_id;
use crate::Session;
use serde::Serialize;

/// Threshold used by `find_low_stock` when none is given
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Result of removing variants from a product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Removal {
    /// The product after removal
    pub product: Product,
    /// Number of variants removed (0 when none had the color)
    pub removed: usize,
}

/// A text search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub product: Product,
    pub score: f64,
}

// =============================================================================
// Reads
// =============================================================================

pub async fn list_all(session: &Session) -> Result<Vec<Product>> {
    session.store().find(&Filter::All).await
}

/// Listing view of every product: ids, names, prices and variant labels
pub async fn list_summaries(session: &Session) -> Result<Vec<ProductSummary>> {
    session
        .store()
        .aggregate(|docs| docs.map(ProductSummary::from).collect())
        .await
}

/// Look up a product by id
pub async fn get_product(session: &Session, id: &str) -> Result<Option<Product>> {
    let id = parse_product_id(id)?;
    session.store().get(id).await
}

/// Products in a category; the category must be one of the fixed set
pub async fn find_by_category(session: &Session, category: &str) -> Result<Vec<Product>> {
    let category: Category = category.parse()?;
    session.store().find(&Filter::Category(category)).await
}

/// Products with at least one variant of the given color
pub async fn find_by_variant_color(session: &Session, color: &str) -> Result<Vec<Product>> {
    session
        .store()
        .find(&Filter::VariantColor(color.to_string()))
        .await
}

/// Like `find_by_variant_color`, keeping only the first matching variant
pub async fn find_by_variant_color_projected(
    session: &Session,
    color: &str,
) -> Result<Vec<Product>> {
    let products = find_by_variant_color(session, color).await?;
    Ok(products
        .into_iter()
        .map(|p| projection::first_variant_with_color(p, color))
        .collect())
}

/// Products with at least one variant of the given size
pub async fn find_by_size(session: &Session, size: &str) -> Result<Vec<Product>> {
    session
        .store()
        .find(&Filter::VariantSize(size.to_string()))
        .await
}

/// Products with at least one variant whose stock is strictly below `threshold`
pub async fn find_low_stock(session: &Session, threshold: i64) -> Result<Vec<Product>> {
    session.store().find(&Filter::StockBelow(threshold)).await
}

/// Products with at least one variant whose stock is strictly above `threshold`
pub async fn find_in_stock_above(session: &Session, threshold: i64) -> Result<Vec<Product>> {
    session.store().find(&Filter::StockAbove(threshold)).await
}

/// Stock per distinct product name, ordered by name
pub async fn total_stock_by_product(session: &Session) -> Result<Vec<StockTotal>> {
    session
        .store()
        .aggregate(|docs| aggregate::stock_by_product(docs))
        .await
}

pub async fn count_by_category(session: &Session) -> Result<Vec<CategoryCount>> {
    session
        .store()
        .aggregate(|docs| aggregate::count_by_category(docs))
        .await
}

/// Products ranked by relevance of their name to `term`
pub async fn search_by_name(session: &Session, term: &str) -> Result<Vec<Product>> {
    let hits = session.store().search(term).await?;
    Ok(hits.into_iter().map(|(product, _)| product).collect())
}

pub async fn search_by_name_scored(session: &Session, term: &str) -> Result<Vec<SearchHit>> {
    let hits = session.store().search(term).await?;
    Ok(hits
        .into_iter()
        .map(|(product, score)| SearchHit { product, score })
        .collect())
}

// =============================================================================
// Writes
// =============================================================================

/// Validate and insert one product; the store assigns its timestamps
pub async fn insert_product(session: &Session, spec: ProductSpec) -> Result<Product> {
    let product = Product::from_spec(spec, chrono::Utc::now())?;
    session.store().insert_one(product).await
}

/// Delete a product by id, returning whether it existed
pub async fn delete_product(session: &Session, id: &str) -> Result<bool> {
    let id = parse_product_id(id)?;
    session.store().delete_one(id).await
}

/// Append a variant to the first product with this name
pub async fn add_variant(
    session: &Session,
    product_name: &str,
    variant: VariantSpec,
) -> Result<Option<Product>> {
    let variant = Variant::from_spec(variant)?;
    let updated = session
        .store()
        .find_one_and_update(
            &Filter::Name(product_name.to_string()),
            &Update::PushVariant(variant),
        )
        .await?;
    Ok(updated.map(|(product, _)| product))
}

/// Set the stock of the first variant with `color` on the first product
/// named `product_name` that has such a variant
pub async fn update_variant_stock(
    session: &Session,
    product_name: &str,
    color: &str,
    new_stock: i64,
) -> Result<Option<Product>> {
    let stock = stock_count("stock", new_stock)?;
    let filter = Filter::Name(product_name.to_string()).and(Filter::VariantColor(color.to_string()));
    let update = Update::SetFirstVariantStock {
        color: color.to_string(),
        stock,
    };

    let updated = session.store().find_one_and_update(&filter, &update).await?;
    Ok(updated.map(|(product, _)| product))
}

/// Remove every variant with `color` from the first product with this name
///
/// Returns `None` when no product has the name. Running it again once the
/// color is gone leaves the product untouched and reports `removed == 0`.
pub async fn remove_variant(
    session: &Session,
    product_name: &str,
    color: &str,
) -> Result<Option<Removal>> {
    let update = Update::PullVariants {
        color: color.to_string(),
    };
    let updated = session
        .store()
        .find_one_and_update(&Filter::Name(product_name.to_string()), &update)
        .await?;
    Ok(updated.map(|(product, removed)| Removal { product, removed }))
}

/// Set the stock of the variant with this id, wherever it is
///
/// Returns `None` when no product has such a variant.
pub async fn update_variant_stock_by_id(
    session: &Session,
    variant_id: &str,
    new_stock: i64,
) -> Result<Option<Product>> {
    let id = parse_variant_id(variant_id)?;
    let stock = stock_count("stock", new_stock)?;

    let updated = session
        .store()
        .find_one_and_update(
            &Filter::VariantId(id),
            &Update::SetVariantStockById { id, stock },
        )
        .await?;
    Ok(updated.map(|(product, _)| product))
}

/// Remove the variant with this id, returning the product without it
pub async fn remove_variant_by_id(session: &Session, variant_id: &str) -> Result<Option<Product>> {
    let id = parse_variant_id(variant_id)?;
    let updated = session
        .store()
        .find_one_and_update(&Filter::VariantId(id), &Update::PullVariantById { id })
        .await?;
    Ok(updated.map(|(product, _)| product))
}

fn parse_product_id(id: &str) -> Result<ProductId> {
    validate_document_id(id)?;
    id.parse::<ProductId>().map_err(|_| Error::InvalidIdentifier {
        kind: "product id",
        value: id.to_string(),
        reason: "not a UUID",
    })
}

fn parse_variant_id(id: &str) -> Result<VariantId> {
    id.parse::<VariantId>().map_err(|_| Error::InvalidIdentifier {
        kind: "variant id",
        value: id.to_string(),
        reason: "not a UUID",
    })
}
