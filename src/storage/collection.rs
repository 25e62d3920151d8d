//! Collection - a group of documents stored in a directory
//!
//! Directory structure:
//! ```text
//! /collections/
//!   /products/
//!     5d0c1f9e-6c4b-4b8e-9a51-0e7c2f1d3a10.md
//!     a2f4c7d1-0b3e-4f6a-8c9d-1e2f3a4b5c6d.md
//! ```

use super::document::{self, EXTENSION};
use crate::error::{Error, Result};
use crate::schema::Product;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Name of the products collection
pub const PRODUCTS: &str = "products";

/// A collection of product documents
#[derive(Debug)]
pub struct Collection {
    /// Name of the collection (directory name)
    pub name: String,
    /// Path to the collection directory
    pub path: PathBuf,
}

impl Collection {
    /// Open a collection under the given database root
    pub fn open(name: impl Into<String>, base_path: &Path) -> Self {
        let name = name.into();
        let path = base_path.join("collections").join(&name);
        Self { name, path }
    }

    /// Create the collection directory if it doesn't exist
    pub async fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.path)
            .await
            .map_err(|source| Error::FileWriteError {
                path: self.path.clone(),
                source,
            })
    }

    /// Load every readable document in the collection
    ///
    /// Documents that fail to parse or violate product invariants are
    /// skipped with a warning.
    pub async fn list(&self) -> Result<Vec<Product>> {
        let mut products = Vec::new();

        if !self.path.exists() {
            return Ok(products);
        }

        for path in self.document_paths() {
            match self.read_document(&path).await {
                Ok(product) => products.push(product),
                Err(e) => tracing::warn!("Skipping unreadable document {:?}: {}", path, e),
            }
        }

        Ok(products)
    }

    /// Write a document, replacing any previous version
    ///
    /// The new content is written to a temporary file and renamed over the
    /// old one, so readers of the directory never see a partial document.
    pub async fn write(&self, product: &Product) -> Result<()> {
        let path = self.document_path(&product.id.to_string());
        let tmp = path.with_extension("md.tmp");
        let content = document::render(product)?;

        fs::write(&tmp, content)
            .await
            .map_err(|source| Error::FileWriteError {
                path: tmp.clone(),
                source,
            })?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|source| Error::FileWriteError { path, source })
    }

    /// Delete a document by id
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let path = self.document_path(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .await
            .map_err(|source| Error::FileWriteError { path, source })?;
        Ok(true)
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.path.join(document::file_name(id))
    }

    fn document_paths(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.extension().map(|e| e == EXTENSION).unwrap_or(false))
            .collect()
    }

    async fn read_document(&self, path: &Path) -> Result<Product> {
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Other(format!("Invalid document path {:?}", path)))?;

        let content = fs::read_to_string(path)
            .await
            .map_err(|source| Error::FileReadError {
                path: path.to_path_buf(),
                source,
            })?;

        document::parse(id, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ProductSpec, VariantSpec};
    use tempfile::TempDir;

    fn jacket() -> Product {
        let spec = ProductSpec::new("Winter Jacket", 129.99, "Apparel")
            .with_variant(VariantSpec::new("Black", "S", 8));
        Product::from_spec(spec, chrono::Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_collection_crud() {
        let tmp = TempDir::new().unwrap();
        let collection = Collection::open(PRODUCTS, tmp.path());
        collection.ensure_exists().await.unwrap();

        // Create
        let product = jacket();
        collection.write(&product).await.unwrap();
        assert!(tmp
            .path()
            .join("collections/products")
            .join(format!("{}.md", product.id))
            .exists());

        // Read
        let fetched = collection.list().await.unwrap();
        assert_eq!(fetched, vec![product.clone()]);

        // Update
        let mut updated = product.clone();
        updated.variants[0].stock = 3;
        collection.write(&updated).await.unwrap();
        let refetched = collection.list().await.unwrap();
        assert_eq!(refetched.len(), 1);
        assert_eq!(refetched[0].variants[0].stock, 3);

        // Delete
        let id = product.id.to_string();
        assert!(collection.delete(&id).await.unwrap());
        assert!(!collection.delete(&id).await.unwrap());
        assert!(collection.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_skips_broken_documents() {
        let tmp = TempDir::new().unwrap();
        let collection = Collection::open(PRODUCTS, tmp.path());
        collection.ensure_exists().await.unwrap();

        collection.write(&jacket()).await.unwrap();
        std::fs::write(collection.path.join("broken.md"), "no frontmatter here").unwrap();
        std::fs::write(collection.path.join("notes.txt"), "ignored").unwrap();

        assert_eq!(collection.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let collection = Collection::open(PRODUCTS, tmp.path());
        assert!(collection.list().await.unwrap().is_empty());
    }
}
