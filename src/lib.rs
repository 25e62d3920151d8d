//! mdcatalog - a markdown-based product catalog
//!
//! Products with embedded color/size/stock variants, stored as human-readable
//! markdown documents and versioned with git.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          mdcatalog                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │                  Catalog Access Layer                       ││
//! │  │  (seed/reset, finds, variant push/set/pull, aggregations)   ││
//! │  └──────────────────────────┬──────────────────────────────────┘│
//! │                             │ Session                           │
//! │                             ▼                                   │
//! │  ┌─────────────┐  ┌─────────────────────────────────────────┐   │
//! │  │   Schema    │  │              Query Layer                │   │
//! │  │ (Product,   │  │  (filters, planner, updates,            │   │
//! │  │  Variant)   │  │   projections, aggregations)            │   │
//! │  └─────────────┘  └────────────────────┬────────────────────┘   │
//! │                                        ▼                        │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │                   Storage Layer                             ││
//! │  │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  ││
//! │  │  │  Document   │  │  Indexes    │  │  Store              │  ││
//! │  │  │  Files      │  │ (category,  │  │ (in-memory image,   │  ││
//! │  │  │             │  │ color, text)│  │  RwLock)            │  ││
//! │  │  └──────┬──────┘  └─────────────┘  └──────────┬──────────┘  ││
//! │  └─────────┼────────────────────────────────────┼─────────────┘│
//! │            ▼                                    ▼              │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │        File System + Git History (one commit per write)     ││
//! │  │  /collections/products/{id}.md                              ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> mdcatalog::Result<()> {
//! use mdcatalog::{catalog, Session};
//!
//! let session = Session::connect("file://./data/ecommerce").await?;
//! catalog::reset_catalog(&session).await?;
//! catalog::seed_catalog(&session, catalog::sample_products()?).await?;
//!
//! let low = catalog::find_low_stock(&session, catalog::DEFAULT_LOW_STOCK_THRESHOLD).await?;
//! println!("{} product(s) low on stock", low.len());
//! session.close();
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod git;
pub mod query;
pub mod schema;
pub mod storage;
pub mod validation;

pub use config::{ConnectOptions, ConnectionUri};
pub use error::{Error, ErrorKind, Result};
pub use schema::{Category, Product, ProductId, ProductSpec, Variant, VariantSpec};
pub use storage::{Store, StoreStatus};

use std::future::Future;
use std::sync::Arc;

/// An open connection to a catalog
///
/// Cloning is cheap; clones share the same store and may be used from
/// several tasks at once. Closing any clone closes them all.
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<Store>,
}

impl Session {
    /// Connect with default options (history enabled)
    pub async fn connect(uri: &str) -> Result<Self> {
        Self::connect_with(ConnectionUri::parse(uri)?, ConnectOptions::default()).await
    }

    pub async fn connect_with(uri: ConnectionUri, options: ConnectOptions) -> Result<Self> {
        let store = Store::open(uri, options).await?;
        Ok(Self {
            store: Arc::new(store),
        })
    }

    pub fn uri(&self) -> &ConnectionUri {
        self.store.uri()
    }

    /// Connect, hand the session to `work` and close it once `work` is done
    ///
    /// The session is closed whether `work` succeeds or fails; its result is
    /// returned as is.
    pub async fn scoped<T, E, F, Fut>(
        uri: ConnectionUri,
        options: ConnectOptions,
        work: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: From<Error>,
    {
        let session = Self::connect_with(uri, options).await?;
        let result = work(session.clone()).await;
        session.close();
        result
    }

    /// Close the session; later operations through any clone fail
    pub fn close(self) {
        self.store.close();
    }

    pub fn is_closed(&self) -> bool {
        self.store.is_closed()
    }

    /// Product count and recent history of the catalog
    pub async fn status(&self, recent: usize) -> Result<StoreStatus> {
        self.store.status(recent).await
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }
}
