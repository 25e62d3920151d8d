//! The products store
//!
//! A `Store` owns the on-disk products collection and an in-memory image of
//! it. Reads are served from the image; writes go to disk first and only
//! then become visible, all under one async `RwLock`, so every
//! single-document mutation is atomic as observed by readers. When history
//! is enabled each write is committed to git before the lock is released;
//! the commit itself runs on tokio's blocking pool.
//!
//! Natural order is insertion order. The store stamps `createdAt` under the
//! write lock, strictly increasing, so the same order comes back when the
//! collection is loaded again.

use super::collection::{Collection, PRODUCTS};
use super::index::{Indexes, Slot};
use super::text::TextQuery;
use crate::config::{ConnectOptions, ConnectionUri};
use crate::error::{Error, Result};
use crate::git;
use crate::query::executor::{self, Plan};
use crate::query::{Filter, Update};
use crate::schema::{Product, ProductId, INDEXES};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::btree_map::Values;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// Products in natural order, as handed to aggregations
pub type Documents<'a> = Values<'a, Slot, Product>;

/// In-memory image of the products collection
#[derive(Debug, Default)]
struct State {
    next_slot: Slot,
    slots: HashMap<ProductId, Slot>,
    docs: BTreeMap<Slot, Product>,
    indexes: Indexes,
    /// Latest `createdAt` held or handed out
    last_created: Option<DateTime<Utc>>,
}

impl State {
    /// A creation time later than every product already in the image
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_created {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_created = Some(stamp);
        stamp
    }

    fn insert(&mut self, product: Product) -> Slot {
        let slot = self.next_slot;
        self.next_slot += 1;
        if self.last_created.map_or(true, |last| product.created_at > last) {
            self.last_created = Some(product.created_at);
        }
        self.indexes.insert(slot, &product);
        self.slots.insert(product.id, slot);
        self.docs.insert(slot, product);
        slot
    }

    fn remove(&mut self, slot: Slot) -> Option<Product> {
        let product = self.docs.remove(&slot)?;
        self.slots.remove(&product.id);
        self.indexes.remove(slot, &product);
        Some(product)
    }

    fn replace(&mut self, slot: Slot, product: Product) {
        if let Some(old) = self.docs.get(&slot) {
            self.indexes.update(slot, old, &product);
        }
        self.docs.insert(slot, product);
    }

    /// Slots of matching documents, in natural order
    fn matching(&self, filter: &Filter) -> Vec<Slot> {
        let plan = executor::plan(filter, &self.indexes);
        match &plan {
            Plan::IndexScan(candidates) => {
                tracing::debug!(?filter, candidates = candidates.len(), "Index scan");
                candidates
                    .iter()
                    .filter(|slot| self.docs.get(*slot).map(|p| filter.matches(p)).unwrap_or(false))
                    .copied()
                    .collect()
            }
            Plan::CollectionScan => {
                tracing::debug!(?filter, documents = self.docs.len(), "Collection scan");
                self.docs
                    .iter()
                    .filter(|(_, p)| filter.matches(p))
                    .map(|(slot, _)| *slot)
                    .collect()
            }
        }
    }
}

/// Snapshot of a store for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub uri: String,
    pub products: usize,
    pub history: Option<HistoryStatus>,
}

/// State of the git history behind a store
#[derive(Debug, Clone, Serialize)]
pub struct HistoryStatus {
    pub head: String,
    pub uncommitted_changes: bool,
    pub recent: Vec<String>,
}

/// A connected products store
pub struct Store {
    uri: ConnectionUri,
    collection: Collection,
    state: RwLock<State>,
    history: Option<Arc<Mutex<git::Repository>>>,
    closed: AtomicBool,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("uri", &self.uri)
            .field("collection", &self.collection)
            .field("history", &self.history.is_some())
            .field("closed", &self.closed.load(Ordering::Acquire))
            .finish()
    }
}

impl Store {
    /// Open (or create) the store a connection string points at
    pub async fn open(uri: ConnectionUri, options: ConnectOptions) -> Result<Self> {
        let root = uri.root().to_path_buf();
        let unreachable = |reason: String| Error::Connection {
            uri: uri.to_string(),
            reason,
        };

        if root.exists() && !root.is_dir() {
            return Err(unreachable(format!("{} is not a directory", root.display())));
        }
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        let history = if options.history {
            let repo = git::Repository::open_or_init(&root).map_err(|e| unreachable(e.to_string()))?;
            Some(Arc::new(Mutex::new(repo)))
        } else {
            None
        };

        let collection = Collection::open(PRODUCTS, &root);
        collection
            .ensure_exists()
            .await
            .map_err(|e| unreachable(e.to_string()))?;

        let mut products = collection.list().await?;
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut state = State::default();
        for product in products {
            state.insert(product);
        }

        tracing::info!(
            "Opened catalog at {} ({} products, history {})",
            uri,
            state.docs.len(),
            if options.history { "on" } else { "off" }
        );
        for index in INDEXES.iter() {
            tracing::debug!(name = index.name, path = index.path, kind = ?index.kind, "Index ready");
        }

        Ok(Self {
            uri,
            collection,
            state: RwLock::new(state),
            history,
            closed: AtomicBool::new(false),
        })
    }

    pub fn uri(&self) -> &ConnectionUri {
        &self.uri
    }

    /// Mark the store closed; every later operation fails
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!("Closed catalog at {}", self.uri);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All matching products, in natural order
    pub async fn find(&self, filter: &Filter) -> Result<Vec<Product>> {
        self.ensure_open()?;
        let state = self.state.read().await;
        Ok(state
            .matching(filter)
            .into_iter()
            .filter_map(|slot| state.docs.get(&slot).cloned())
            .collect())
    }

    pub async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        self.ensure_open()?;
        let state = self.state.read().await;
        Ok(state
            .slots
            .get(&id)
            .and_then(|slot| state.docs.get(slot).cloned()))
    }

    pub async fn count(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.state.read().await.docs.len())
    }

    /// Run a text query against the name index, best matches first
    pub async fn search(&self, query: &str) -> Result<Vec<(Product, f64)>> {
        self.ensure_open()?;
        let query = TextQuery::parse(query);
        let state = self.state.read().await;
        let ranked = state.indexes.text().search(&query);
        tracing::debug!(terms = ?query.terms, excluded = ?query.excluded, hits = ranked.len(), "Text search");

        Ok(ranked
            .into_iter()
            .filter_map(|(slot, score)| state.docs.get(&slot).map(|p| (p.clone(), score)))
            .collect())
    }

    /// Evaluate an aggregation over every product in natural order
    pub async fn aggregate<R>(&self, pipeline: impl FnOnce(Documents<'_>) -> R) -> Result<R> {
        self.ensure_open()?;
        let state = self.state.read().await;
        Ok(pipeline(state.docs.values()))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert already validated products, in order, returning them as stored
    ///
    /// Each product is stamped with a fresh `createdAt` (and a matching
    /// `updatedAt`) before it is written. Products written before a storage
    /// failure stay in place and the error, [`Error::PartialInsert`], says
    /// how many there were.
    pub async fn insert_many(&self, products: Vec<Product>) -> Result<Vec<Product>> {
        self.ensure_open()?;
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let mut state = self.state.write().await;
        let mut stored = Vec::with_capacity(products.len());
        let mut failure = None;

        for mut product in products {
            product.created_at = state.stamp();
            product.updated_at = product.created_at;
            if let Err(e) = self.collection.write(&product).await {
                failure = Some(e);
                break;
            }
            tracing::debug!("Inserted product {} ({})", product.id, product.name);
            state.insert(product.clone());
            stored.push(product);
        }

        let inserted = stored.len();
        if inserted > 0 {
            self.record(format!("Insert {} product(s)", inserted)).await;
        }

        match failure {
            Some(e) => {
                tracing::warn!("Insert stopped after {} product(s): {}", inserted, e);
                Err(Error::PartialInsert {
                    inserted,
                    source: Box::new(e),
                })
            }
            None => Ok(stored),
        }
    }

    /// Insert one product, stamping its timestamps as `insert_many` does
    pub async fn insert_one(&self, mut product: Product) -> Result<Product> {
        self.ensure_open()?;
        let mut state = self.state.write().await;
        product.created_at = state.stamp();
        product.updated_at = product.created_at;

        self.collection.write(&product).await?;
        state.insert(product.clone());

        self.record(format!("Insert product '{}'", product.name)).await;
        Ok(product)
    }

    /// Delete every matching product, returning how many were removed
    ///
    /// A storage failure stops the deletion; products already removed stay
    /// removed and are recorded before the error is returned.
    pub async fn delete_many(&self, filter: &Filter) -> Result<usize> {
        self.ensure_open()?;
        let mut state = self.state.write().await;
        let mut removed = 0;
        let mut failure = None;

        for slot in state.matching(filter) {
            let Some(id) = state.docs.get(&slot).map(|p| p.id) else {
                continue;
            };
            if let Err(e) = self.collection.delete(&id.to_string()).await {
                failure = Some(e);
                break;
            }
            state.remove(slot);
            removed += 1;
        }

        if removed > 0 {
            tracing::info!("Deleted {} product(s)", removed);
            self.record(format!("Delete {} product(s)", removed)).await;
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }

    pub async fn delete_one(&self, id: ProductId) -> Result<bool> {
        self.ensure_open()?;
        let mut state = self.state.write().await;
        let Some(&slot) = state.slots.get(&id) else {
            return Ok(false);
        };

        self.collection.delete(&id.to_string()).await?;
        if let Some(product) = state.remove(slot) {
            self.record(format!("Delete product '{}'", product.name)).await;
        }
        Ok(true)
    }

    /// Apply an update to the first matching product
    ///
    /// Returns the product as it is after the update together with the
    /// number of variants the update touched, or `None` when nothing
    /// matched. A product the update leaves unchanged is not rewritten and
    /// keeps its `updatedAt`.
    pub async fn find_one_and_update(
        &self,
        filter: &Filter,
        update: &Update,
    ) -> Result<Option<(Product, usize)>> {
        self.ensure_open()?;
        let mut state = self.state.write().await;

        let Some(slot) = state.matching(filter).first().copied() else {
            return Ok(None);
        };
        let Some(mut product) = state.docs.get(&slot).cloned() else {
            return Ok(None);
        };

        let affected = update.apply(&mut product);
        if affected == 0 {
            return Ok(Some((product, 0)));
        }

        product.updated_at = Utc::now().max(product.updated_at);
        self.collection.write(&product).await?;
        state.replace(slot, product.clone());

        tracing::debug!("Updated product {}: {}", product.id, update.describe());
        self.record(format!("Update '{}': {}", product.name, update.describe()))
            .await;
        Ok(Some((product, affected)))
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Commit the working tree, if history is on
    ///
    /// Callers hold the state lock, so commits land in write order. A failed
    /// commit is logged and does not fail the write.
    async fn record(&self, message: String) {
        let Some(history) = &self.history else {
            return;
        };
        let history = Arc::clone(history);
        let summary = message.clone();

        let committed = tokio::task::spawn_blocking(move || {
            let repo = lock(&history);
            repo.commit(&message)
        })
        .await;
        match committed {
            Ok(Ok(oid)) => tracing::debug!("Committed {}: {}", oid, summary),
            Ok(Err(e)) => tracing::warn!("Could not record history for '{}': {}", summary, e),
            Err(e) => tracing::warn!("History task for '{}' did not finish: {}", summary, e),
        }
    }

    /// Current state of the store, with up to `recent` history entries
    pub async fn status(&self, recent: usize) -> Result<StoreStatus> {
        let products = self.count().await?;

        let history = match &self.history {
            Some(history) => {
                let history = Arc::clone(history);
                let status = tokio::task::spawn_blocking(move || {
                    let repo = lock(&history);
                    Ok::<_, Error>(HistoryStatus {
                        head: repo.head_hash()?,
                        uncommitted_changes: repo.has_changes()?,
                        recent: repo.log(recent)?,
                    })
                })
                .await
                .map_err(|e| Error::Other(format!("History task did not finish: {}", e)))??;
                Some(status)
            }
            None => None,
        };

        Ok(StoreStatus {
            uri: self.uri.to_string(),
            products,
            history,
        })
    }
}

/// Lock the repository, recovering it if a previous holder panicked
fn lock(history: &Mutex<git::Repository>) -> std::sync::MutexGuard<'_, git::Repository> {
    match history.lock() {
        Ok(repo) => repo,
        Err(poisoned) => poisoned.into_inner(),
    }
}
