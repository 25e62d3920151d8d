//! In-memory secondary indexes
//!
//! Documents are addressed by `Slot`, a per-session sequence number that
//! follows natural (insertion) order. Index postings are ordered sets of
//! slots, so an index scan yields documents in the same order as a
//! collection scan.

use super::text::TextIndex;
use crate::schema::{Category, Product};
use std::collections::{BTreeSet, HashMap};

/// Position of a document in natural order
pub type Slot = u64;

/// The category, variant color and name indexes of the products collection
#[derive(Debug, Default)]
pub struct Indexes {
    category: HashMap<Category, BTreeSet<Slot>>,
    variant_color: HashMap<String, BTreeSet<Slot>>,
    name: TextIndex,
}

impl Indexes {
    pub fn insert(&mut self, slot: Slot, product: &Product) {
        self.category.entry(product.category).or_default().insert(slot);
        for variant in &product.variants {
            self.variant_color
                .entry(variant.color.clone())
                .or_default()
                .insert(slot);
        }
        self.name.insert(slot, &product.name);
    }

    pub fn remove(&mut self, slot: Slot, product: &Product) {
        remove_posting(&mut self.category, &product.category, slot);
        for variant in &product.variants {
            remove_posting(&mut self.variant_color, &variant.color, slot);
        }
        self.name.remove(slot, &product.name);
    }

    /// Replace the entries of a document that changed in place
    pub fn update(&mut self, slot: Slot, old: &Product, new: &Product) {
        self.remove(slot, old);
        self.insert(slot, new);
    }

    pub fn by_category(&self, category: Category) -> BTreeSet<Slot> {
        self.category.get(&category).cloned().unwrap_or_default()
    }

    pub fn by_variant_color(&self, color: &str) -> BTreeSet<Slot> {
        self.variant_color.get(color).cloned().unwrap_or_default()
    }

    pub fn text(&self) -> &TextIndex {
        &self.name
    }
}

fn remove_posting<K>(index: &mut HashMap<K, BTreeSet<Slot>>, key: &K, slot: Slot)
where
    K: std::hash::Hash + Eq,
{
    if let Some(slots) = index.get_mut(key) {
        slots.remove(&slot);
        if slots.is_empty() {
            index.remove(key);
        }
    }
}
