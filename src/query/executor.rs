//! Query planning
//!
//! Filters on `category` and `variants.color` are answered from the
//! secondary indexes; everything else falls back to a collection scan. When
//! an `And` contains several indexed conditions their postings are
//! intersected. The full filter is always re-checked against each candidate.

use super::filter::Filter;
use crate::storage::index::{Indexes, Slot};
use std::collections::BTreeSet;

/// How a filter will be evaluated
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Visit only these documents
    IndexScan(BTreeSet<Slot>),
    /// Visit every document
    CollectionScan,
}

/// Choose a plan for a filter
pub fn plan(filter: &Filter, indexes: &Indexes) -> Plan {
    match candidates(filter, indexes) {
        Some(slots) => Plan::IndexScan(slots),
        None => Plan::CollectionScan,
    }
}

fn candidates(filter: &Filter, indexes: &Indexes) -> Option<BTreeSet<Slot>> {
    match filter {
        Filter::Category(category) => Some(indexes.by_category(*category)),
        Filter::VariantColor(color) => Some(indexes.by_variant_color(color)),
        Filter::And(filters) => filters
            .iter()
            .filter_map(|f| candidates(f, indexes))
            .reduce(|acc, slots| acc.intersection(&slots).copied().collect()),
        _ => None,
    }
}
