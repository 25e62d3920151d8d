//! Text index over product names
//!
//! Names are split into lowercase alphanumeric tokens, common stop words are
//! dropped, and a trailing plural `s` is stripped so that `shoe` finds
//! "Running Shoes". Queries use the same tokenizer; a word prefixed with `-`
//! excludes documents containing it.
//!
//! Scoring: every distinct query term a name contains adds
//! `1 + occurrences / name_tokens`, so shorter names with more matching terms
//! rank first.

use super::index::Slot;
use std::collections::{BTreeMap, BTreeSet, HashMap};

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "is", "it", "of", "on",
    "or", "the", "to", "with",
];

/// Split text into normalized search tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .map(stem)
        .collect()
}

fn stem(word: String) -> String {
    if word.chars().count() > 3 && word.ends_with('s') && !word.ends_with("ss") {
        word[..word.len() - 1].to_string()
    } else {
        word
    }
}

/// A parsed search query
#[derive(Debug, Default, PartialEq)]
pub struct TextQuery {
    pub terms: BTreeSet<String>,
    pub excluded: BTreeSet<String>,
}

impl TextQuery {
    pub fn parse(input: &str) -> Self {
        let mut query = Self::default();
        for word in input.split_whitespace() {
            match word.strip_prefix('-') {
                Some(negated) => query.excluded.extend(tokenize(negated)),
                None => query.terms.extend(tokenize(word)),
            }
        }
        query
    }
}

/// Inverted index from name tokens to documents
#[derive(Debug, Default)]
pub struct TextIndex {
    postings: HashMap<String, BTreeMap<Slot, u32>>,
    lengths: HashMap<Slot, u32>,
}

impl TextIndex {
    pub fn insert(&mut self, slot: Slot, text: &str) {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return;
        }
        self.lengths.insert(slot, tokens.len() as u32);
        for token in tokens {
            *self.postings.entry(token).or_default().entry(slot).or_insert(0) += 1;
        }
    }

    pub fn remove(&mut self, slot: Slot, text: &str) {
        self.lengths.remove(&slot);
        for token in tokenize(text) {
            if let Some(docs) = self.postings.get_mut(&token) {
                docs.remove(&slot);
                if docs.is_empty() {
                    self.postings.remove(&token);
                }
            }
        }
    }

    /// Matching documents with their scores, best first (ties in slot order)
    pub fn search(&self, query: &TextQuery) -> Vec<(Slot, f64)> {
        let mut scores: BTreeMap<Slot, f64> = BTreeMap::new();

        for term in &query.terms {
            let Some(docs) = self.postings.get(term) else {
                continue;
            };
            for (&slot, &freq) in docs {
                let len = self.lengths.get(&slot).copied().unwrap_or(1).max(1);
                *scores.entry(slot).or_insert(0.0) += 1.0 + f64::from(freq) / f64::from(len);
            }
        }

        for term in &query.excluded {
            if let Some(docs) = self.postings.get(term) {
                for slot in docs.keys() {
                    scores.remove(slot);
                }
            }
        }

        let mut ranked: Vec<_> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}
