//! Brand relationship graph.
//!
//! Symmetric, one-hop adjacency between lowercase brand names. Keys and each
//! alias list keep the order in which they were first seen, since canonical
//! resolution picks the first key that matches.

use crate::model::{BrandConnectionRecord, MatchError};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default, Clone)]
struct Entry {
    name: String,
    related: Vec<String>,
    seen: HashSet<String>,
}

impl Entry {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn add(&mut self, brand: &str) {
        if self.seen.insert(brand.to_string()) {
            self.related.push(brand.to_string());
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct BrandRelationshipMap {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl BrandRelationshipMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, brand: &str) -> bool {
        self.index.contains_key(&brand.to_lowercase())
    }

    /// Brands directly connected to `brand`, in insertion order.
    pub fn related(&self, brand: &str) -> Option<&[String]> {
        self.index
            .get(&brand.to_lowercase())
            .map(|&i| self.entries[i].related.as_slice())
    }

    pub(crate) fn is_related(&self, key: &str, brand: &str) -> bool {
        self.index
            .get(key)
            .is_some_and(|&i| self.entries[i].seen.contains(brand))
    }

    /// `(key, aliases)` pairs in key insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.related.as_slice()))
    }

    /// Every name of every group: each key followed by its aliases, key by key.
    /// Names shared by several groups are yielded once per group.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.iter().flat_map(|(key, related)| {
            std::iter::once(key).chain(related.iter().map(String::as_str))
        })
    }

    fn entry_mut(&mut self, brand: &str) -> &mut Entry {
        let i = match self.index.get(brand) {
            Some(&i) => i,
            None => {
                self.entries.push(Entry::new(brand));
                self.index.insert(brand.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[i]
    }

    fn connect(&mut self, a: &str, b: &str) {
        self.entry_mut(a).add(b);
        self.entry_mut(b).add(a);
    }
}

/// Builds the relationship map from raw connection rows.
pub fn build_graph(records: &[BrandConnectionRecord]) -> Result<BrandRelationshipMap, MatchError> {
    if records.is_empty() {
        return Err(MatchError::InvalidInput("no brand connections supplied".into()));
    }

    let mut graph = BrandRelationshipMap::default();

    for (row, record) in records.iter().enumerate() {
        let primary = record.primary_brand.trim().to_lowercase();
        if primary.is_empty() {
            return Err(MatchError::InvalidInput(format!(
                "connection #{row} has no primary brand"
            )));
        }

        let aliases: Vec<String> = record
            .related_brands
            .split(';')
            .map(|b| b.trim().to_lowercase())
            .filter(|b| !b.is_empty())
            .collect();
        if aliases.is_empty() {
            return Err(MatchError::InvalidInput(format!(
                "connection #{row} ({primary}) has no related brands"
            )));
        }

        graph.entry_mut(&primary);
        for alias in aliases.iter().filter(|a| **a != primary) {
            graph.connect(&primary, alias);
        }
    }

    Ok(graph)
}
