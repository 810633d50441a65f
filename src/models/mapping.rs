//! VNet name to diagram id mapping.

use serde::Serialize;
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Deterministic `name -> diagram id` mapping consumed by renderers.
///
/// Keys iterate in sorted order so the serialized form is byte-identical for
/// identical input. Only the layout engine can insert.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct IdMapping(BTreeMap<String, String>);

impl IdMapping {
    /// Insert a mapping, returning the id previously held by `name`.
    pub(crate) fn insert(&mut self, name: &str, id: String) -> Option<String> {
        self.0.insert(name.to_string(), id)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Diagram ids, ordered by VNet name.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a IdMapping {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
