//! Provider backing store
//!
//! Ordered `path -> value` map answering configuration lookups. Paths are
//! matched ignoring case; a repeated path overwrites the value but keeps the
//! position where it was first inserted.

use crate::flatten::FlattenedOverride;
use indexmap::IndexMap;
use std::fmt;

#[derive(Clone, Default, PartialEq, Eq)]
pub struct OverrideStore {
    entries: IndexMap<String, Entry>,
}

#[derive(Clone, PartialEq, Eq)]
struct Entry {
    path: String,
    value: String,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `path` to `value`, last write wins.
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<String>) {
        let path = path.into();
        let value = value.into();

        self.entries
            .entry(path.to_lowercase())
            .and_modify(|entry| entry.value = value.clone())
            .or_insert(Entry { path, value });
    }

    /// Insert every override in order.
    pub fn extend<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = FlattenedOverride>,
    {
        for o in overrides {
            self.insert(o.path, o.value);
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(&path.to_lowercase()).map(|e| e.value.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(&path.to_lowercase())
    }

    /// `(path, value)` pairs in insertion order. Paths keep the casing of
    /// their first insertion.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.values().map(|e| (e.path.as_str(), e.value.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.path.as_str())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Values are secret material.
impl fmt::Debug for OverrideStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.paths().map(|p| (p, "[REDACTED]"))).finish()
    }
}

impl FromIterator<FlattenedOverride> for OverrideStore {
    fn from_iter<I: IntoIterator<Item = FlattenedOverride>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}
