//! Ordered column registry.

use std::collections::HashSet;

use super::def::ColumnDef;

/// Ordered set of column descriptors with unique keys.
///
/// Duplicate keys are dropped on construction (first definition wins)
/// and reported through the log.
pub struct ColumnRegistry<T> {
    columns: Vec<ColumnDef<T>>,
}

impl<T> Clone for ColumnRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ColumnRegistry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

impl<T> Default for ColumnRegistry<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

impl<T> ColumnRegistry<T> {
    /// Build a registry, keeping the first column for each key.
    pub fn new(columns: Vec<ColumnDef<T>>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(columns.len());
        for column in columns {
            if seen.insert(column.key.clone()) {
                kept.push(column);
            } else {
                log::warn!("Duplicate column key '{}' ignored", column.key);
            }
        }
        Self { columns: kept }
    }

    /// Look up a column by key.
    pub fn get(&self, key: &str) -> Option<&ColumnDef<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Position of a column in registry order.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// Check whether a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Columns in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &ColumnDef<T>> {
        self.columns.iter()
    }

    /// Column keys in registry order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<T> From<Vec<ColumnDef<T>>> for ColumnRegistry<T> {
    fn from(columns: Vec<ColumnDef<T>>) -> Self {
        Self::new(columns)
    }
}

impl<T> FromIterator<ColumnDef<T>> for ColumnRegistry<T> {
    fn from_iter<I: IntoIterator<Item = ColumnDef<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
