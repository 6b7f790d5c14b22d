//! Row identity.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Stable identity of a row.
///
/// Selection and expansion are stored as sets of keys, never as row
/// references, so they survive filtering, sorting, paging and re-fetches
/// of the dataset.
///
/// Keys must be unique across distinct rows. The engine cannot detect a
/// `get_row_id` that maps two rows to one key; doing so is a caller
/// contract violation and leaves selection undefined for those rows.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    /// Create a key from anything string-like.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key used when no `get_row_id` is configured: the row's position in
    /// the row store. Positional keys do not survive a re-fetch that
    /// reorders rows.
    pub fn positional(index: usize) -> Self {
        Self(index.to_string())
    }

    /// Key of a grouped row, built from its composite group value.
    pub(crate) fn group(parts: &[String]) -> Self {
        Self(format!("group:{}", parts.join("\u{1f}")))
    }

    pub(crate) fn is_group(&self) -> bool {
        self.0.starts_with("group:")
    }

    /// Borrow the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for RowKey {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl From<&String> for RowKey {
    fn from(v: &String) -> Self {
        Self(v.clone())
    }
}

macro_rules! row_key_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RowKey {
                fn from(v: $t) -> Self {
                    Self(v.to_string())
                }
            }
        )*
    };
}

row_key_from_int!(u32, u64, i32, i64, usize);

/// Caller-supplied row identity function.
pub type RowIdFn<T> = Arc<dyn Fn(&T) -> RowKey + Send + Sync>;

/// Resolve the key of `row` at `index`, falling back to its position.
pub(crate) fn key_of<T>(row_id: Option<&RowIdFn<T>>, row: &T, index: usize) -> RowKey {
    match row_id {
        Some(f) => f(row),
        None => RowKey::positional(index),
    }
}
