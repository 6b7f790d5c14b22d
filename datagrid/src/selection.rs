//! Row selection state.
//!
//! Selection is a set of row keys, never row references. A selected row
//! stays selected while a filter hides it, while it sits on another page
//! and across a re-fetch that keeps its key.
//!
//! "Select all" always means the keys currently materialized on the
//! visible page, not every row matching the filter. Callers showing a
//! "N selected" bulk-action label should word it accordingly.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::row::RowKey;

/// Key-based selection state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Currently selected keys.
    selected: BTreeSet<RowKey>,
    /// Anchor for range selection (Shift+click starting point).
    #[serde(skip)]
    anchor: Option<RowKey>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection holding exactly `keys`.
    pub fn from_keys(keys: impl IntoIterator<Item = RowKey>) -> Self {
        Self {
            selected: keys.into_iter().collect(),
            anchor: None,
        }
    }

    /// All selected keys in key order.
    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.selected.iter()
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &RowKey) -> bool {
        self.selected.contains(key)
    }

    /// Get the number of selected keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Get the anchor key for range selection.
    pub fn anchor(&self) -> Option<&RowKey> {
        self.anchor.as_ref()
    }

    /// True iff `visible` is non-empty and every key in it is selected.
    pub fn is_all_selected(&self, visible: &[RowKey]) -> bool {
        !visible.is_empty() && visible.iter().all(|k| self.selected.contains(k))
    }

    /// True iff some but not all of `visible` are selected.
    pub fn is_partially_selected(&self, visible: &[RowKey]) -> bool {
        let hits = visible.iter().filter(|k| self.selected.contains(*k)).count();
        hits > 0 && hits < visible.len()
    }

    /// Clear all selection.
    /// Returns the keys that were deselected.
    pub fn clear(&mut self) -> Vec<RowKey> {
        let removed: Vec<_> = std::mem::take(&mut self.selected).into_iter().collect();
        self.anchor = None;
        removed
    }

    /// Select a single key (clears others).
    /// Returns (added, removed) keys.
    pub fn select(&mut self, key: &RowKey) -> (Vec<RowKey>, Vec<RowKey>) {
        let removed: Vec<_> = self.selected.iter().filter(|k| *k != key).cloned().collect();
        let was_selected = self.selected.contains(key);
        self.selected.clear();
        self.selected.insert(key.clone());
        self.anchor = Some(key.clone());
        let added = if was_selected {
            vec![]
        } else {
            vec![key.clone()]
        };
        (added, removed)
    }

    /// Toggle selection of a key (Ctrl+click, checkbox).
    /// Returns (added, removed) keys.
    pub fn toggle(&mut self, key: &RowKey) -> (Vec<RowKey>, Vec<RowKey>) {
        self.anchor = Some(key.clone());
        if self.selected.remove(key) {
            (vec![], vec![key.clone()])
        } else {
            self.selected.insert(key.clone());
            (vec![key.clone()], vec![])
        }
    }

    /// Set every key in `keys` to `selected`.
    /// Returns (added, removed) keys.
    pub fn set_many(&mut self, keys: &[RowKey], selected: bool) -> (Vec<RowKey>, Vec<RowKey>) {
        let mut added = Vec::new();
        let mut removed = Vec::new();
        for key in keys {
            if selected {
                if self.selected.insert(key.clone()) {
                    added.push(key.clone());
                }
            } else if self.selected.remove(key) {
                removed.push(key.clone());
            }
        }
        (added, removed)
    }

    /// Range select from anchor to target key (Shift+click).
    ///
    /// `ordered` is the key order of the current view. If `extend` is
    /// false, keys outside the range are deselected first. Keys hidden by
    /// the current view are never touched by the range itself.
    ///
    /// Returns (added, removed) keys.
    pub fn range_select(
        &mut self,
        target: &RowKey,
        ordered: &[RowKey],
        extend: bool,
    ) -> (Vec<RowKey>, Vec<RowKey>) {
        let anchor = self.anchor.clone().unwrap_or_else(|| target.clone());

        let anchor_pos = ordered.iter().position(|k| *k == anchor);
        let target_pos = ordered.iter().position(|k| k == target);

        let (start, end) = match (anchor_pos, target_pos) {
            (Some(a), Some(t)) => (a.min(t), a.max(t)),
            // If anchor or target is not in view, just select the target
            _ => return self.select(target),
        };

        let range: BTreeSet<RowKey> = ordered[start..=end].iter().cloned().collect();

        let mut removed = Vec::new();
        if !extend {
            removed = self
                .selected
                .iter()
                .filter(|k| !range.contains(*k))
                .cloned()
                .collect();
            for key in &removed {
                self.selected.remove(key);
            }
        }

        let mut added = Vec::new();
        for key in range {
            if self.selected.insert(key.clone()) {
                added.push(key);
            }
        }

        (added, removed)
    }

    /// Select every key of the current page.
    /// Returns the keys that were newly selected.
    pub fn select_all(&mut self, page_keys: &[RowKey]) -> Vec<RowKey> {
        self.set_many(page_keys, true).0
    }
}
