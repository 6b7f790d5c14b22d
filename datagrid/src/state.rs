//! View state: everything interactive about a grid that is not the data.
//!
//! `ViewState` is plain data. Updates go through the `with_*` methods,
//! which consume the snapshot and return the next one, so the engine can
//! compare snapshots to decide whether a cached derivation is still valid.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::filter::FilterValue;
use crate::row::RowKey;
use crate::selection::Selection;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// One entry of a multi-column sort. Earlier entries take priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: Direction,
}

impl SortKey {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

/// Side a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinSide {
    Left,
    Right,
    /// Not pinned; used to unpin.
    None,
}

/// Left/right pinned column lists, each in pin order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pinning {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Pinning {
    /// Side the column is currently pinned to.
    pub fn side_of(&self, column: &str) -> PinSide {
        if self.left.iter().any(|c| c == column) {
            PinSide::Left
        } else if self.right.iter().any(|c| c == column) {
            PinSide::Right
        } else {
            PinSide::None
        }
    }

    /// Remove the column from both sides, then append it to `side`.
    pub(crate) fn pinned(mut self, column: &str, side: PinSide) -> Self {
        self.left.retain(|c| c != column);
        self.right.retain(|c| c != column);
        match side {
            PinSide::Left => self.left.push(column.to_string()),
            PinSide::Right => self.right.push(column.to_string()),
            PinSide::None => {}
        }
        self
    }
}

/// Expanded grouped rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expanded {
    /// Every grouped row is expanded.
    All,
    /// Only the listed rows are expanded.
    Keys(BTreeSet<RowKey>),
}

impl Default for Expanded {
    fn default() -> Self {
        Expanded::Keys(BTreeSet::new())
    }
}

impl Expanded {
    pub fn contains(&self, key: &RowKey) -> bool {
        match self {
            Expanded::All => true,
            Expanded::Keys(keys) => keys.contains(key),
        }
    }
}

/// Current page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 10,
        }
    }
}

/// Snapshot of all grid view state.
///
/// Column keys in any field may go stale when the column registry
/// changes; derivation ignores keys it cannot resolve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub sort: Vec<SortKey>,
    pub column_filters: BTreeMap<String, FilterValue>,
    pub global_filter: String,
    /// Absence means visible.
    pub visibility: BTreeMap<String, bool>,
    pub pinning: Pinning,
    pub sizing: BTreeMap<String, u32>,
    pub grouping: Vec<String>,
    pub expanded: Expanded,
    pub selection: Selection,
    pub pagination: Pagination,
}

impl ViewState {
    /// Whether the column is visible.
    pub fn is_visible(&self, column: &str) -> bool {
        self.visibility.get(column).copied().unwrap_or(true)
    }

    /// Direction the column is sorted in, if sorted.
    pub fn sort_direction(&self, column: &str) -> Option<Direction> {
        self.sort
            .iter()
            .find(|s| s.column == column)
            .map(|s| s.direction)
    }

    /// Priority of the column within the sort list.
    pub fn sort_index(&self, column: &str) -> Option<usize> {
        self.sort.iter().position(|s| s.column == column)
    }

    pub fn with_sort(mut self, sort: Vec<SortKey>) -> Self {
        self.sort = sort;
        self
    }

    /// Set or clear (empty value) one column filter.
    pub fn with_column_filter(mut self, column: &str, value: Option<FilterValue>) -> Self {
        match value {
            Some(v) if !v.is_empty() => {
                self.column_filters.insert(column.to_string(), v);
            }
            _ => {
                self.column_filters.remove(column);
            }
        }
        self
    }

    pub fn with_column_filters(mut self, filters: BTreeMap<String, FilterValue>) -> Self {
        self.column_filters = filters;
        self
    }

    pub fn with_global_filter(mut self, text: impl Into<String>) -> Self {
        self.global_filter = text.into();
        self
    }

    pub fn with_visibility(mut self, column: &str, visible: bool) -> Self {
        self.visibility.insert(column.to_string(), visible);
        self
    }

    pub fn with_visibility_map(mut self, visibility: BTreeMap<String, bool>) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_pin(mut self, column: &str, side: PinSide) -> Self {
        self.pinning = self.pinning.pinned(column, side);
        self
    }

    pub fn with_pinning(mut self, pinning: Pinning) -> Self {
        self.pinning = pinning;
        self
    }

    /// Set (or with `None`, reset) one column width.
    pub fn with_size(mut self, column: &str, width: Option<u32>) -> Self {
        match width {
            Some(w) => {
                self.sizing.insert(column.to_string(), w);
            }
            None => {
                self.sizing.remove(column);
            }
        }
        self
    }

    pub fn with_sizing(mut self, sizing: BTreeMap<String, u32>) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn with_grouping(mut self, grouping: Vec<String>) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_expanded(mut self, expanded: Expanded) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_page_index(mut self, page_index: usize) -> Self {
        self.pagination.page_index = page_index;
        self
    }
}
