//! Derivation pipeline: rows + columns + view state -> rendered rows.
//!
//! Stages run in a fixed order, each consuming the previous output:
//!
//! 1. filter   - column filters and the global filter
//! 2. group    - partition by the grouping columns (first-seen order)
//! 3. sort     - stable composite sort; groups sort by group value
//! 4. paginate - slice top-level rows, clamping the page index
//! 5. annotate - selection and expansion flags
//!
//! [`derive`] is pure: it reads the view state and never mutates it.
//! References to columns that no longer exist are skipped and logged.

mod filter;
mod group;
mod paginate;
mod sort;

use std::collections::BTreeMap;
use std::ops::Deref;

use crate::column::ColumnRegistry;
use crate::row::{RowIdFn, RowKey, key_of};
use crate::state::ViewState;
use crate::value::CellValue;

pub use paginate::{PageWindow, page_window};

use group::Node;

/// Everything the view knows about one rendered row except the row itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RowInfo {
    /// Row store index; for grouped rows, the first member's index.
    pub index: usize,
    pub key: RowKey,
    /// Nesting depth (0 = top level).
    pub depth: usize,
    pub is_grouped: bool,
    /// One value per active grouping column (grouped rows only).
    pub group_values: Vec<CellValue>,
    /// Number of members (grouped rows only).
    pub sub_row_count: Option<usize>,
    /// Keys of the members (grouped rows only).
    pub member_keys: Vec<RowKey>,
    /// Aggregated value per aggregating column (grouped rows only).
    pub aggregates: BTreeMap<String, CellValue>,
    /// Key of the grouped row this row is nested under.
    pub parent: Option<RowKey>,
    pub is_selected: bool,
    pub is_expanded: bool,
}

impl RowInfo {
    /// Keys that selecting this row affects: the row itself, or every
    /// member of a grouped row.
    pub fn selection_keys(&self) -> &[RowKey] {
        if self.is_grouped {
            &self.member_keys
        } else {
            std::slice::from_ref(&self.key)
        }
    }
}

/// A derived row, borrowing its original record from the row store.
///
/// Grouped rows carry the first member as `original`.
#[derive(Debug, PartialEq)]
pub struct RenderedRow<'a, T> {
    pub original: &'a T,
    pub info: RowInfo,
}

impl<T> Clone for RenderedRow<'_, T> {
    fn clone(&self) -> Self {
        Self {
            original: self.original,
            info: self.info.clone(),
        }
    }
}

impl<T> Deref for RenderedRow<'_, T> {
    type Target = RowInfo;

    fn deref(&self) -> &RowInfo {
        &self.info
    }
}

/// Index-based result of a derivation, independent of row lifetimes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derivation {
    pub rows: Vec<RowInfo>,
    /// Effective (clamped) page index.
    pub page_index: usize,
    pub page_count: usize,
    /// Top-level rows before pagination (groups when grouped).
    pub row_count: usize,
    /// Leaf rows passing the filters.
    pub filtered_count: usize,
}

impl Derivation {
    /// Attach the original records.
    ///
    /// `rows` must be the row store the derivation was computed from.
    pub fn materialize<'a, T>(&self, rows: &'a [T]) -> RowModel<'a, T> {
        RowModel {
            rows: self
                .rows
                .iter()
                .map(|info| RenderedRow {
                    original: &rows[info.index],
                    info: info.clone(),
                })
                .collect(),
            page_index: self.page_index,
            page_count: self.page_count,
            row_count: self.row_count,
            filtered_count: self.filtered_count,
        }
    }
}

/// The rendered rows of one page plus paging totals.
#[derive(Debug, PartialEq)]
pub struct RowModel<'a, T> {
    pub rows: Vec<RenderedRow<'a, T>>,
    pub page_index: usize,
    pub page_count: usize,
    pub row_count: usize,
    pub filtered_count: usize,
}

impl<'a, T> RowModel<'a, T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedRow<'a, T>> {
        self.rows.iter()
    }

    /// Keys of the rendered rows, in render order.
    pub fn visible_keys(&self) -> Vec<RowKey> {
        self.rows.iter().map(|r| r.key.clone()).collect()
    }

    /// Leaf keys materialized on this page; what "select all" selects.
    pub fn page_keys(&self) -> Vec<RowKey> {
        page_keys(self.rows.iter().map(|r| &r.info))
    }
}

pub(crate) fn page_keys<'i>(rows: impl Iterator<Item = &'i RowInfo>) -> Vec<RowKey> {
    let mut keys: Vec<RowKey> = Vec::new();
    for info in rows {
        for key in info.selection_keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    keys
}

/// Derive the rendered rows of the current page.
pub fn derive<'a, T>(
    rows: &'a [T],
    columns: &ColumnRegistry<T>,
    state: &ViewState,
    row_id: Option<&RowIdFn<T>>,
) -> RowModel<'a, T> {
    derive_indexed(rows, columns, state, row_id).materialize(rows)
}

/// Derive without borrowing rows into the output.
pub fn derive_indexed<T>(
    rows: &[T],
    columns: &ColumnRegistry<T>,
    state: &ViewState,
    row_id: Option<&RowIdFn<T>>,
) -> Derivation {
    let filtered = filter::filter_rows(rows, columns, state);

    let grouped_by = group::grouping_columns(columns, &state.grouping);
    let nodes = group::group_rows(rows, &filtered, columns, &grouped_by);

    let sort_keys = sort::resolve(columns, &state.sort, &grouped_by);
    let nodes = sort::sort_nodes(rows, nodes, &sort_keys);

    let window = page_window(
        nodes.len(),
        state.pagination.page_index,
        state.pagination.page_size,
    );
    if window.page_index != state.pagination.page_index {
        log::debug!(
            "Page index {} clamped to {} ({} rows)",
            state.pagination.page_index,
            window.page_index,
            nodes.len()
        );
    }

    let key_at = |i: usize| key_of(row_id, &rows[i], i);
    let mut out = Vec::with_capacity(window.range.len());
    for node in &nodes[window.range.clone()] {
        match node {
            Node::Leaf(i) => {
                let key = key_at(*i);
                out.push(RowInfo {
                    index: *i,
                    is_selected: state.selection.is_selected(&key),
                    key,
                    depth: 0,
                    is_grouped: false,
                    group_values: Vec::new(),
                    sub_row_count: None,
                    member_keys: Vec::new(),
                    aggregates: BTreeMap::new(),
                    parent: None,
                    is_expanded: false,
                });
            }
            Node::Group(g) => {
                let member_keys: Vec<RowKey> = g.members.iter().map(|&i| key_at(i)).collect();
                let is_expanded = state.expanded.contains(&g.key);
                let is_selected = !member_keys.is_empty()
                    && member_keys.iter().all(|k| state.selection.is_selected(k));
                out.push(RowInfo {
                    index: g.members[0],
                    key: g.key.clone(),
                    depth: 0,
                    is_grouped: true,
                    group_values: g.values.clone(),
                    sub_row_count: Some(g.members.len()),
                    member_keys: member_keys.clone(),
                    aggregates: g.aggregates.clone(),
                    parent: None,
                    is_selected,
                    is_expanded,
                });
                if is_expanded {
                    for (&i, member_key) in g.members.iter().zip(member_keys) {
                        out.push(RowInfo {
                            index: i,
                            is_selected: state.selection.is_selected(&member_key),
                            key: member_key,
                            depth: 1,
                            is_grouped: false,
                            group_values: Vec::new(),
                            sub_row_count: None,
                            member_keys: Vec::new(),
                            aggregates: BTreeMap::new(),
                            parent: Some(g.key.clone()),
                            is_expanded: false,
                        });
                    }
                }
            }
        }
    }

    log::trace!(
        "derive: {} rows -> {} filtered -> {} top-level -> {} rendered (page {}/{})",
        rows.len(),
        filtered.len(),
        nodes.len(),
        out.len(),
        window.page_index + 1,
        window.page_count
    );

    Derivation {
        rows: out,
        page_index: window.page_index,
        page_count: window.page_count,
        row_count: nodes.len(),
        filtered_count: filtered.len(),
    }
}
