//! Grid engine instance.
//!
//! `DataGrid<T>` owns the row store, the column registry, the config and
//! the view state of one grid. Every mutator replaces the view state with
//! a new snapshot; [`DataGrid::row_model`] re-derives lazily and reuses
//! the last derivation while rows, columns and state are unchanged.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::column::{ColumnDef, ColumnRegistry};
use crate::config::GridConfig;
use crate::error::GridError;
use crate::filter::FilterValue;
use crate::layout::{ColumnLayout, PinOffset};
use crate::pipeline::{Derivation, RowInfo, RowModel, derive_indexed, page_keys};
use crate::row::{RowKey, key_of};
use crate::selection::Selection;
use crate::state::{Direction, Expanded, Pagination, PinSide, SortKey, ViewState};

/// Unique identifier for a grid instance, used in log output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GridId(Uuid);

impl GridId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for GridId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__grid_{}", self.0.simple())
    }
}

/// Inputs the cached derivation was computed from.
#[derive(Debug, PartialEq)]
struct CacheKey {
    rows_revision: u64,
    columns_revision: u64,
    state: ViewState,
}

/// A data grid: rows, columns, config and view state.
///
/// # Example
///
/// ```
/// use datagrid::{ColumnDef, DataGrid, GridConfig};
///
/// #[derive(Debug)]
/// struct Customer {
///     id: u32,
///     name: String,
/// }
///
/// let mut grid = DataGrid::new(GridConfig::new().get_row_id(|c: &Customer| c.id.into()));
/// grid.set_columns(vec![ColumnDef::new("name", "Nombre", |c: &Customer| {
///     c.name.clone().into()
/// })]);
/// grid.set_rows(vec![Customer { id: 1, name: "Ana".into() }]);
///
/// grid.set_global_filter("an");
/// assert_eq!(grid.row_model().len(), 1);
/// ```
pub struct DataGrid<T> {
    id: GridId,
    config: GridConfig<T>,
    rows: Vec<T>,
    rows_revision: u64,
    columns: ColumnRegistry<T>,
    columns_revision: u64,
    state: ViewState,
    cache_key: Option<CacheKey>,
    derivation: Derivation,
}

impl<T> std::fmt::Debug for DataGrid<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("id", &self.id)
            .field("rows", &self.rows.len())
            .field("columns", &self.columns)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T> DataGrid<T> {
    /// Create an empty grid.
    pub fn new(config: GridConfig<T>) -> Self {
        let state = Self::initial_state(&config);
        Self {
            id: GridId::new(),
            config,
            rows: Vec::new(),
            rows_revision: 0,
            columns: ColumnRegistry::default(),
            columns_revision: 0,
            state,
            cache_key: None,
            derivation: Derivation::default(),
        }
    }

    /// Create a grid with initial rows and columns.
    pub fn with_data(config: GridConfig<T>, rows: Vec<T>, columns: Vec<ColumnDef<T>>) -> Self {
        let mut grid = Self::new(config);
        grid.set_columns(columns);
        grid.set_rows(rows);
        grid
    }

    fn initial_state(config: &GridConfig<T>) -> ViewState {
        let mut state = ViewState::default().with_pagination(Pagination {
            page_index: 0,
            page_size: config.page_size.max(1),
        });
        if config.enable_sorting {
            state = state.with_sort(config.default_sort.clone());
        }
        if config.enable_column_visibility {
            state = state.with_visibility_map(config.default_column_visibility.clone());
        }
        if config.enable_column_pinning {
            state = state.with_pinning(config.default_column_pinning.clone());
        }
        if config.enable_column_sizing {
            state = state.with_sizing(config.default_column_sizing.clone());
        }
        if config.enable_grouping {
            state = state.with_grouping(config.default_grouping.clone());
        }
        state
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    pub fn config(&self) -> &GridConfig<T> {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replace the row store. Selection and expansion are kept by key.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        log::debug!("{}: set_rows ({} rows)", self.id, rows.len());
        self.rows = rows;
        self.rows_revision += 1;
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Replace the column registry. View state referring to removed
    /// columns is kept and ignored during derivation.
    pub fn set_columns(&mut self, columns: impl Into<ColumnRegistry<T>>) {
        self.columns = columns.into();
        self.columns_revision += 1;
        log::debug!("{}: set_columns ({} columns)", self.id, self.columns.len());
    }

    pub fn columns(&self) -> &ColumnRegistry<T> {
        &self.columns
    }

    /// Key of the row at `index` in the row store.
    pub fn row_key(&self, index: usize) -> Option<RowKey> {
        self.rows
            .get(index)
            .map(|row| key_of(self.config.get_row_id.as_ref(), row, index))
    }

    /// Find a row by key.
    pub fn find_row(&self, key: &RowKey) -> Option<&T> {
        self.rows
            .iter()
            .enumerate()
            .find(|(i, row)| key_of(self.config.get_row_id.as_ref(), row, *i) == *key)
            .map(|(_, row)| row)
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Replace the whole view state (e.g. restoring a snapshot).
    pub fn set_state(&mut self, state: ViewState) {
        let previous = std::mem::replace(&mut self.state, state);
        if previous.selection != self.state.selection {
            self.notify_selection();
        }
    }

    /// Restore the state the grid started with.
    pub fn reset(&mut self) {
        log::debug!("{}: reset", self.id);
        self.set_state(Self::initial_state(&self.config));
    }

    fn update(&mut self, next: ViewState) -> bool {
        if next == self.state {
            return false;
        }
        self.state = next;
        true
    }

    // -------------------------------------------------------------------------
    // Derivation
    // -------------------------------------------------------------------------

    /// Derive (or reuse) the current page of rendered rows.
    pub fn row_model(&mut self) -> RowModel<'_, T> {
        self.refresh();
        self.derivation.materialize(&self.rows)
    }

    /// Bring the cached derivation up to date and return it.
    pub fn recompute(&mut self) -> &Derivation {
        self.refresh();
        &self.derivation
    }

    /// Re-derive if rows, columns or state changed since the last run.
    ///
    /// A page index past the end of the derived rows is clamped and
    /// written back into the view state.
    fn refresh(&mut self) {
        let fresh = self.cache_key.as_ref().is_some_and(|key| {
            key.rows_revision == self.rows_revision
                && key.columns_revision == self.columns_revision
                && key.state == self.state
        });
        if fresh {
            log::trace!("{}: derivation cache hit", self.id);
            return;
        }

        log::trace!("{}: derivation cache miss", self.id);
        let derivation = derive_indexed(
            &self.rows,
            &self.columns,
            &self.state,
            self.config.get_row_id.as_ref(),
        );
        if derivation.page_index != self.state.pagination.page_index {
            self.state = self.state.clone().with_page_index(derivation.page_index);
        }
        self.derivation = derivation;
        self.cache_key = Some(CacheKey {
            rows_revision: self.rows_revision,
            columns_revision: self.columns_revision,
            state: self.state.clone(),
        });
    }

    fn derived_rows(&mut self) -> Vec<RowInfo> {
        self.recompute().rows.clone()
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Cycle a column's sort: none -> first direction -> reverse -> none.
    ///
    /// With `multi` (and multi-sort enabled) the column is added to or
    /// updated in the sort list; otherwise it replaces the list.
    pub fn toggle_sorting(&mut self, key: &str, multi: bool) {
        if !self.config.enable_sorting {
            log::debug!("{}: sorting disabled", self.id);
            return;
        }
        let Some(column) = self.columns.get(key) else {
            log::warn!("{}: toggle_sorting on unknown column '{}'", self.id, key);
            return;
        };
        if !column.capabilities.sortable {
            log::debug!("{}: column '{}' is not sortable", self.id, key);
            return;
        }

        let first = if column.sort_desc_first {
            Direction::Desc
        } else {
            Direction::Asc
        };
        let next_direction = match self.state.sort_direction(key) {
            None => Some(first),
            Some(d) if d == first => Some(first.reversed()),
            Some(_) => None,
        };

        let multi = multi && self.config.enable_multi_sort;
        let mut sort = if multi {
            self.state.sort.clone()
        } else {
            self.state
                .sort
                .iter()
                .filter(|s| s.column == key)
                .cloned()
                .collect()
        };

        match next_direction {
            Some(direction) => match sort.iter_mut().find(|s| s.column == key) {
                Some(existing) => existing.direction = direction,
                None => sort.push(SortKey {
                    column: key.to_string(),
                    direction,
                }),
            },
            None => sort.retain(|s| s.column != key),
        }

        if let Some(max) = self.config.max_multi_sort_col_count
            && sort.len() > max
        {
            sort.drain(..sort.len() - max);
        }

        let next = self.state.clone().with_sort(sort);
        self.update(next);
    }

    /// Replace the sort list.
    pub fn set_sorting(&mut self, sort: Vec<SortKey>) {
        if !self.config.enable_sorting {
            log::debug!("{}: sorting disabled", self.id);
            return;
        }
        let next = self.state.clone().with_sort(sort);
        self.update(next);
    }

    pub fn clear_sorting(&mut self) {
        let next = self.state.clone().with_sort(Vec::new());
        self.update(next);
    }

    pub fn sort_direction(&self, key: &str) -> Option<Direction> {
        self.state.sort_direction(key)
    }

    pub fn sort_index(&self, key: &str) -> Option<usize> {
        self.state.sort_index(key)
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Set (or clear with `None` / an empty value) a column filter.
    pub fn set_column_filter(&mut self, key: &str, value: Option<FilterValue>) {
        if !self.config.enable_column_filtering {
            log::debug!("{}: column filtering disabled", self.id);
            return;
        }
        match self.columns.get(key) {
            Some(column) if column.capabilities.filterable => {}
            Some(_) => {
                log::debug!("{}: column '{}' is not filterable", self.id, key);
                return;
            }
            None => {
                log::warn!("{}: filter on unknown column '{}'", self.id, key);
                return;
            }
        }
        let next = self.state.clone().with_column_filter(key, value);
        self.update(next);
    }

    pub fn column_filter(&self, key: &str) -> Option<&FilterValue> {
        self.state.column_filters.get(key)
    }

    pub fn reset_column_filters(&mut self) {
        let next = self.state.clone().with_column_filters(Default::default());
        self.update(next);
    }

    pub fn set_global_filter(&mut self, text: impl Into<String>) {
        if !self.config.enable_global_filter {
            log::debug!("{}: global filter disabled", self.id);
            return;
        }
        let next = self.state.clone().with_global_filter(text);
        self.update(next);
    }

    pub fn global_filter(&self) -> &str {
        &self.state.global_filter
    }

    pub fn reset_global_filter(&mut self) {
        let next = self.state.clone().with_global_filter(String::new());
        self.update(next);
    }

    // -------------------------------------------------------------------------
    // Column layout
    // -------------------------------------------------------------------------

    pub fn layout(&self) -> ColumnLayout<'_, T> {
        ColumnLayout::new(&self.columns)
    }

    /// Show or hide a column. Non-hideable columns are left as they are.
    pub fn set_column_visibility(&mut self, key: &str, visible: bool) {
        if !self.config.enable_column_visibility {
            log::debug!("{}: column visibility disabled", self.id);
            return;
        }
        if let Some(next) = self.layout().set_visibility(&self.state, key, visible) {
            self.update(next);
        }
    }

    pub fn toggle_column_visibility(&mut self, key: &str) {
        let visible = self.state.is_visible(key);
        self.set_column_visibility(key, !visible);
    }

    pub fn toggle_all_columns_visible(&mut self, visible: bool) {
        if !self.config.enable_column_visibility {
            log::debug!("{}: column visibility disabled", self.id);
            return;
        }
        if let Some(next) = self.layout().set_all_visible(&self.state, visible) {
            self.update(next);
        }
    }

    pub fn is_column_visible(&self, key: &str) -> bool {
        self.state.is_visible(key)
    }

    /// Visible columns in render order (left pinned, center, right pinned).
    pub fn visible_columns(&self) -> Vec<&ColumnDef<T>> {
        self.layout().visible_columns(&self.state)
    }

    /// Pin a column to a side, or unpin it with `PinSide::None`.
    pub fn pin_column(&mut self, key: &str, side: PinSide) {
        if !self.config.enable_column_pinning {
            log::debug!("{}: column pinning disabled", self.id);
            return;
        }
        if let Some(next) = self.layout().pin(&self.state, key, side) {
            self.update(next);
        }
    }

    pub fn pin_side(&self, key: &str) -> PinSide {
        self.state.pinning.side_of(key)
    }

    pub fn pin_offsets(&self) -> Vec<PinOffset> {
        self.layout().pin_offsets(&self.state)
    }

    /// Resize a column; returns the width actually applied after clamping.
    pub fn resize_column(&mut self, key: &str, width: u32) -> Result<u32, GridError> {
        if !self.config.enable_column_sizing {
            return Err(crate::error::LayoutError::SizingDisabled.into());
        }
        let next = self.layout().resize(&self.state, key, width)?;
        let applied = next.sizing.get(key).copied().unwrap_or(width);
        self.update(next);
        Ok(applied)
    }

    pub fn reset_column_size(&mut self, key: &str) {
        if let Some(next) = self.layout().reset_size(&self.state, key) {
            self.update(next);
        }
    }

    pub fn reset_column_sizing(&mut self) {
        let next = self
            .state
            .clone()
            .with_sizing(self.config.default_column_sizing.clone());
        self.update(next);
    }

    pub fn column_width(&self, key: &str) -> Option<u32> {
        self.layout().column_width(&self.state, key)
    }

    pub fn total_width(&self) -> u32 {
        self.layout().total_width(&self.state)
    }

    // -------------------------------------------------------------------------
    // Grouping & expanding
    // -------------------------------------------------------------------------

    /// Add or remove a column from the grouping list.
    pub fn toggle_grouping(&mut self, key: &str) {
        if !self.config.enable_grouping {
            log::debug!("{}: grouping disabled", self.id);
            return;
        }
        match self.columns.get(key) {
            Some(c) if c.capabilities.groupable => {}
            _ => {
                log::debug!("{}: column '{}' cannot be grouped", self.id, key);
                return;
            }
        }
        let mut grouping = self.state.grouping.clone();
        if grouping.iter().any(|g| g == key) {
            grouping.retain(|g| g != key);
        } else {
            grouping.push(key.to_string());
        }
        let next = self.state.clone().with_grouping(grouping);
        self.update(next);
    }

    pub fn set_grouping(&mut self, grouping: Vec<String>) {
        if !self.config.enable_grouping {
            log::debug!("{}: grouping disabled", self.id);
            return;
        }
        let next = self.state.clone().with_grouping(grouping);
        self.update(next);
    }

    pub fn clear_grouping(&mut self) {
        let next = self.state.clone().with_grouping(Vec::new());
        self.update(next);
    }

    pub fn is_grouped(&self, key: &str) -> bool {
        self.state.grouping.iter().any(|g| g == key)
    }

    pub fn toggle_expanded(&mut self, key: &RowKey) {
        if !self.config.enable_expanding {
            log::debug!("{}: expanding disabled", self.id);
            return;
        }
        let expanded = match self.state.expanded.clone() {
            Expanded::All => {
                // Collapsing one row out of "all" needs the concrete set.
                let mut keys: BTreeSet<RowKey> = self
                    .derived_rows()
                    .into_iter()
                    .filter(|r| r.is_grouped)
                    .map(|r| r.key)
                    .collect();
                keys.remove(key);
                Expanded::Keys(keys)
            }
            Expanded::Keys(mut keys) => {
                if !keys.remove(key) {
                    keys.insert(key.clone());
                }
                Expanded::Keys(keys)
            }
        };
        let next = self.state.clone().with_expanded(expanded);
        self.update(next);
    }

    pub fn set_expanded_all(&mut self, expanded: bool) {
        if !self.config.enable_expanding {
            log::debug!("{}: expanding disabled", self.id);
            return;
        }
        let value = if expanded {
            Expanded::All
        } else {
            Expanded::default()
        };
        let next = self.state.clone().with_expanded(value);
        self.update(next);
    }

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.state.expanded.contains(key)
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Go to a page; out-of-range indices are clamped on the next derive.
    pub fn set_page_index(&mut self, page_index: usize) {
        let next = self.state.clone().with_page_index(page_index);
        self.update(next);
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), GridError> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize);
        }
        let next = self.state.clone().with_pagination(Pagination {
            page_index: 0,
            page_size,
        });
        self.update(next);
        Ok(())
    }

    pub fn page_index(&mut self) -> usize {
        self.recompute().page_index
    }

    pub fn page_size(&self) -> usize {
        self.state.pagination.page_size
    }

    pub fn page_count(&mut self) -> usize {
        self.recompute().page_count
    }

    /// Top-level rows before pagination.
    pub fn row_count(&mut self) -> usize {
        self.recompute().row_count
    }

    pub fn can_previous_page(&mut self) -> bool {
        self.recompute().page_index > 0
    }

    pub fn can_next_page(&mut self) -> bool {
        let d = self.recompute();
        d.page_index + 1 < d.page_count
    }

    pub fn next_page(&mut self) {
        if self.can_next_page() {
            let index = self.state.pagination.page_index + 1;
            self.set_page_index(index);
        }
    }

    pub fn previous_page(&mut self) {
        if self.can_previous_page() {
            let index = self.state.pagination.page_index - 1;
            self.set_page_index(index);
        }
    }

    pub fn first_page(&mut self) {
        self.set_page_index(0);
    }

    pub fn last_page(&mut self) {
        let last = self.page_count().saturating_sub(1);
        self.set_page_index(last);
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    fn set_selection(&mut self, selection: Selection) {
        let next = self.state.clone().with_selection(selection);
        if self.update(next) {
            self.notify_selection();
        }
    }

    fn notify_selection(&self) {
        if let Some(callback) = &self.config.on_row_selection_change {
            let rows = self.selected_rows();
            log::debug!("{}: selection changed ({} rows)", self.id, rows.len());
            callback(&rows);
        }
    }

    fn selection_enabled(&self) -> bool {
        if !self.config.enable_row_selection {
            log::debug!("{}: row selection disabled", self.id);
        }
        self.config.enable_row_selection
    }

    /// Toggle a row. Toggling a grouped row selects every member unless
    /// all are already selected, in which case it deselects them.
    pub fn toggle_row_selected(&mut self, key: &RowKey) {
        if !self.selection_enabled() {
            return;
        }
        let group = self
            .derived_rows()
            .into_iter()
            .find(|r| r.is_grouped && r.key == *key);
        let mut selection = self.state.selection.clone();
        match group {
            Some(group) => {
                let all = selection.is_all_selected(&group.member_keys);
                selection.set_many(&group.member_keys, !all);
            }
            None if key.is_group() => {
                log::debug!("Group '{}' is not on the current page", key);
                return;
            }
            None => {
                selection.toggle(key);
            }
        }
        self.set_selection(selection);
    }

    /// Select exactly one row.
    pub fn select_row(&mut self, key: &RowKey) {
        if !self.selection_enabled() {
            return;
        }
        let mut selection = self.state.selection.clone();
        selection.select(key);
        self.set_selection(selection);
    }

    /// Shift-click selection from the anchor to `key` over the current page.
    pub fn select_range(&mut self, key: &RowKey, extend: bool) {
        if !self.selection_enabled() {
            return;
        }
        let ordered = page_keys(self.derived_rows().iter());
        let mut selection = self.state.selection.clone();
        selection.range_select(key, &ordered, extend);
        self.set_selection(selection);
    }

    /// Select every row materialized on the current page.
    pub fn select_all_page(&mut self) {
        if !self.selection_enabled() {
            return;
        }
        let keys = self.page_keys();
        let mut selection = self.state.selection.clone();
        selection.select_all(&keys);
        self.set_selection(selection);
    }

    /// Header checkbox: select the page unless it is fully selected,
    /// otherwise deselect it.
    pub fn toggle_all_page_selected(&mut self) {
        if !self.selection_enabled() {
            return;
        }
        let keys = self.page_keys();
        let mut selection = self.state.selection.clone();
        let all = selection.is_all_selected(&keys);
        selection.set_many(&keys, !all);
        self.set_selection(selection);
    }

    pub fn clear_selection(&mut self) {
        let mut selection = self.state.selection.clone();
        selection.clear();
        self.set_selection(selection);
    }

    /// Leaf keys materialized on the current page.
    pub fn page_keys(&mut self) -> Vec<RowKey> {
        page_keys(self.recompute().rows.iter())
    }

    pub fn is_row_selected(&self, key: &RowKey) -> bool {
        self.state.selection.is_selected(key)
    }

    pub fn is_all_selected(&self, visible: &[RowKey]) -> bool {
        self.state.selection.is_all_selected(visible)
    }

    pub fn is_partially_selected(&self, visible: &[RowKey]) -> bool {
        self.state.selection.is_partially_selected(visible)
    }

    pub fn is_all_page_selected(&mut self) -> bool {
        let keys = self.page_keys();
        self.state.selection.is_all_selected(&keys)
    }

    pub fn is_some_page_selected(&mut self) -> bool {
        let keys = self.page_keys();
        self.state.selection.is_partially_selected(&keys)
    }

    pub fn selected_keys(&self) -> Vec<RowKey> {
        self.state.selection.keys().cloned().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.state.selection.len()
    }

    /// Selected rows present in the current row store, in store order.
    pub fn selected_rows(&self) -> Vec<&T> {
        if self.state.selection.is_empty() {
            return Vec::new();
        }
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, row)| {
                let key = key_of(self.config.get_row_id.as_ref(), row, *i);
                self.state.selection.is_selected(&key)
            })
            .map(|(_, row)| row)
            .collect()
    }
}
