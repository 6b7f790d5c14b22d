//! Grid configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::row::{RowIdFn, RowKey};
use crate::state::{Pinning, SortKey};

/// Called with the selected rows, resolved against the current row store,
/// whenever the selection changes.
pub type SelectionCallback<T> = Arc<dyn Fn(&[&T]) + Send + Sync>;

/// Per-grid options.
///
/// Every feature is enabled by default. A disabled feature turns its
/// mutators into logged no-ops and skips its defaults.
///
/// # Example
///
/// ```
/// use datagrid::{GridConfig, SortKey};
///
/// struct Product {
///     sku: String,
/// }
///
/// let config = GridConfig::<Product>::new()
///     .page_size(25)
///     .get_row_id(|p| p.sku.as_str().into())
///     .default_sort(vec![SortKey::asc("name")])
///     .enable_grouping(false);
/// ```
pub struct GridConfig<T> {
    pub page_size: usize,
    pub enable_sorting: bool,
    pub enable_multi_sort: bool,
    /// Upper bound on simultaneous sort keys (None = unlimited).
    pub max_multi_sort_col_count: Option<usize>,
    pub enable_global_filter: bool,
    pub enable_column_filtering: bool,
    pub enable_column_visibility: bool,
    pub enable_column_pinning: bool,
    pub enable_column_sizing: bool,
    pub enable_grouping: bool,
    pub enable_expanding: bool,
    pub enable_row_selection: bool,
    pub get_row_id: Option<RowIdFn<T>>,
    pub default_sort: Vec<SortKey>,
    pub default_column_visibility: BTreeMap<String, bool>,
    pub default_column_pinning: Pinning,
    pub default_column_sizing: BTreeMap<String, u32>,
    pub default_grouping: Vec<String>,
    pub on_row_selection_change: Option<SelectionCallback<T>>,
}

impl<T> Default for GridConfig<T> {
    fn default() -> Self {
        Self {
            page_size: 10,
            enable_sorting: true,
            enable_multi_sort: true,
            max_multi_sort_col_count: None,
            enable_global_filter: true,
            enable_column_filtering: true,
            enable_column_visibility: true,
            enable_column_pinning: true,
            enable_column_sizing: true,
            enable_grouping: true,
            enable_expanding: true,
            enable_row_selection: true,
            get_row_id: None,
            default_sort: Vec::new(),
            default_column_visibility: BTreeMap::new(),
            default_column_pinning: Pinning::default(),
            default_column_sizing: BTreeMap::new(),
            default_grouping: Vec::new(),
            on_row_selection_change: None,
        }
    }
}

impl<T> Clone for GridConfig<T> {
    fn clone(&self) -> Self {
        Self {
            page_size: self.page_size,
            enable_sorting: self.enable_sorting,
            enable_multi_sort: self.enable_multi_sort,
            max_multi_sort_col_count: self.max_multi_sort_col_count,
            enable_global_filter: self.enable_global_filter,
            enable_column_filtering: self.enable_column_filtering,
            enable_column_visibility: self.enable_column_visibility,
            enable_column_pinning: self.enable_column_pinning,
            enable_column_sizing: self.enable_column_sizing,
            enable_grouping: self.enable_grouping,
            enable_expanding: self.enable_expanding,
            enable_row_selection: self.enable_row_selection,
            get_row_id: self.get_row_id.clone(),
            default_sort: self.default_sort.clone(),
            default_column_visibility: self.default_column_visibility.clone(),
            default_column_pinning: self.default_column_pinning.clone(),
            default_column_sizing: self.default_column_sizing.clone(),
            default_grouping: self.default_grouping.clone(),
            on_row_selection_change: self.on_row_selection_change.clone(),
        }
    }
}

impl<T> fmt::Debug for GridConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridConfig")
            .field("page_size", &self.page_size)
            .field("enable_sorting", &self.enable_sorting)
            .field("enable_multi_sort", &self.enable_multi_sort)
            .field("enable_global_filter", &self.enable_global_filter)
            .field("enable_column_filtering", &self.enable_column_filtering)
            .field("enable_column_visibility", &self.enable_column_visibility)
            .field("enable_column_pinning", &self.enable_column_pinning)
            .field("enable_column_sizing", &self.enable_column_sizing)
            .field("enable_grouping", &self.enable_grouping)
            .field("enable_expanding", &self.enable_expanding)
            .field("enable_row_selection", &self.enable_row_selection)
            .field("get_row_id", &self.get_row_id.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> GridConfig<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows per page. Zero is treated as one.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Stable row identity. Required for selection to survive re-fetches.
    pub fn get_row_id<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> RowKey + Send + Sync + 'static,
    {
        self.get_row_id = Some(Arc::new(f));
        self
    }

    pub fn on_row_selection_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&[&T]) + Send + Sync + 'static,
    {
        self.on_row_selection_change = Some(Arc::new(f));
        self
    }

    pub fn enable_sorting(mut self, enabled: bool) -> Self {
        self.enable_sorting = enabled;
        self
    }

    pub fn enable_multi_sort(mut self, enabled: bool) -> Self {
        self.enable_multi_sort = enabled;
        self
    }

    pub fn max_multi_sort_col_count(mut self, max: usize) -> Self {
        self.max_multi_sort_col_count = Some(max);
        self
    }

    pub fn enable_global_filter(mut self, enabled: bool) -> Self {
        self.enable_global_filter = enabled;
        self
    }

    pub fn enable_column_filtering(mut self, enabled: bool) -> Self {
        self.enable_column_filtering = enabled;
        self
    }

    pub fn enable_column_visibility(mut self, enabled: bool) -> Self {
        self.enable_column_visibility = enabled;
        self
    }

    pub fn enable_column_pinning(mut self, enabled: bool) -> Self {
        self.enable_column_pinning = enabled;
        self
    }

    pub fn enable_column_sizing(mut self, enabled: bool) -> Self {
        self.enable_column_sizing = enabled;
        self
    }

    pub fn enable_grouping(mut self, enabled: bool) -> Self {
        self.enable_grouping = enabled;
        self
    }

    pub fn enable_expanding(mut self, enabled: bool) -> Self {
        self.enable_expanding = enabled;
        self
    }

    pub fn enable_row_selection(mut self, enabled: bool) -> Self {
        self.enable_row_selection = enabled;
        self
    }

    pub fn default_sort(mut self, sort: Vec<SortKey>) -> Self {
        self.default_sort = sort;
        self
    }

    pub fn default_column_visibility(mut self, visibility: BTreeMap<String, bool>) -> Self {
        self.default_column_visibility = visibility;
        self
    }

    pub fn default_column_pinning(mut self, pinning: Pinning) -> Self {
        self.default_column_pinning = pinning;
        self
    }

    pub fn default_column_sizing(mut self, sizing: BTreeMap<String, u32>) -> Self {
        self.default_column_sizing = sizing;
        self
    }

    pub fn default_grouping(mut self, grouping: Vec<String>) -> Self {
        self.default_grouping = grouping;
        self
    }
}
