//! Column descriptors.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::aggregate::Aggregation;
use crate::filter::FilterFn;
use crate::value::CellValue;

/// Reads the value of a column out of a row.
pub type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Produces the display text of a cell.
pub type Renderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Custom comparator over two cell values (ascending order).
pub type SortFn = Arc<dyn Fn(&CellValue, &CellValue) -> Ordering + Send + Sync>;

/// Per-column capability flags.
///
/// Every flag defaults to `true`. A column with `hideable = false` can
/// never leave the visible set and is not offered in the visibility
/// toggle UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub sortable: bool,
    pub groupable: bool,
    pub hideable: bool,
    pub pinnable: bool,
    pub resizable: bool,
    pub filterable: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            sortable: true,
            groupable: true,
            hideable: true,
            pinnable: true,
            resizable: true,
            filterable: true,
        }
    }
}

/// A table column definition.
///
/// # Example
///
/// ```
/// use datagrid::{Aggregation, ColumnDef};
///
/// struct Invoice {
///     customer: String,
///     amount: f64,
/// }
///
/// let columns = vec![
///     ColumnDef::new("customer", "Cliente", |i: &Invoice| i.customer.clone().into()),
///     ColumnDef::new("amount", "Monto", |i: &Invoice| i.amount.into())
///         .hideable(false)
///         .aggregate(Aggregation::Sum)
///         .width(120)
///         .min_width(80),
/// ];
/// ```
pub struct ColumnDef<T> {
    /// Unique identifier within the registry.
    pub key: String,
    /// Header text.
    pub header: String,
    pub(crate) accessor: Accessor<T>,
    pub(crate) render: Option<Renderer<T>>,
    /// Capability flags.
    pub capabilities: Capabilities,
    /// Width used until the column is resized.
    pub default_width: Option<u32>,
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
    pub(crate) filter_fn: FilterFn,
    pub(crate) sort_fn: Option<SortFn>,
    /// First click on the header sorts descending.
    pub sort_desc_first: bool,
    pub(crate) aggregation: Option<Aggregation>,
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            render: self.render.clone(),
            capabilities: self.capabilities,
            default_width: self.default_width,
            min_width: self.min_width,
            max_width: self.max_width,
            filter_fn: self.filter_fn.clone(),
            sort_fn: self.sort_fn.clone(),
            sort_desc_first: self.sort_desc_first,
            aggregation: self.aggregation.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("capabilities", &self.capabilities)
            .field("default_width", &self.default_width)
            .field("filter_fn", &self.filter_fn)
            .field("aggregation", &self.aggregation)
            .finish_non_exhaustive()
    }
}

impl<T> ColumnDef<T> {
    /// Create a column with the given key, header and accessor.
    pub fn new<F>(key: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            header: header.into(),
            accessor: Arc::new(accessor),
            render: None,
            capabilities: Capabilities::default(),
            default_width: None,
            min_width: None,
            max_width: None,
            filter_fn: FilterFn::default(),
            sort_fn: None,
            sort_desc_first: false,
            aggregation: None,
        }
    }

    /// Set a display renderer. Without one the stringified accessor
    /// value is displayed.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn sortable(mut self, value: bool) -> Self {
        self.capabilities.sortable = value;
        self
    }

    pub fn groupable(mut self, value: bool) -> Self {
        self.capabilities.groupable = value;
        self
    }

    pub fn hideable(mut self, value: bool) -> Self {
        self.capabilities.hideable = value;
        self
    }

    pub fn pinnable(mut self, value: bool) -> Self {
        self.capabilities.pinnable = value;
        self
    }

    pub fn resizable(mut self, value: bool) -> Self {
        self.capabilities.resizable = value;
        self
    }

    pub fn filterable(mut self, value: bool) -> Self {
        self.capabilities.filterable = value;
        self
    }

    /// Replace every capability flag at once.
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the default width.
    pub fn width(mut self, width: u32) -> Self {
        self.default_width = Some(width);
        self
    }

    pub fn min_width(mut self, width: u32) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Set how the column filter value is interpreted.
    pub fn filter_fn(mut self, filter_fn: FilterFn) -> Self {
        self.filter_fn = filter_fn;
        self
    }

    /// Use a custom ascending comparator instead of the value order.
    pub fn sort_fn<F>(mut self, sort_fn: F) -> Self
    where
        F: Fn(&CellValue, &CellValue) -> Ordering + Send + Sync + 'static,
    {
        self.sort_fn = Some(Arc::new(sort_fn));
        self
    }

    /// Start header sort toggling at descending (numbers, dates).
    pub fn sort_desc_first(mut self) -> Self {
        self.sort_desc_first = true;
        self
    }

    /// Summarize grouped rows with `aggregation`.
    pub fn aggregate(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Read this column's value from a row.
    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }

    /// Display text for this column's cell in `row`.
    pub fn display(&self, row: &T) -> String {
        match &self.render {
            Some(render) => render(row),
            None => self.value(row).to_string(),
        }
    }

    /// Compare two values with the column comparator (ascending).
    pub fn compare(&self, a: &CellValue, b: &CellValue) -> Ordering {
        match &self.sort_fn {
            Some(f) => f(a, b),
            None => a.total_cmp(b),
        }
    }

    /// Aggregation declared for grouped rows, if any.
    pub fn aggregation(&self) -> Option<&Aggregation> {
        self.aggregation.as_ref()
    }

    /// Clamp `width` to the declared bounds.
    pub fn clamp_width(&self, width: u32) -> u32 {
        let width = self.min_width.map_or(width, |min| width.max(min));
        self.max_width.map_or(width, |max| width.min(max))
    }
}
