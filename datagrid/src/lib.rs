//! Generic data-grid engine.
//!
//! Turns an in-memory row store plus a column descriptor into the rows of
//! one rendered page: filtered, grouped, sorted, paginated and annotated
//! with selection and expansion flags. Also manages column layout
//! (visibility, pinning, sizing) and permission-gated per-row actions.

pub mod actions;
pub mod aggregate;
pub mod column;
pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod layout;
pub mod pipeline;
pub mod row;
pub mod selection;
pub mod state;
pub mod value;

pub use actions::{
    ActionMenu, ActionVariant, Authorizer, Disabled, MenuEntry, PermissionFns, Requirement,
    RowAction, authorize,
};
pub use aggregate::Aggregation;
pub use column::{Capabilities, ColumnDef, ColumnRegistry};
pub use config::GridConfig;
pub use error::{GridError, LayoutError};
pub use filter::{FilterFn, FilterValue};
pub use grid::{DataGrid, GridId};
pub use layout::{ColumnLayout, DEFAULT_COLUMN_WIDTH, PinOffset};
pub use pipeline::{Derivation, RenderedRow, RowInfo, RowModel, derive, derive_indexed};
pub use row::RowKey;
pub use selection::Selection;
pub use state::{Direction, Expanded, Pagination, PinSide, Pinning, SortKey, ViewState};
pub use value::CellValue;

pub mod prelude {
    pub use crate::actions::{ActionMenu, ActionVariant, Authorizer, RowAction};
    pub use crate::aggregate::Aggregation;
    pub use crate::column::{ColumnDef, ColumnRegistry};
    pub use crate::config::GridConfig;
    pub use crate::error::{GridError, LayoutError};
    pub use crate::filter::{FilterFn, FilterValue};
    pub use crate::grid::DataGrid;
    pub use crate::row::RowKey;
    pub use crate::state::{Direction, PinSide, SortKey, ViewState};
    pub use crate::value::CellValue;
}
