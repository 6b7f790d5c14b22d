//! Error types.
//!
//! Derivation itself never fails: stale column references and
//! out-of-range pages are recovered locally. These errors only come from
//! explicit mutators that reject their input.

use thiserror::Error;

/// Errors from the column layout manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The column key is not in the registry.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// The column declares `resizable = false`.
    #[error("Column '{0}' is not resizable")]
    NotResizable(String),

    /// Column sizing is disabled for this grid.
    #[error("Column sizing is disabled")]
    SizingDisabled,

    /// Widths must be positive.
    #[error("Invalid width {width} for column '{column}'")]
    InvalidWidth {
        /// The column being resized.
        column: String,
        /// The rejected width.
        width: u32,
    },
}

/// Errors from grid-level mutators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Page sizes must be at least one row.
    #[error("Page size must be at least 1")]
    InvalidPageSize,
}
