//! Column layout: visibility, pinning and sizing.
//!
//! Mutators take the current snapshot and return the next one. Calls the
//! column's capability flags forbid return `None` (no-op); only resizing
//! reports a rejection as an error.

use crate::column::{ColumnDef, ColumnRegistry};
use crate::error::LayoutError;
use crate::state::{PinSide, ViewState};

/// Width used for columns without a declared or resized width.
pub const DEFAULT_COLUMN_WIDTH: u32 = 150;

/// Sticky offset of a pinned column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinOffset {
    pub column: String,
    pub side: PinSide,
    /// Distance from the left edge (left-pinned) or the right edge
    /// (right-pinned) of the grid.
    pub offset: u32,
}

/// Layout operations over one column registry.
#[derive(Debug)]
pub struct ColumnLayout<'a, T> {
    columns: &'a ColumnRegistry<T>,
}

impl<T> Clone for ColumnLayout<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ColumnLayout<'_, T> {}

impl<'a, T> ColumnLayout<'a, T> {
    pub fn new(columns: &'a ColumnRegistry<T>) -> Self {
        Self { columns }
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    /// Show or hide a column. No-op for unknown or non-hideable columns.
    pub fn set_visibility(&self, state: &ViewState, key: &str, visible: bool) -> Option<ViewState> {
        let Some(column) = self.columns.get(key) else {
            log::warn!("set_visibility: unknown column '{}'", key);
            return None;
        };
        if !column.capabilities.hideable {
            log::debug!("set_visibility: column '{}' cannot be hidden", key);
            return None;
        }
        if state.is_visible(key) == visible {
            return None;
        }
        Some(state.clone().with_visibility(key, visible))
    }

    /// Show or hide every hideable column.
    pub fn set_all_visible(&self, state: &ViewState, visible: bool) -> Option<ViewState> {
        let mut next = state.clone();
        for column in self.columns.iter().filter(|c| c.capabilities.hideable) {
            next = next.with_visibility(&column.key, visible);
        }
        (next != *state).then_some(next)
    }

    /// Columns offered in the visibility toggle UI.
    pub fn hideable_columns(&self) -> Vec<&'a ColumnDef<T>> {
        self.columns
            .iter()
            .filter(|c| c.capabilities.hideable)
            .collect()
    }

    /// Visible columns in render order: left-pinned (pin order), center
    /// (registry order), right-pinned (pin order).
    pub fn visible_columns(&self, state: &ViewState) -> Vec<&'a ColumnDef<T>> {
        let (left, center, right) = self.split_visible(state);
        left.into_iter().chain(center).chain(right).collect()
    }

    /// Visible columns split into (left, center, right) sections.
    pub fn split_visible(
        &self,
        state: &ViewState,
    ) -> (
        Vec<&'a ColumnDef<T>>,
        Vec<&'a ColumnDef<T>>,
        Vec<&'a ColumnDef<T>>,
    ) {
        let resolve = |keys: &[String]| -> Vec<&'a ColumnDef<T>> {
            keys.iter()
                .filter_map(|k| self.columns.get(k))
                .filter(|c| state.is_visible(&c.key))
                .collect()
        };
        let left = resolve(&state.pinning.left);
        let right = resolve(&state.pinning.right);
        let center = self
            .columns
            .iter()
            .filter(|c| state.is_visible(&c.key))
            .filter(|c| state.pinning.side_of(&c.key) == PinSide::None)
            .collect();
        (left, center, right)
    }

    // -------------------------------------------------------------------------
    // Pinning
    // -------------------------------------------------------------------------

    /// Pin a column to `side` (appending it to that side's list), or unpin
    /// it with `PinSide::None`. No-op for unknown or non-pinnable columns.
    pub fn pin(&self, state: &ViewState, key: &str, side: PinSide) -> Option<ViewState> {
        let Some(column) = self.columns.get(key) else {
            log::warn!("pin: unknown column '{}'", key);
            return None;
        };
        if !column.capabilities.pinnable {
            log::debug!("pin: column '{}' cannot be pinned", key);
            return None;
        }
        let next = state.clone().with_pin(key, side);
        (next != *state).then_some(next)
    }

    /// Sticky offsets for pinned, visible columns.
    ///
    /// Left offsets accumulate from the left edge in pin order; right
    /// offsets accumulate from the right edge, innermost last.
    pub fn pin_offsets(&self, state: &ViewState) -> Vec<PinOffset> {
        let (left, _, right) = self.split_visible(state);
        let mut offsets = Vec::with_capacity(left.len() + right.len());

        let mut x: u32 = 0;
        for column in left {
            offsets.push(PinOffset {
                column: column.key.clone(),
                side: PinSide::Left,
                offset: x,
            });
            x = x.saturating_add(self.width_of(column, state));
        }

        let mut x: u32 = 0;
        let mut right_offsets = Vec::with_capacity(right.len());
        for column in right.into_iter().rev() {
            right_offsets.push(PinOffset {
                column: column.key.clone(),
                side: PinSide::Right,
                offset: x,
            });
            x = x.saturating_add(self.width_of(column, state));
        }
        right_offsets.reverse();
        offsets.extend(right_offsets);
        offsets
    }

    // -------------------------------------------------------------------------
    // Sizing
    // -------------------------------------------------------------------------

    /// Resize a column, clamping to its declared bounds.
    pub fn resize(
        &self,
        state: &ViewState,
        key: &str,
        width: u32,
    ) -> Result<ViewState, LayoutError> {
        let column = self
            .columns
            .get(key)
            .ok_or_else(|| LayoutError::UnknownColumn(key.to_string()))?;
        if !column.capabilities.resizable {
            return Err(LayoutError::NotResizable(key.to_string()));
        }
        if width == 0 {
            return Err(LayoutError::InvalidWidth {
                column: key.to_string(),
                width,
            });
        }
        Ok(state.clone().with_size(key, Some(column.clamp_width(width))))
    }

    /// Drop a resized width, returning to the column default.
    pub fn reset_size(&self, state: &ViewState, key: &str) -> Option<ViewState> {
        state
            .sizing
            .contains_key(key)
            .then(|| state.clone().with_size(key, None))
    }

    /// Current width of a column, if it exists.
    pub fn column_width(&self, state: &ViewState, key: &str) -> Option<u32> {
        self.columns.get(key).map(|c| self.width_of(c, state))
    }

    /// Sum of the widths of all visible columns, saturating at `u32::MAX`.
    pub fn total_width(&self, state: &ViewState) -> u32 {
        self.visible_columns(state)
            .into_iter()
            .map(|c| self.width_of(c, state))
            .fold(0u32, u32::saturating_add)
    }

    fn width_of(&self, column: &ColumnDef<T>, state: &ViewState) -> u32 {
        let width = state
            .sizing
            .get(&column.key)
            .copied()
            .or(column.default_width)
            .unwrap_or(DEFAULT_COLUMN_WIDTH);
        column.clamp_width(width)
    }
}
