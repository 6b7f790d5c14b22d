//! Filter stage.

use crate::column::ColumnRegistry;
use crate::filter::{PreparedFilter, contains_folded, new_matcher};
use crate::state::ViewState;

/// Indices of rows passing every column filter and the global filter,
/// in row store order.
pub(super) fn filter_rows<T>(
    rows: &[T],
    columns: &ColumnRegistry<T>,
    state: &ViewState,
) -> Vec<usize> {
    let mut prepared = Vec::new();
    for (key, value) in &state.column_filters {
        if value.is_empty() {
            continue;
        }
        let Some(column) = columns.get(key) else {
            log::warn!("Ignoring filter on unknown column '{}'", key);
            continue;
        };
        if !column.capabilities.filterable {
            log::debug!("Ignoring filter on non-filterable column '{}'", key);
            continue;
        }
        prepared.push((column, PreparedFilter::prepare(key, &column.filter_fn, value)));
    }

    // Blank text disables the global filter; otherwise the text is matched
    // as typed, surrounding whitespace included.
    let needle = if state.global_filter.trim().is_empty() {
        String::new()
    } else {
        state.global_filter.to_lowercase()
    };
    let global_columns: Vec<_> = if needle.is_empty() {
        Vec::new()
    } else {
        columns
            .iter()
            .filter(|c| c.capabilities.filterable && state.is_visible(&c.key))
            .collect()
    };

    if prepared.is_empty() && needle.is_empty() {
        return (0..rows.len()).collect();
    }

    let mut matcher = new_matcher();
    let kept: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let columns_ok = prepared
                .iter()
                .all(|(column, filter)| filter.matches(&column.value(row), &mut matcher));
            columns_ok
                && (needle.is_empty()
                    || global_columns
                        .iter()
                        .any(|c| contains_folded(&c.value(row), &needle)))
        })
        .map(|(i, _)| i)
        .collect();

    log::trace!("filter: {} of {} rows kept", kept.len(), rows.len());
    kept
}
