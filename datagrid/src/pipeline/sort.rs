//! Sort stage.

use std::cmp::Ordering;

use crate::column::{ColumnDef, ColumnRegistry};
use crate::state::{Direction, SortKey};
use crate::value::CellValue;

use super::group::Node;

/// A sort key resolved against the registry.
pub(super) struct ResolvedSort<'c, T> {
    column: &'c ColumnDef<T>,
    direction: Direction,
    /// Position among the grouping columns, if the column is grouped.
    group_position: Option<usize>,
}

/// Resolve sort keys, dropping stale, duplicate and non-sortable columns.
pub(super) fn resolve<'c, T>(
    columns: &'c ColumnRegistry<T>,
    sort: &[SortKey],
    grouped_by: &[&ColumnDef<T>],
) -> Vec<ResolvedSort<'c, T>> {
    let mut resolved: Vec<ResolvedSort<'c, T>> = Vec::with_capacity(sort.len());
    for key in sort {
        match columns.get(&key.column) {
            Some(c) if c.capabilities.sortable => {
                if resolved.iter().any(|r| r.column.key == c.key) {
                    continue;
                }
                resolved.push(ResolvedSort {
                    column: c,
                    direction: key.direction,
                    group_position: grouped_by.iter().position(|g| g.key == c.key),
                });
            }
            Some(_) => log::debug!("Ignoring sort on non-sortable column '{}'", key.column),
            None => log::warn!("Ignoring sort on unknown column '{}'", key.column),
        }
    }
    resolved
}

/// Stable sort of top-level nodes and of each group's members.
pub(super) fn sort_nodes<T>(
    rows: &[T],
    nodes: Vec<Node>,
    sort: &[ResolvedSort<'_, T>],
) -> Vec<Node> {
    if sort.is_empty() {
        return nodes;
    }

    // Sort values are read once per node, not once per comparison.
    let mut keyed: Vec<(Vec<CellValue>, Node)> = nodes
        .into_iter()
        .map(|node| (node_values(rows, &node, sort), node))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_values(a, b, sort));

    keyed
        .into_iter()
        .map(|(_, mut node)| {
            if let Node::Group(group) = &mut node {
                sort_members(rows, &mut group.members, sort);
            }
            node
        })
        .collect()
}

fn sort_members<T>(rows: &[T], members: &mut Vec<usize>, sort: &[ResolvedSort<'_, T>]) {
    let mut keyed: Vec<(Vec<CellValue>, usize)> = members
        .iter()
        .map(|&i| (sort.iter().map(|s| s.column.value(&rows[i])).collect(), i))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_values(a, b, sort));
    *members = keyed.into_iter().map(|(_, i)| i).collect();
}

/// The value a node sorts by for each sort key.
///
/// Grouped rows sort by their own group value when the sort column is a
/// grouping column, otherwise by the column aggregate. Columns that are
/// neither yield null, so groups tie and keep first-seen order.
fn node_values<T>(rows: &[T], node: &Node, sort: &[ResolvedSort<'_, T>]) -> Vec<CellValue> {
    sort.iter()
        .map(|s| match node {
            Node::Leaf(i) => s.column.value(&rows[*i]),
            Node::Group(group) => {
                if let Some(pos) = s.group_position {
                    group.values[pos].clone()
                } else {
                    group
                        .aggregates
                        .get(&s.column.key)
                        .cloned()
                        .unwrap_or_default()
                }
            }
        })
        .collect()
}

/// Composite comparator. Nulls sort last regardless of direction; full
/// ties return `Equal` so the stable sort keeps filtered order.
fn compare_values<T>(a: &[CellValue], b: &[CellValue], sort: &[ResolvedSort<'_, T>]) -> Ordering {
    for ((x, y), s) in a.iter().zip(b.iter()).zip(sort.iter()) {
        let ord = match (x.is_null(), y.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let asc = s.column.compare(x, y);
                match s.direction {
                    Direction::Asc => asc,
                    Direction::Desc => asc.reverse(),
                }
            }
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
