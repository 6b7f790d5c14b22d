//! Group stage.

use std::collections::{BTreeMap, HashMap};

use crate::column::{ColumnDef, ColumnRegistry};
use crate::row::RowKey;
use crate::value::CellValue;

/// A top-level entry of the derived view.
#[derive(Debug, Clone)]
pub(super) enum Node {
    /// A plain row, by row store index.
    Leaf(usize),
    /// A synthetic grouped row.
    Group(Group),
}

#[derive(Debug, Clone)]
pub(super) struct Group {
    pub key: RowKey,
    /// One value per grouping column.
    pub values: Vec<CellValue>,
    /// Member row indices, in filtered order until sorted.
    pub members: Vec<usize>,
    pub aggregates: BTreeMap<String, CellValue>,
}

/// Resolve grouping keys against the registry, dropping stale and
/// non-groupable columns.
pub(super) fn grouping_columns<'c, T>(
    columns: &'c ColumnRegistry<T>,
    grouping: &[String],
) -> Vec<&'c ColumnDef<T>> {
    let mut resolved: Vec<&ColumnDef<T>> = Vec::with_capacity(grouping.len());
    for key in grouping {
        match columns.get(key) {
            Some(c) if c.capabilities.groupable => {
                if !resolved.iter().any(|r| r.key == c.key) {
                    resolved.push(c);
                }
            }
            Some(_) => log::debug!("Ignoring grouping on non-groupable column '{}'", key),
            None => log::warn!("Ignoring grouping on unknown column '{}'", key),
        }
    }
    resolved
}

/// Partition `filtered` by the composite value of `by`, groups in
/// first-seen order. With no grouping columns every row stays a leaf.
pub(super) fn group_rows<T>(
    rows: &[T],
    filtered: &[usize],
    columns: &ColumnRegistry<T>,
    by: &[&ColumnDef<T>],
) -> Vec<Node> {
    if by.is_empty() {
        return filtered.iter().map(|&i| Node::Leaf(i)).collect();
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut lookup: HashMap<Vec<String>, usize> = HashMap::new();

    for &index in filtered {
        let values: Vec<CellValue> = by.iter().map(|c| c.value(&rows[index])).collect();
        let parts: Vec<String> = values.iter().map(composite_part).collect();
        match lookup.get(&parts) {
            Some(&g) => groups[g].members.push(index),
            None => {
                lookup.insert(parts.clone(), groups.len());
                groups.push(Group {
                    key: RowKey::group(&parts),
                    values,
                    members: vec![index],
                    aggregates: BTreeMap::new(),
                });
            }
        }
    }

    for group in &mut groups {
        group.aggregates = aggregate(rows, &group.members, columns);
    }

    log::trace!("group: {} rows into {} groups", filtered.len(), groups.len());
    groups.into_iter().map(Node::Group).collect()
}

fn aggregate<T>(
    rows: &[T],
    members: &[usize],
    columns: &ColumnRegistry<T>,
) -> BTreeMap<String, CellValue> {
    columns
        .iter()
        .filter_map(|column| {
            let aggregation = column.aggregation()?;
            let values: Vec<CellValue> = members.iter().map(|&i| column.value(&rows[i])).collect();
            Some((column.key.clone(), aggregation.apply(&values)))
        })
        .collect()
}

/// Stringified group key part, tagged with the value kind so `1` and
/// `"1"` land in different groups.
fn composite_part(value: &CellValue) -> String {
    format!("{}:{}", value.type_name(), value)
}
