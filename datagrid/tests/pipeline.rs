//! Tests for the derivation pipeline.

mod common;

use common::{Customer, customers, id_fn, ids, registry};
use datagrid::{
    CellValue, ColumnDef, ColumnRegistry, FilterValue, Pagination, SortKey, ViewState, derive,
    derive_indexed,
};

fn page(page_index: usize, page_size: usize) -> ViewState {
    ViewState::default().with_pagination(Pagination {
        page_index,
        page_size,
    })
}

#[test]
fn test_paginates_25_rows_into_3_pages() {
    let rows = customers(25);
    let columns = registry();
    let id = id_fn();

    let model = derive(&rows, &columns, &page(0, 10), Some(&id));
    assert_eq!(model.len(), 10);
    assert_eq!(model.page_count, 3);
    assert_eq!(model.row_count, 25);
    assert_eq!(ids(&model), (1..=10).collect::<Vec<_>>());

    let last = derive(&rows, &columns, &page(2, 10), Some(&id));
    assert_eq!(ids(&last), (21..=25).collect::<Vec<_>>());
}

#[test]
fn test_page_index_is_clamped() {
    let rows = customers(25);
    let model = derive(&rows, &registry(), &page(7, 10), None);
    assert_eq!(model.page_index, 2);
    assert_eq!(model.len(), 5);
}

#[test]
fn test_empty_row_store() {
    let rows: Vec<Customer> = Vec::new();
    let model = derive(&rows, &registry(), &page(3, 10), None);
    assert!(model.is_empty());
    assert_eq!(model.page_index, 0);
    assert_eq!(model.page_count, 0);
}

#[test]
fn test_positional_keys_without_row_id() {
    let rows = customers(3);
    let model = derive(&rows, &registry(), &ViewState::default(), None);
    let keys: Vec<&str> = model.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["0", "1", "2"]);
}

#[test]
fn test_global_filter_is_case_insensitive() {
    let rows = customers(25);
    let state = page(0, 10).with_global_filter("CUSTOMER 0");
    let model = derive(&rows, &registry(), &state, None);
    assert_eq!(ids(&model), (1..=9).collect::<Vec<_>>());
    assert_eq!(model.filtered_count, 9);
}

#[test]
fn test_global_filter_ignores_hidden_columns() {
    let rows = customers(25);
    let state = page(0, 25).with_global_filter("quito");
    let model = derive(&rows, &registry(), &state, None);
    assert_eq!(ids(&model), vec![2, 5, 8, 11, 14, 17, 20, 23]);

    let hidden = state.with_visibility("city", false);
    let model = derive(&rows, &registry(), &hidden, None);
    assert!(model.is_empty());
}

#[test]
fn test_column_filter_in_range() {
    let rows = customers(25);
    let state = page(0, 25).with_column_filter(
        "amount",
        Some(FilterValue::Range(Some(100.0), Some(150.0))),
    );
    let model = derive(&rows, &registry(), &state, None);
    assert_eq!(ids(&model), vec![10, 11, 12, 13, 14, 15]);
}

#[test]
fn test_column_filters_combine_with_and() {
    let rows = customers(25);
    let state = page(0, 25)
        .with_column_filter("amount", Some(FilterValue::Range(Some(100.0), None)))
        .with_column_filter("city", Some("lima".into()));
    let model = derive(&rows, &registry(), &state, None);
    assert_eq!(ids(&model), vec![10, 13, 16, 19, 22, 25]);
}

#[test]
fn test_sort_descending() {
    let rows = customers(25);
    let state = page(0, 3).with_sort(vec![SortKey::desc("amount")]);
    let model = derive(&rows, &registry(), &state, None);
    assert_eq!(ids(&model), vec![25, 24, 23]);
}

#[test]
fn test_sort_is_stable() {
    let rows = customers(25);
    let state = page(0, 10).with_sort(vec![SortKey::asc("city")]);
    let model = derive(&rows, &registry(), &state, None);
    assert_eq!(ids(&model), vec![3, 6, 9, 12, 15, 18, 21, 24, 1, 4]);
}

#[test]
fn test_multi_key_sort() {
    let rows = customers(25);
    let state = page(0, 10).with_sort(vec![SortKey::asc("city"), SortKey::desc("amount")]);
    let model = derive(&rows, &registry(), &state, None);
    assert_eq!(ids(&model), vec![24, 21, 18, 15, 12, 9, 6, 3, 25, 22]);
}

#[test]
fn test_nulls_sort_last_in_both_directions() {
    let rows: Vec<Option<i64>> = vec![Some(2), None, Some(1)];
    let columns: ColumnRegistry<Option<i64>> =
        vec![ColumnDef::new("v", "V", |r: &Option<i64>| (*r).into())].into();

    let asc = ViewState::default().with_sort(vec![SortKey::asc("v")]);
    let model = derive(&rows, &columns, &asc, None);
    let order: Vec<usize> = model.iter().map(|r| r.index).collect();
    assert_eq!(order, vec![2, 0, 1]);

    let desc = ViewState::default().with_sort(vec![SortKey::desc("v")]);
    let model = derive(&rows, &columns, &desc, None);
    let order: Vec<usize> = model.iter().map(|r| r.index).collect();
    assert_eq!(order, vec![0, 2, 1]);
}

#[test]
fn test_grouping_builds_group_rows_with_aggregates() {
    let rows = customers(25);
    let state = page(0, 10).with_grouping(vec!["city".to_string()]);
    let model = derive(&rows, &registry(), &state, Some(&id_fn()));

    assert_eq!(model.len(), 3);
    assert_eq!(model.row_count, 3);
    assert_eq!(model.page_count, 1);

    let lima = &model.rows[0];
    assert!(lima.is_grouped);
    assert!(!lima.is_expanded);
    assert_eq!(lima.group_values, vec![CellValue::from("Lima")]);
    assert_eq!(lima.sub_row_count, Some(9));
    assert_eq!(lima.aggregates.get("amount"), Some(&CellValue::Float(1170.0)));

    let cities: Vec<CellValue> = model.iter().map(|r| r.group_values[0].clone()).collect();
    assert_eq!(
        cities,
        vec![
            CellValue::from("Lima"),
            CellValue::from("Quito"),
            CellValue::from("Bogota")
        ]
    );
}

#[test]
fn test_grouping_paginates_at_group_level() {
    let rows = customers(25);
    let state = page(1, 2).with_grouping(vec!["city".to_string()]);
    let model = derive(&rows, &registry(), &state, None);
    assert_eq!(model.page_count, 2);
    assert_eq!(model.len(), 1);
    assert_eq!(model.rows[0].group_values, vec![CellValue::from("Bogota")]);
}

#[test]
fn test_expanded_group_emits_members() {
    let rows = customers(25);
    let id = id_fn();
    let grouped = page(0, 10).with_grouping(vec!["city".to_string()]);
    let lima_key = derive(&rows, &registry(), &grouped, Some(&id)).rows[0].key.clone();

    let mut keys = std::collections::BTreeSet::new();
    keys.insert(lima_key.clone());
    let expanded = grouped.with_expanded(datagrid::Expanded::Keys(keys));
    let model = derive(&rows, &registry(), &expanded, Some(&id));

    assert_eq!(model.len(), 3 + 9);
    assert!(model.rows[0].is_expanded);
    let members: Vec<u32> = model
        .iter()
        .filter(|r| r.depth == 1)
        .map(|r| r.original.id)
        .collect();
    assert_eq!(members, vec![1, 4, 7, 10, 13, 16, 19, 22, 25]);
    assert!(
        model
            .iter()
            .filter(|r| r.depth == 1)
            .all(|r| r.parent.as_ref() == Some(&lima_key))
    );
}

#[test]
fn test_group_selected_iff_all_members_selected() {
    let rows = customers(25);
    let id = id_fn();
    let grouped = page(0, 10).with_grouping(vec!["city".to_string()]);
    let lima = derive(&rows, &registry(), &grouped, Some(&id)).rows[0].clone();

    let all = datagrid::Selection::from_keys(lima.member_keys.iter().cloned());
    let state = grouped.clone().with_selection(all);
    assert!(derive(&rows, &registry(), &state, Some(&id)).rows[0].is_selected);

    let partial = datagrid::Selection::from_keys(lima.member_keys.iter().skip(1).cloned());
    let state = grouped.with_selection(partial);
    assert!(!derive(&rows, &registry(), &state, Some(&id)).rows[0].is_selected);
}

#[test]
fn test_sort_groups_by_grouping_column() {
    let rows = customers(25);
    let state = page(0, 10)
        .with_grouping(vec!["city".to_string()])
        .with_sort(vec![SortKey::asc("city")]);
    let model = derive(&rows, &registry(), &state, None);
    let cities: Vec<String> = model.iter().map(|r| r.group_values[0].to_string()).collect();
    assert_eq!(cities, vec!["Bogota", "Lima", "Quito"]);
}

#[test]
fn test_sort_groups_by_aggregate() {
    let rows = customers(25);
    let state = page(0, 10)
        .with_grouping(vec!["city".to_string()])
        .with_sort(vec![SortKey::desc("amount")]);
    let model = derive(&rows, &registry(), &state, None);
    let cities: Vec<String> = model.iter().map(|r| r.group_values[0].to_string()).collect();
    // Lima 1170, Bogota 1080, Quito 1000
    assert_eq!(cities, vec!["Lima", "Bogota", "Quito"]);
}

#[test]
fn test_stale_column_references_are_ignored() {
    let rows = customers(25);
    let columns = registry();
    let baseline = derive_indexed(&rows, &columns, &page(0, 10), None);

    let stale = page(0, 10)
        .with_sort(vec![SortKey::asc("missing")])
        .with_grouping(vec!["missing".to_string()])
        .with_column_filter("missing", Some("x".into()));
    assert_eq!(derive_indexed(&rows, &columns, &stale, None), baseline);
}

#[test]
fn test_derivation_is_idempotent() {
    let rows = customers(25);
    let columns = registry();
    let state = page(1, 7)
        .with_sort(vec![SortKey::asc("city"), SortKey::desc("name")])
        .with_global_filter("customer");
    let first = derive_indexed(&rows, &columns, &state, None);
    let second = derive_indexed(&rows, &columns, &state, None);
    assert_eq!(first, second);
}

#[test]
fn test_groups_keep_first_seen_order_when_sorted_by_member_column() {
    let rows = customers(6);
    let state = page(0, 10)
        .with_grouping(vec!["city".to_string()])
        .with_sort(vec![SortKey::desc("name")]);
    let model = derive(&rows, &registry(), &state, None);
    let cities: Vec<String> = model.iter().map(|r| r.group_values[0].to_string()).collect();
    assert_eq!(cities, vec!["Lima", "Quito", "Bogota"]);
}

#[test]
fn test_global_filter_skips_non_filterable_columns() {
    let rows = customers(25);
    let columns = registry();

    let global = derive_indexed(&rows, &columns, &page(0, 25).with_global_filter("true"), None);
    assert!(global.rows.is_empty());

    let column = page(0, 25).with_column_filter("active", Some("true".into()));
    assert_eq!(derive_indexed(&rows, &columns, &column, None).rows.len(), 25);
}

#[test]
fn test_global_filter_matches_untrimmed_text() {
    let rows = customers(25);
    let columns = registry();

    let padded = page(0, 25).with_global_filter("customer 01 ");
    assert!(derive_indexed(&rows, &columns, &padded, None).rows.is_empty());

    let blank = page(0, 25).with_global_filter("   ");
    assert_eq!(derive_indexed(&rows, &columns, &blank, None).rows.len(), 25);
}
