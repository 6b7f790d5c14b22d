//! Tests for the grid engine.

mod common;

use std::collections::BTreeMap;

use common::{Customer, config, customers, grid, ids, key};
use datagrid::{
    DataGrid, Direction, Expanded, FilterValue, GridError, PinSide, Selection, SortKey, ViewState,
};

fn sort_columns(grid: &DataGrid<Customer>) -> Vec<(String, Direction)> {
    grid.state()
        .sort
        .iter()
        .map(|s| (s.column.clone(), s.direction))
        .collect()
}

#[test]
fn test_grid_id_display() {
    let grid = grid(1);
    assert!(grid.id().to_string().starts_with("__grid_"));
    assert_ne!(grid.id(), DataGrid::new(config()).id());
}

#[test]
fn test_row_model_is_stable_between_calls() {
    let mut grid = grid(25);
    let first = ids(&grid.row_model());
    let second = ids(&grid.row_model());
    assert_eq!(first, second);
    assert_eq!(first, (1..=10).collect::<Vec<_>>());
}

#[test]
fn test_set_rows_invalidates_derivation() {
    let mut grid = grid(25);
    assert_eq!(grid.row_count(), 25);
    grid.set_rows(customers(4));
    assert_eq!(grid.row_count(), 4);
    assert_eq!(ids(&grid.row_model()), vec![1, 2, 3, 4]);
}

#[test]
fn test_set_columns_invalidates_derivation() {
    let mut grid = grid(25);
    grid.set_sorting(vec![SortKey::desc("id")]);
    assert_eq!(grid.row_model().rows[0].original.id, 25);

    let columns: Vec<_> = common::columns()
        .into_iter()
        .filter(|c| c.key != "id")
        .collect();
    grid.set_columns(columns);
    // The stale sort key is ignored.
    assert_eq!(grid.row_model().rows[0].original.id, 1);
    assert_eq!(grid.sort_direction("id"), Some(Direction::Desc));
}

#[test]
fn test_clamped_page_index_is_written_back() {
    let mut grid = grid(25);
    grid.set_page_index(2);
    assert_eq!(grid.row_model().len(), 5);

    grid.set_rows(customers(5));
    let (page_index, len) = {
        let model = grid.row_model();
        (model.page_index, model.len())
    };
    assert_eq!(page_index, 0);
    assert_eq!(len, 5);
    assert_eq!(grid.state().pagination.page_index, 0);
}

#[test]
fn test_toggle_sorting_cycle() {
    let mut grid = grid(5);
    grid.toggle_sorting("name", false);
    assert_eq!(grid.sort_direction("name"), Some(Direction::Asc));
    grid.toggle_sorting("name", false);
    assert_eq!(grid.sort_direction("name"), Some(Direction::Desc));
    grid.toggle_sorting("name", false);
    assert_eq!(grid.sort_direction("name"), None);
}

#[test]
fn test_toggle_sorting_desc_first() {
    let mut grid = grid(5);
    grid.toggle_sorting("amount", false);
    assert_eq!(grid.sort_direction("amount"), Some(Direction::Desc));
    grid.toggle_sorting("amount", false);
    assert_eq!(grid.sort_direction("amount"), Some(Direction::Asc));
}

#[test]
fn test_single_sort_replaces_previous() {
    let mut grid = grid(5);
    grid.toggle_sorting("name", false);
    grid.toggle_sorting("city", false);
    assert_eq!(sort_columns(&grid), vec![("city".to_string(), Direction::Asc)]);
}

#[test]
fn test_multi_sort_respects_max_columns() {
    let mut grid = DataGrid::with_data(
        config().max_multi_sort_col_count(2),
        customers(5),
        common::columns(),
    );
    grid.toggle_sorting("name", true);
    grid.toggle_sorting("city", true);
    grid.toggle_sorting("id", true);
    assert_eq!(
        sort_columns(&grid),
        vec![
            ("city".to_string(), Direction::Asc),
            ("id".to_string(), Direction::Asc)
        ]
    );
    assert_eq!(grid.sort_index("id"), Some(1));
}

#[test]
fn test_multi_sort_disabled_falls_back_to_single() {
    let mut grid = DataGrid::with_data(
        config().enable_multi_sort(false),
        customers(5),
        common::columns(),
    );
    grid.toggle_sorting("name", true);
    grid.toggle_sorting("city", true);
    assert_eq!(sort_columns(&grid).len(), 1);
}

#[test]
fn test_sorting_disabled_is_noop() {
    let mut grid = DataGrid::with_data(
        config().enable_sorting(false),
        customers(5),
        common::columns(),
    );
    grid.toggle_sorting("name", false);
    grid.set_sorting(vec![SortKey::asc("city")]);
    assert!(grid.state().sort.is_empty());
}

#[test]
fn test_non_filterable_column_filter_is_noop() {
    let mut grid = grid(5);
    grid.set_column_filter("active", Some("true".into()));
    assert!(grid.column_filter("active").is_none());

    grid.set_column_filter("city", Some("lima".into()));
    assert_eq!(grid.column_filter("city"), Some(&FilterValue::from("lima")));
    assert_eq!(ids(&grid.row_model()), vec![1, 4]);

    grid.reset_column_filters();
    assert_eq!(grid.row_model().len(), 5);
}

#[test]
fn test_empty_filter_value_clears_filter() {
    let mut grid = grid(5);
    grid.set_column_filter("city", Some("lima".into()));
    grid.set_column_filter("city", Some("   ".into()));
    assert!(grid.state().column_filters.is_empty());
}

#[test]
fn test_global_filter_reset() {
    let mut grid = grid(25);
    grid.set_global_filter("bogota");
    assert_eq!(grid.row_count(), 8);
    assert_eq!(grid.global_filter(), "bogota");

    grid.reset_global_filter();
    assert_eq!(grid.row_count(), 25);
}

#[test]
fn test_pagination_controls() {
    let mut grid = grid(25);
    assert_eq!(grid.page_count(), 3);
    assert!(!grid.can_previous_page());
    assert!(grid.can_next_page());

    grid.next_page();
    grid.next_page();
    grid.next_page();
    assert_eq!(grid.page_index(), 2);
    assert!(!grid.can_next_page());

    grid.previous_page();
    assert_eq!(grid.page_index(), 1);

    grid.first_page();
    assert_eq!(grid.page_index(), 0);

    grid.last_page();
    assert_eq!(ids(&grid.row_model()), (21..=25).collect::<Vec<_>>());
}

#[test]
fn test_set_page_size() {
    let mut grid = grid(25);
    grid.set_page_index(2);
    assert_eq!(grid.set_page_size(0), Err(GridError::InvalidPageSize));

    grid.set_page_size(20).unwrap();
    assert_eq!(grid.page_size(), 20);
    assert_eq!(grid.page_index(), 0);
    assert_eq!(grid.page_count(), 2);
}

#[test]
fn test_toggle_grouping() {
    let mut grid = grid(25);
    grid.toggle_grouping("city");
    assert!(grid.is_grouped("city"));
    assert_eq!(grid.row_count(), 3);

    grid.toggle_grouping("city");
    assert!(!grid.is_grouped("city"));
    assert_eq!(grid.row_count(), 25);

    grid.toggle_grouping("missing");
    assert!(grid.state().grouping.is_empty());
}

#[test]
fn test_expand_all_and_collapse_one() {
    let mut grid = grid(25);
    grid.set_grouping(vec!["city".to_string()]);
    grid.set_expanded_all(true);
    assert_eq!(grid.row_model().len(), 3 + 25);

    let lima = grid.row_model().rows[0].key.clone();
    assert!(grid.is_expanded(&lima));
    grid.toggle_expanded(&lima);
    assert!(!grid.is_expanded(&lima));
    assert_eq!(grid.row_model().len(), 3 + 8 + 8);

    grid.toggle_expanded(&lima);
    assert_eq!(grid.row_model().len(), 3 + 25);

    grid.set_expanded_all(false);
    assert_eq!(grid.state().expanded, Expanded::default());
    assert_eq!(grid.row_model().len(), 3);
}

#[test]
fn test_expanding_disabled() {
    let mut grid = DataGrid::with_data(
        config().enable_expanding(false),
        customers(25),
        common::columns(),
    );
    grid.set_grouping(vec!["city".to_string()]);
    grid.set_expanded_all(true);
    assert_eq!(grid.row_model().len(), 3);
}

#[test]
fn test_config_defaults_applied_and_reset() {
    let mut visibility = BTreeMap::new();
    visibility.insert("city".to_string(), false);
    let config = config()
        .page_size(5)
        .default_sort(vec![SortKey::desc("id")])
        .default_column_visibility(visibility)
        .default_grouping(vec![]);
    let mut grid = DataGrid::with_data(config, customers(25), common::columns());
    let initial = grid.state().clone();

    assert_eq!(grid.page_size(), 5);
    assert!(!grid.is_column_visible("city"));
    assert_eq!(grid.row_model().rows[0].original.id, 25);

    grid.clear_sorting();
    grid.set_column_visibility("city", true);
    grid.pin_column("name", PinSide::Left);
    grid.toggle_row_selected(&key(3));
    grid.next_page();

    grid.reset();
    assert_eq!(grid.state(), &initial);
}

#[test]
fn test_disabled_feature_skips_defaults() {
    let config = config()
        .enable_sorting(false)
        .default_sort(vec![SortKey::desc("id")]);
    let grid = DataGrid::with_data(config, customers(5), common::columns());
    assert!(grid.state().sort.is_empty());
}

#[test]
fn test_state_snapshot_restore() {
    let mut grid = grid(25);
    grid.set_global_filter("customer");
    grid.toggle_sorting("name", false);
    let snapshot = grid.state().clone();

    grid.reset();
    assert_ne!(grid.state(), &snapshot);

    grid.set_state(snapshot.clone());
    assert_eq!(grid.state(), &snapshot);
}

#[test]
fn test_view_state_serde_roundtrip() {
    let state = ViewState::default()
        .with_sort(vec![SortKey::asc("city"), SortKey::desc("amount")])
        .with_column_filter("amount", Some(FilterValue::Range(Some(10.0), None)))
        .with_global_filter("lima")
        .with_visibility("city", false)
        .with_pin("name", PinSide::Left)
        .with_size("name", Some(180))
        .with_grouping(vec!["city".to_string()])
        .with_expanded(Expanded::All)
        .with_selection(Selection::from_keys([key(1), key(2)]))
        .with_page_index(3);

    let json = serde_json::to_string(&state).unwrap();
    let restored: ViewState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
}

#[test]
fn test_view_state_missing_fields_use_defaults() {
    let restored: ViewState = serde_json::from_str(r#"{"global_filter":"x"}"#).unwrap();
    assert_eq!(restored, ViewState::default().with_global_filter("x"));
}

#[test]
fn test_find_row_and_row_key() {
    let grid = grid(5);
    assert_eq!(grid.row_key(2), Some(key(3)));
    assert_eq!(grid.find_row(&key(4)).map(|c| c.id), Some(4));
    assert!(grid.find_row(&key(40)).is_none());
}
