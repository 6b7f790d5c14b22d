//! Shared customer fixture.

#![allow(dead_code)]

use datagrid::{
    Aggregation, ColumnDef, ColumnRegistry, DataGrid, FilterFn, GridConfig, RowKey, RowModel,
};

#[derive(Debug, Clone)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub amount: f64,
    pub active: bool,
}

const CITIES: [&str; 3] = ["Lima", "Quito", "Bogota"];

/// Customers 1..=n. Cities cycle Lima, Quito, Bogota; amount is id * 10.
pub fn customers(n: u32) -> Vec<Customer> {
    (1..=n)
        .map(|id| Customer {
            id,
            name: format!("Customer {:02}", id),
            city: CITIES[((id - 1) % 3) as usize].to_string(),
            amount: f64::from(id) * 10.0,
            active: id % 2 == 0,
        })
        .collect()
}

/// Columns: id, name, city, amount, active (registry order).
pub fn columns() -> Vec<ColumnDef<Customer>> {
    vec![
        ColumnDef::new("id", "ID", |c: &Customer| c.id.into())
            .width(60)
            .resizable(false)
            .filter_fn(FilterFn::InList),
        ColumnDef::new("name", "Nombre", |c: &Customer| c.name.clone().into()).width(200),
        ColumnDef::new("city", "Ciudad", |c: &Customer| c.city.clone().into()).width(120),
        ColumnDef::new("amount", "Monto", |c: &Customer| c.amount.into())
            .hideable(false)
            .width(100)
            .min_width(80)
            .max_width(300)
            .filter_fn(FilterFn::InRange)
            .sort_desc_first()
            .aggregate(Aggregation::Sum),
        ColumnDef::new("active", "Activo", |c: &Customer| c.active.into())
            .pinnable(false)
            .filterable(false),
    ]
}

pub fn registry() -> ColumnRegistry<Customer> {
    ColumnRegistry::new(columns())
}

pub fn config() -> GridConfig<Customer> {
    GridConfig::new().get_row_id(|c: &Customer| c.id.into())
}

pub fn grid(n: u32) -> DataGrid<Customer> {
    DataGrid::with_data(config(), customers(n), columns())
}

pub fn key(id: u32) -> RowKey {
    RowKey::from(id)
}

pub fn id_fn() -> datagrid::row::RowIdFn<Customer> {
    std::sync::Arc::new(|c: &Customer| c.id.into())
}

/// Ids of the rendered rows, in render order.
pub fn ids(model: &RowModel<'_, Customer>) -> Vec<u32> {
    model.iter().map(|r| r.original.id).collect()
}
