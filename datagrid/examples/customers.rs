//! Customer grid example
//!
//! Drives a grid through filtering, sorting, grouping, selection and the
//! row action menu, printing each page as plain text.
//! Logs go to customers.log.

use std::collections::HashSet;
use std::fs::File;

use datagrid::prelude::*;
use datagrid::RowModel;
use simplelog::{Config, LevelFilter, WriteLogger};

#[derive(Clone, Debug)]
struct Customer {
    id: u32,
    name: String,
    city: String,
    plan: String,
    balance: f64,
    archived: bool,
}

fn sample_customers() -> Vec<Customer> {
    let names = [
        "Ana Torres",
        "Bruno Díaz",
        "Carla Méndez",
        "Diego Rojas",
        "Elena Castro",
        "Fabián Ruiz",
        "Gabriela Vega",
        "Hugo Salas",
        "Inés Paredes",
        "Julián Mora",
        "Karina Soto",
        "Luis Herrera",
    ];
    let cities = ["Lima", "Quito", "Bogotá"];
    let plans = ["Free", "Pro", "Enterprise"];

    names
        .iter()
        .enumerate()
        .map(|(i, name)| Customer {
            id: i as u32 + 1,
            name: name.to_string(),
            city: cities[i % cities.len()].to_string(),
            plan: plans[(i / 2) % plans.len()].to_string(),
            balance: (i as f64 + 1.0) * 137.5,
            archived: i % 5 == 4,
        })
        .collect()
}

fn columns() -> Vec<ColumnDef<Customer>> {
    vec![
        ColumnDef::new("id", "ID", |c: &Customer| c.id.into())
            .width(6)
            .resizable(false)
            .hideable(false),
        ColumnDef::new("name", "Nombre", |c: &Customer| c.name.clone().into()).width(16),
        ColumnDef::new("city", "Ciudad", |c: &Customer| c.city.clone().into()).width(10),
        ColumnDef::new("plan", "Plan", |c: &Customer| c.plan.clone().into()).width(12),
        ColumnDef::new("balance", "Saldo", |c: &Customer| c.balance.into())
            .width(10)
            .render(|c: &Customer| format!("{:.2}", c.balance))
            .sort_desc_first()
            .aggregate(Aggregation::Sum),
    ]
}

fn print_page(title: &str, grid: &mut DataGrid<Customer>) {
    let header: Vec<(String, usize)> = grid
        .visible_columns()
        .iter()
        .map(|c| (c.key.clone(), grid.column_width(&c.key).unwrap_or(10) as usize))
        .collect();
    let columns = grid.columns().clone();
    let model: RowModel<'_, Customer> = grid.row_model();

    println!("== {} (page {}/{}) ==", title, model.page_index + 1, model.page_count.max(1));
    for (key, width) in &header {
        let label = columns.get(key).map(|c| c.header.as_str()).unwrap_or(key);
        print!("{:<width$}", label, width = *width);
    }
    println!();

    for row in model.iter() {
        let marker = if row.is_selected { "[x]" } else { "[ ]" };
        if row.is_grouped {
            let total = row
                .aggregates
                .get("balance")
                .map(|v| v.to_string())
                .unwrap_or_default();
            let group = row
                .group_values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" / ");
            println!(
                "{} {} {} ({} rows, saldo {})",
                marker,
                if row.is_expanded { "v" } else { ">" },
                group,
                row.sub_row_count.unwrap_or(0),
                total
            );
            continue;
        }
        print!("{} {}", marker, "  ".repeat(row.depth));
        for (key, width) in &header {
            let text = columns
                .get(key)
                .map(|c| c.display(row.original))
                .unwrap_or_default();
            print!("{:<width$}", text, width = *width);
        }
        println!();
    }
    println!();
}

fn main() {
    let log_file = File::create("customers.log").expect("Failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let config = GridConfig::new()
        .page_size(5)
        .get_row_id(|c: &Customer| c.id.into())
        .default_sort(vec![SortKey::asc("name")])
        .on_row_selection_change(|rows: &[&Customer]| {
            let names: Vec<&str> = rows.iter().map(|c| c.name.as_str()).collect();
            log::info!("Selection: {:?}", names);
        });
    let mut grid = DataGrid::with_data(config, sample_customers(), columns());

    print_page("Clientes", &mut grid);

    grid.next_page();
    print_page("Siguiente página", &mut grid);

    grid.set_global_filter("quito");
    print_page("Filtro global: quito", &mut grid);
    grid.reset_global_filter();

    grid.toggle_sorting("balance", false);
    grid.pin_column("name", PinSide::Left);
    grid.set_column_visibility("plan", false);
    print_page("Por saldo, plan oculto", &mut grid);

    grid.select_all_page();
    println!("{} seleccionados en esta página\n", grid.selected_count());

    grid.clear_selection();
    grid.set_grouping(vec!["city".to_string()]);
    let first_group = grid.row_model().rows.first().map(|r| r.key.clone());
    if let Some(key) = first_group {
        grid.toggle_expanded(&key);
        grid.toggle_row_selected(&key);
    }
    print_page("Agrupado por ciudad", &mut grid);

    let actions = vec![
        RowAction::new("Editar", |c: &Customer| println!("editar {}", c.name)).icon("pencil"),
        RowAction::new("Eliminar", |c: &Customer| println!("eliminar {}", c.name))
            .variant(ActionVariant::Destructive)
            .requires_any(["crm:delete", "crm:customers:delete"])
            .disabled_when(|c| c.archived)
            .separator(),
    ];
    let permissions: HashSet<String> = ["crm:customers:delete".to_string()].into();

    for customer in grid.rows().iter().take(5) {
        let menu = ActionMenu::for_row(&actions, &permissions, customer);
        let labels: Vec<String> = menu
            .entries()
            .iter()
            .map(|e| {
                if e.disabled {
                    format!("({})", e.action.label)
                } else {
                    e.action.label.clone()
                }
            })
            .collect();
        println!("{}: {}", customer.name, labels.join(", "));
        menu.invoke(1);
    }
}
