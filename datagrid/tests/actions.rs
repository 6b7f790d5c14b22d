//! Tests for row actions and the authorization filter.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use datagrid::{ActionMenu, ActionVariant, PermissionFns, RowAction, authorize};

struct Customer {
    archived: bool,
}

fn grants(perms: &[&str]) -> HashSet<String> {
    perms.iter().map(|p| p.to_string()).collect()
}

fn delete_action() -> RowAction<Customer> {
    RowAction::new("Eliminar", |_: &Customer| {})
        .variant(ActionVariant::Destructive)
        .requires_any(["crm:delete", "crm:customers:delete"])
}

#[test]
fn test_any_of_shown_when_either_permission_held() {
    let actions = vec![delete_action()];

    assert_eq!(authorize(&actions, &grants(&["crm:delete"])).len(), 1);
    assert_eq!(authorize(&actions, &grants(&["crm:customers:delete"])).len(), 1);
    assert!(authorize(&actions, &grants(&["crm:read"])).is_empty());
}

#[test]
fn test_single_requirement() {
    let action = RowAction::new("Editar", |_: &Customer| {}).requires("crm:edit");
    assert!(action.is_authorized(&grants(&["crm:edit"])));
    assert!(!action.is_authorized(&grants(&["crm:delete"])));
}

#[test]
fn test_no_requirement_is_always_shown() {
    let action = RowAction::new("Ver", |_: &Customer| {});
    assert!(action.is_authorized(&grants(&[])));
}

#[test]
fn test_empty_any_of_is_denied() {
    let action = RowAction::new("Nada", |_: &Customer| {}).requires_any(Vec::<String>::new());
    assert!(!action.is_authorized(&grants(&["crm:delete"])));
}

#[test]
fn test_permission_fns_authorizer() {
    let authorizer = PermissionFns::new(
        |p: &str| p == "crm:edit",
        |ps: &[String]| ps.iter().any(|p| p == "crm:customers:delete"),
    );
    let edit = RowAction::new("Editar", |_: &Customer| {}).requires("crm:edit");
    assert!(edit.is_authorized(&authorizer));
    assert!(delete_action().is_authorized(&authorizer));
}

#[test]
fn test_authorize_keeps_declaration_order() {
    let actions = vec![
        RowAction::new("Ver", |_: &Customer| {}),
        RowAction::new("Editar", |_: &Customer| {}).requires("crm:edit"),
        delete_action().separator(),
    ];
    let labels: Vec<&str> = authorize(&actions, &grants(&["crm:delete"]))
        .iter()
        .map(|a| a.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Ver", "Eliminar"]);
}

#[test]
fn test_disabled_action_is_never_invoked() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let action = RowAction::new("Archivar", move |_: &Customer| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .disabled_when(|c| c.archived);

    assert!(!action.invoke(&Customer { archived: true }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    assert!(action.invoke(&Customer { archived: false }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_action_menu_for_row() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let actions = vec![
        RowAction::new("Editar", move |_: &Customer| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .icon("pencil"),
        RowAction::new("Restaurar", |_: &Customer| {})
            .requires("crm:restore")
            .disabled(true),
        delete_action().separator().disabled_when(|c| c.archived),
    ];
    let row = Customer { archived: true };
    let grants = grants(&["crm:delete"]);
    let menu = ActionMenu::for_row(&actions, &grants, &row);

    assert_eq!(menu.len(), 2);
    let entries = menu.entries();
    assert_eq!(entries[0].action.icon.as_deref(), Some("pencil"));
    assert!(!entries[0].disabled);
    assert!(entries[1].action.separator);
    assert!(entries[1].disabled);

    assert!(menu.invoke(0));
    assert!(!menu.invoke(1));
    assert!(!menu.invoke(5));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_menu_when_nothing_authorized() {
    let actions = vec![delete_action()];
    let row = Customer { archived: false };
    let menu = ActionMenu::for_row(&actions, &grants(&[]), &row);
    assert!(menu.is_empty());
}
