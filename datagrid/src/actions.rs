//! Per-row action menu and its authorization filter.
//!
//! Actions are declared by the caller every render, narrowed to what the
//! current actor may invoke, and never persisted. Unauthorized actions
//! are omitted from the menu entirely; disabled actions stay in the menu
//! but are inert.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

/// Action handler. Receives the original row, never the rendered wrapper.
pub type ActionHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Per-row disabled predicate.
pub type DisabledFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Visual weight of an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionVariant {
    #[default]
    Default,
    Destructive,
    Warning,
}

/// Capability an action requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// A single capability.
    One(String),
    /// Any one of several capabilities (OR, not AND).
    AnyOf(Vec<String>),
}

/// Whether an action is inert.
pub enum Disabled<T> {
    Never,
    Always,
    When(DisabledFn<T>),
}

impl<T> Default for Disabled<T> {
    fn default() -> Self {
        Disabled::Never
    }
}

impl<T> Clone for Disabled<T> {
    fn clone(&self) -> Self {
        match self {
            Disabled::Never => Disabled::Never,
            Disabled::Always => Disabled::Always,
            Disabled::When(f) => Disabled::When(f.clone()),
        }
    }
}

impl<T> Disabled<T> {
    pub fn evaluate(&self, row: &T) -> bool {
        match self {
            Disabled::Never => false,
            Disabled::Always => true,
            Disabled::When(f) => f(row),
        }
    }
}

/// Answers "does the current actor hold capability P".
///
/// Implementations are pure lookups; the grid never caches their answers.
pub trait Authorizer {
    fn has_permission(&self, capability: &str) -> bool;

    fn has_any_permission(&self, capabilities: &[String]) -> bool {
        capabilities.iter().any(|c| self.has_permission(c))
    }
}

impl Authorizer for HashSet<String> {
    fn has_permission(&self, capability: &str) -> bool {
        self.contains(capability)
    }
}

impl Authorizer for BTreeSet<String> {
    fn has_permission(&self, capability: &str) -> bool {
        self.contains(capability)
    }
}

impl<A: Authorizer + ?Sized> Authorizer for &A {
    fn has_permission(&self, capability: &str) -> bool {
        (**self).has_permission(capability)
    }

    fn has_any_permission(&self, capabilities: &[String]) -> bool {
        (**self).has_any_permission(capabilities)
    }
}

/// Authorizer backed by two predicates from an external permission service.
pub struct PermissionFns<P, A> {
    has: P,
    has_any: A,
}

impl<P, A> PermissionFns<P, A>
where
    P: Fn(&str) -> bool,
    A: Fn(&[String]) -> bool,
{
    pub fn new(has: P, has_any: A) -> Self {
        Self { has, has_any }
    }
}

impl<P, A> Authorizer for PermissionFns<P, A>
where
    P: Fn(&str) -> bool,
    A: Fn(&[String]) -> bool,
{
    fn has_permission(&self, capability: &str) -> bool {
        (self.has)(capability)
    }

    fn has_any_permission(&self, capabilities: &[String]) -> bool {
        (self.has_any)(capabilities)
    }
}

/// A row action declared by the caller.
///
/// # Example
///
/// ```
/// use datagrid::{ActionVariant, RowAction};
///
/// struct Customer {
///     id: u32,
///     archived: bool,
/// }
///
/// let delete = RowAction::new("Eliminar", |c: &Customer| println!("delete {}", c.id))
///     .icon("trash")
///     .variant(ActionVariant::Destructive)
///     .requires_any(["crm:delete", "crm:customers:delete"])
///     .disabled_when(|c| c.archived);
/// ```
pub struct RowAction<T> {
    pub label: String,
    pub icon: Option<String>,
    pub variant: ActionVariant,
    pub required: Option<Requirement>,
    pub disabled: Disabled<T>,
    /// Render a separator before this action. Cosmetic only.
    pub separator: bool,
    on_invoke: ActionHandler<T>,
}

impl<T> Clone for RowAction<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            icon: self.icon.clone(),
            variant: self.variant,
            required: self.required.clone(),
            disabled: self.disabled.clone(),
            separator: self.separator,
            on_invoke: self.on_invoke.clone(),
        }
    }
}

impl<T> fmt::Debug for RowAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("label", &self.label)
            .field("icon", &self.icon)
            .field("variant", &self.variant)
            .field("required", &self.required)
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

impl<T> RowAction<T> {
    pub fn new<F>(label: impl Into<String>, on_invoke: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            icon: None,
            variant: ActionVariant::Default,
            required: None,
            disabled: Disabled::Never,
            separator: false,
            on_invoke: Arc::new(on_invoke),
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn variant(mut self, variant: ActionVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Require a single capability.
    pub fn requires(mut self, capability: impl Into<String>) -> Self {
        self.required = Some(Requirement::One(capability.into()));
        self
    }

    /// Require any one of several capabilities.
    pub fn requires_any<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = Some(Requirement::AnyOf(
            capabilities.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = if disabled {
            Disabled::Always
        } else {
            Disabled::Never
        };
        self
    }

    pub fn disabled_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.disabled = Disabled::When(Arc::new(predicate));
        self
    }

    pub fn separator(mut self) -> Self {
        self.separator = true;
        self
    }

    /// Whether the current actor may see this action.
    pub fn is_authorized(&self, authorizer: &dyn Authorizer) -> bool {
        match &self.required {
            None => true,
            Some(Requirement::One(capability)) => authorizer.has_permission(capability),
            Some(Requirement::AnyOf(capabilities)) => authorizer.has_any_permission(capabilities),
        }
    }

    pub fn is_disabled(&self, row: &T) -> bool {
        self.disabled.evaluate(row)
    }

    /// Run the handler unless the action is disabled for `row`.
    /// Returns whether the handler ran.
    pub fn invoke(&self, row: &T) -> bool {
        if self.is_disabled(row) {
            log::debug!("Action '{}' is disabled for this row", self.label);
            return false;
        }
        (self.on_invoke)(row);
        true
    }
}

/// Narrow `actions` to those the actor may invoke, keeping order.
pub fn authorize<'a, T>(
    actions: &'a [RowAction<T>],
    authorizer: &dyn Authorizer,
) -> Vec<&'a RowAction<T>> {
    actions
        .iter()
        .filter(|a| a.is_authorized(authorizer))
        .collect()
}

/// One entry of a row's action menu.
#[derive(Debug)]
pub struct MenuEntry<'a, T> {
    pub action: &'a RowAction<T>,
    /// Evaluated for the row the menu was built for.
    pub disabled: bool,
}

impl<T> Clone for MenuEntry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MenuEntry<'_, T> {}

/// Authorized action menu for one row.
#[derive(Debug)]
pub struct ActionMenu<'a, 'r, T> {
    row: &'r T,
    entries: Vec<MenuEntry<'a, T>>,
}

impl<'a, 'r, T> ActionMenu<'a, 'r, T> {
    /// Build the menu for `row`.
    pub fn for_row(actions: &'a [RowAction<T>], authorizer: &dyn Authorizer, row: &'r T) -> Self {
        let entries = authorize(actions, authorizer)
            .into_iter()
            .map(|action| MenuEntry {
                action,
                disabled: action.is_disabled(row),
            })
            .collect();
        Self { row, entries }
    }

    pub fn entries(&self) -> &[MenuEntry<'a, T>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Invoke the entry at `index`. Disabled or missing entries do nothing.
    pub fn invoke(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(|entry| !entry.disabled && entry.action.invoke(self.row))
    }
}
