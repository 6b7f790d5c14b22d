//! Column descriptors and the column registry.

mod def;
mod registry;

pub use def::{Accessor, Capabilities, ColumnDef, Renderer, SortFn};
pub use registry::ColumnRegistry;
