//! Captured artifacts and the catalog they are selected from.

#[allow(clippy::module_inception)]
mod catalog;
mod item;

pub use catalog::Catalog;
pub use item::{DataItem, ItemKind};
