//! Selection of catalog items for curation.
//!
//! [`SelectionSet`] is the plain ordered set; [`SelectionStore`] is the
//! shared handle every consumer holds, with all mutation funneled through
//! one lock.

mod set;
mod store;

pub use set::SelectionSet;
pub use store::SelectionStore;
