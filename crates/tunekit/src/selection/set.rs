//! Ordered set of selected artifacts.

use indexmap::IndexMap;

use crate::catalog::DataItem;

/// Items selected for curation, unique by id, in first-insertion order.
///
/// The position of an item in this set is the index it receives on export.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    items: IndexMap<u64, DataItem>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the item unless its id is already present.
    ///
    /// Returns `true` if the set changed.
    pub fn add(&mut self, item: DataItem) -> bool {
        if self.items.contains_key(&item.id) {
            return false;
        }
        self.items.insert(item.id, item);
        true
    }

    /// Remove the item with this id, keeping the order of the others.
    ///
    /// Returns `true` if the set changed.
    pub fn remove(&mut self, id: u64) -> bool {
        self.items.shift_remove(&id).is_some()
    }

    /// Remove the item if present, otherwise add it. Returns the new
    /// membership state.
    pub fn toggle(&mut self, item: DataItem) -> bool {
        if self.remove(item.id) {
            false
        } else {
            self.add(item);
            true
        }
    }

    /// Empty the set. Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.items.contains_key(&id)
    }

    /// Selected items in insertion order.
    pub fn list(&self) -> Vec<DataItem> {
        self.items.values().cloned().collect()
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> Vec<u64> {
        self.items.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
