//! Shared, serialized handle over the selection set.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::catalog::DataItem;

use super::set::SelectionSet;

#[derive(Debug, Default)]
struct Inner {
    set: SelectionSet,
    generation: u64,
}

/// Cloneable handle to the single selection for a session.
///
/// Every mutation runs as one locked check-and-act against the current
/// state, so concurrent toggles never act on a stale snapshot. The
/// generation counter increments on each effective membership change.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    inner: Arc<Mutex<Inner>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the set half-mutated.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mutate(&self, f: impl FnOnce(&mut SelectionSet) -> bool) -> bool {
        let mut inner = self.lock();
        let changed = f(&mut inner.set);
        if changed {
            inner.generation += 1;
        }
        changed
    }

    /// Add the item if not already selected. Returns `true` if it was added.
    pub fn add(&self, item: DataItem) -> bool {
        let id = item.id;
        let added = self.mutate(|set| set.add(item));
        tracing::trace!(id, added, "selection add");
        added
    }

    /// Remove the item if selected. Returns `true` if it was removed.
    pub fn remove(&self, id: u64) -> bool {
        let removed = self.mutate(|set| set.remove(id));
        tracing::trace!(id, removed, "selection remove");
        removed
    }

    /// Flip membership of the item. Returns the new membership state.
    pub fn toggle(&self, item: DataItem) -> bool {
        let mut inner = self.lock();
        let selected = inner.set.toggle(item);
        inner.generation += 1;
        selected
    }

    pub fn clear(&self) {
        self.mutate(SelectionSet::clear);
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.lock().set.is_selected(id)
    }

    /// Selected items in insertion order.
    pub fn list(&self) -> Vec<DataItem> {
        self.lock().set.list()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.lock().set.ids()
    }

    pub fn len(&self) -> usize {
        self.lock().set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().set.is_empty()
    }

    /// Sum of the token counts of all selected items.
    pub fn total_tokens(&self) -> u64 {
        self.lock()
            .set
            .iter()
            .map(|item| u64::from(item.token_count))
            .sum()
    }

    /// Current generation; changes whenever membership changes.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Generation and items read under one lock.
    pub fn snapshot(&self) -> (u64, Vec<DataItem>) {
        let inner = self.lock();
        (inner.generation, inner.set.list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemKind;
    use std::thread;

    fn item(id: u64) -> DataItem {
        DataItem::new(id, ItemKind::Prompt, format!("p{}", id), "text").with_tokens(10)
    }

    #[test]
    fn test_generation_only_moves_on_change() {
        let store = SelectionStore::new();
        assert_eq!(store.generation(), 0);

        store.add(item(1));
        store.add(item(1));
        assert_eq!(store.generation(), 1);

        store.remove(42);
        store.clear();
        store.clear();
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let store = SelectionStore::new();
        let other = store.clone();
        other.add(item(1));
        assert!(store.is_selected(1));
        assert_eq!(store.total_tokens(), 10);
    }

    #[test]
    fn test_concurrent_toggles_do_not_lose_updates() {
        let store = SelectionStore::new();

        // Each item is toggled an even number of times across threads, so
        // with serialized mutations every item ends up unselected.
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for id in 0..50 {
                        store.toggle(item(id));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(store.is_empty());
        assert_eq!(store.generation(), 8 * 50);
    }

    #[test]
    fn test_snapshot_is_consistent() {
        let store = SelectionStore::new();
        store.add(item(2));
        store.add(item(1));
        let (generation, items) = store.snapshot();
        assert_eq!(generation, 2);
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![2, 1]);
    }
}
