//! Property-based tests for the selection store and batch aggregation.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p tunekit --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p tunekit --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use tunekit::cleaning::{BatchSummary, ProcessedItem};
use tunekit::{DataItem, ItemKind, SelectionStore};

// =============================================================================
// Test Strategies
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Op {
    Add(u64),
    Remove(u64),
    Toggle(u64),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u64..12).prop_map(Op::Add),
        3 => (0u64..12).prop_map(Op::Remove),
        4 => (0u64..12).prop_map(Op::Toggle),
        1 => Just(Op::Clear),
    ]
}

fn item(id: u64) -> DataItem {
    DataItem::new(id, ItemKind::Code, format!("item {}", id), "body").with_tokens(id as u32)
}

/// Reference model: a vector in first-insertion order.
fn apply_model(model: &mut Vec<u64>, op: Op) {
    match op {
        Op::Add(id) => {
            if !model.contains(&id) {
                model.push(id);
            }
        }
        Op::Remove(id) => model.retain(|x| *x != id),
        Op::Toggle(id) => {
            if model.contains(&id) {
                model.retain(|x| *x != id);
            } else {
                model.push(id);
            }
        }
        Op::Clear => model.clear(),
    }
}

fn apply_store(store: &SelectionStore, op: Op) {
    match op {
        Op::Add(id) => {
            store.add(item(id));
        }
        Op::Remove(id) => {
            store.remove(id);
        }
        Op::Toggle(id) => {
            store.toggle(item(id));
        }
        Op::Clear => store.clear(),
    }
}

// =============================================================================
// Selection Properties
// =============================================================================

proptest! {
    /// The store agrees with the reference model after any operation sequence.
    #[test]
    fn selection_matches_model(ops in prop::collection::vec(op(), 0..64)) {
        let store = SelectionStore::new();
        let mut model = Vec::new();

        for op in ops {
            apply_store(&store, op);
            apply_model(&mut model, op);
        }

        prop_assert_eq!(store.ids(), model.clone());
        prop_assert_eq!(store.len(), model.len());
        prop_assert_eq!(store.list().len(), model.len());
    }

    /// No id is ever listed twice.
    #[test]
    fn selection_has_no_duplicates(ops in prop::collection::vec(op(), 0..64)) {
        let store = SelectionStore::new();
        for op in ops {
            apply_store(&store, op);
        }

        let ids = store.ids();
        let unique: HashSet<u64> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }

    /// Two toggles in a row restore the previous membership.
    #[test]
    fn toggle_twice_restores_membership(
        ops in prop::collection::vec(op(), 0..32),
        id in 0u64..12,
    ) {
        let store = SelectionStore::new();
        for op in ops {
            apply_store(&store, op);
        }

        let before: HashSet<u64> = store.ids().into_iter().collect();
        store.toggle(item(id));
        store.toggle(item(id));
        let after: HashSet<u64> = store.ids().into_iter().collect();

        prop_assert_eq!(before, after);
    }

    /// Re-adding an already selected item never moves it.
    #[test]
    fn add_keeps_first_insertion_order(ids in prop::collection::vec(0u64..12, 1..32)) {
        let store = SelectionStore::new();
        let mut first_seen = Vec::new();
        for id in &ids {
            store.add(item(*id));
            if !first_seen.contains(id) {
                first_seen.push(*id);
            }
        }

        prop_assert_eq!(store.ids(), first_seen);
    }

    /// Token total always equals the sum over listed items.
    #[test]
    fn total_tokens_matches_list(ops in prop::collection::vec(op(), 0..64)) {
        let store = SelectionStore::new();
        for op in ops {
            apply_store(&store, op);
        }

        let expected: u64 = store.list().iter().map(|i| u64::from(i.token_count)).sum();
        prop_assert_eq!(store.total_tokens(), expected);
    }
}

// =============================================================================
// Aggregation Properties
// =============================================================================

proptest! {
    /// The average stays within the range of the individual scores.
    #[test]
    fn average_is_bounded(scores in prop::collection::vec(0u8..=100, 1..50)) {
        let items: Vec<ProcessedItem> = scores
            .iter()
            .enumerate()
            .map(|(i, score)| ProcessedItem {
                quality_score: *score,
                ..ProcessedItem::fallback(&item(i as u64))
            })
            .collect();

        let summary = BatchSummary::from_items(items.len(), &items);
        let min = *scores.iter().min().unwrap();
        let max = *scores.iter().max().unwrap();

        prop_assert!(summary.avg_quality_score >= min);
        prop_assert!(summary.avg_quality_score <= max);
        prop_assert_eq!(summary.processed, scores.len());
    }
}
