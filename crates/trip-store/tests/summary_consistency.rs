//! Summary Consistency Tests
//!
//! Incrementally maintained statistics must equal statistics recomputed from
//! the final collection, whatever sequence of mutations produced it.

use proptest::prelude::*;
use proptest::sample::Index;
use trip_store::{Mutation, OptimisticStore, Summary, Tracked};

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    id: u32,
    category: Option<u8>,
    packed: bool,
    /// Cents
    amount: i64,
}

impl Tracked for Entry {
    type Id = u32;
    type Group = u8;
    type Status = bool;

    fn id(&self) -> u32 {
        self.id
    }

    fn group(&self) -> Option<u8> {
        self.category
    }

    fn status(&self) -> bool {
        self.packed
    }

    fn set_status(&mut self, status: bool) {
        self.packed = status;
    }

    fn weight(&self) -> i64 {
        self.amount
    }
}

#[derive(Debug, Clone)]
enum Op {
    Create { category: Option<u8>, packed: bool, amount: i64 },
    Toggle(Index),
    Delete(Index),
    Recategorize(Index, Option<u8>),
    FailToggle(Index),
    FailDelete(Index),
    /// Server rejects one of the earlier requests, possibly superseded by now
    FailEarlier(Index),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (prop::option::of(0u8..4), any::<bool>(), 1i64..50_000)
            .prop_map(|(category, packed, amount)| Op::Create { category, packed, amount }),
        any::<Index>().prop_map(Op::Toggle),
        any::<Index>().prop_map(Op::Delete),
        (any::<Index>(), prop::option::of(0u8..4)).prop_map(|(i, c)| Op::Recategorize(i, c)),
        any::<Index>().prop_map(Op::FailToggle),
        any::<Index>().prop_map(Op::FailDelete),
        any::<Index>().prop_map(Op::FailEarlier),
    ]
}

fn pick(store: &OptimisticStore<Entry>, index: &Index) -> Option<u32> {
    if store.is_empty() {
        None
    } else {
        Some(store.items()[index.index(store.len())].id)
    }
}

proptest! {
    #[test]
    fn incremental_summary_matches_recomputed(ops in prop::collection::vec(op(), 0..64)) {
        let mut store = OptimisticStore::new();
        let mut next_id = 1;
        let mut pending: Vec<Mutation<Entry>> = Vec::new();

        for op in ops {
            match op {
                Op::Create { category, packed, amount } => {
                    store.insert(Entry { id: next_id, category, packed, amount });
                    next_id += 1;
                }
                Op::Toggle(index) => {
                    if let Some(id) = pick(&store, &index) {
                        pending.push(store.toggle(&id).unwrap());
                    }
                }
                Op::Delete(index) => {
                    if let Some(id) = pick(&store, &index) {
                        pending.push(store.remove(&id).unwrap());
                    }
                }
                Op::Recategorize(index, category) => {
                    if let Some(id) = pick(&store, &index) {
                        pending.extend(store.update(&id, |entry| entry.category = category).unwrap());
                    }
                }
                Op::FailToggle(index) => {
                    if let Some(id) = pick(&store, &index) {
                        let mutation = store.toggle(&id).unwrap();
                        prop_assert!(store.rollback(mutation));
                    }
                }
                Op::FailDelete(index) => {
                    if let Some(id) = pick(&store, &index) {
                        let mutation = store.remove(&id).unwrap();
                        prop_assert!(store.rollback(mutation));
                    }
                }
                Op::FailEarlier(index) => {
                    if !pending.is_empty() {
                        let mutation = pending.remove(index.index(pending.len()));
                        store.rollback(mutation);
                    }
                }
            }

            prop_assert!(store.summary().groups().all(|(_, bucket)| bucket.total > 0));
        }

        prop_assert_eq!(store.summary(), &Summary::from_items(store.items()));
    }

    #[test]
    fn double_toggle_is_identity(flags in prop::collection::vec(any::<bool>(), 1..16), index in any::<Index>()) {
        let items: Vec<Entry> = flags
            .iter()
            .enumerate()
            .map(|(i, packed)| Entry { id: i as u32, category: Some((i % 3) as u8), packed: *packed, amount: 0 })
            .collect();
        let mut store = OptimisticStore::from_items(items);
        let before = store.clone();
        let id = pick(&store, &index).unwrap();

        store.toggle(&id).unwrap();
        store.toggle(&id).unwrap();

        prop_assert_eq!(store.items(), before.items());
        prop_assert_eq!(store.summary(), before.summary());
    }
}
