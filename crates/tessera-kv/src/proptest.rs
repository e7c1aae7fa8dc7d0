//! Property-based tests for the store contract.
//!
//! 1. **Model equivalence**: a transaction behaves like a `BTreeMap` under any
//!    sequence of sets and deletes, before and after commit
//! 2. **Cursor order**: a full cursor walk yields keys in ascending order
//! 3. **Prefix bound**: every key extending a prefix sorts below `prefix_next`

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::KvStore;
use crate::MemoryStore;
use crate::Transaction;
use crate::prefix_next;

// =============================================================================
// Strategies
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Set(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// Short keys over a tiny alphabet so sets and deletes collide often.
fn arb_key() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c', 0x00, 0xFF]), 1..4)
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (arb_key(), prop::collection::vec(any::<u8>(), 1..8)).prop_map(|(k, v)| Op::Set(k, v)),
        1 => arb_key().prop_map(Op::Delete),
    ]
}

fn walk<T: Transaction>(txn: &T) -> Vec<(Vec<u8>, Vec<u8>)> {
    let mut out = Vec::new();
    let mut iter = txn.iter(b"\x00", None).unwrap();
    while iter.valid() {
        out.push((iter.key().to_vec(), iter.value().to_vec()));
        iter.next(txn).unwrap();
    }
    out
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Property: the transaction view always matches a map model.
    #[test]
    fn prop_memory_txn_matches_model(
        committed in prop::collection::vec(arb_op(), 0..20),
        pending in prop::collection::vec(arb_op(), 0..20),
    ) {
        let store = MemoryStore::new();
        let mut model: BTreeMap<Vec<u8>, Vec<u8>> = BTreeMap::new();

        let mut txn = store.begin().unwrap();
        for op in &committed {
            match op {
                Op::Set(k, v) => {
                    txn.set(k, v).unwrap();
                    model.insert(k.clone(), v.clone());
                }
                Op::Delete(k) => {
                    txn.delete(k).unwrap();
                    model.remove(k);
                }
            }
        }
        txn.commit().unwrap();

        let mut txn = store.begin().unwrap();
        for op in &pending {
            match op {
                Op::Set(k, v) => {
                    txn.set(k, v).unwrap();
                    model.insert(k.clone(), v.clone());
                }
                Op::Delete(k) => {
                    txn.delete(k).unwrap();
                    model.remove(k);
                }
            }
        }

        let expected: Vec<_> = model.into_iter().collect();
        prop_assert_eq!(walk(&txn), expected.clone());
        for (k, v) in &expected {
            prop_assert_eq!(&txn.get(k).unwrap(), v);
        }

        txn.commit().unwrap();
        let txn = store.begin().unwrap();
        prop_assert_eq!(walk(&txn), expected);
    }

    /// Property: keys extending a prefix sort strictly below its successor.
    #[test]
    fn prop_prefix_next_is_upper_bound(
        prefix in prop::collection::vec(any::<u8>(), 1..6),
        suffix in prop::collection::vec(any::<u8>(), 0..6),
    ) {
        if let Some(upper) = prefix_next(&prefix) {
            let mut key = prefix.clone();
            key.extend_from_slice(&suffix);
            prop_assert!(key < upper);
            prop_assert!(prefix < upper);
        } else {
            prop_assert!(prefix.iter().all(|&b| b == 0xFF));
        }
    }
}
