//! Property-based tests for the set layer.
//!
//! 1. **Model equivalence**: any sequence of adds, removes, pops and moves
//!    leaves each set's members equal to a `BTreeSet` model
//! 2. **Cardinality**: the stored `len` equals the number of member keys
//! 3. **Dedup**: the helper keeps exactly the first occurrence of each member

use std::collections::BTreeSet;
use std::collections::HashSet;

use proptest::prelude::*;
use tessera_kv::KvStore;
use tessera_kv::MemoryStore;
use tessera_kv::Transaction;

use super::SetHandle;
use super::dedup_members;
use super::member_prefix;
use crate::clock::ManualClock;
use crate::keys::KeySpace;

// =============================================================================
// Strategies
// =============================================================================

#[derive(Debug, Clone)]
enum SetOp {
    Add(usize, Vec<Vec<u8>>),
    Rem(usize, Vec<Vec<u8>>),
    Pop(usize, u64),
    Move(usize, usize, Vec<u8>),
}

const SET_KEYS: [&[u8]; 2] = [b"left", b"right"];

fn arb_member() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c', b':', 0x00, 0xFF]), 0..3)
}

fn arb_op() -> impl Strategy<Value = SetOp> {
    let which = 0..SET_KEYS.len();
    prop_oneof![
        3 => (which.clone(), prop::collection::vec(arb_member(), 0..5)).prop_map(|(s, m)| SetOp::Add(s, m)),
        2 => (which.clone(), prop::collection::vec(arb_member(), 0..5)).prop_map(|(s, m)| SetOp::Rem(s, m)),
        1 => (which.clone(), 0u64..4).prop_map(|(s, n)| SetOp::Pop(s, n)),
        1 => (which.clone(), which, arb_member()).prop_map(|(s, d, m)| SetOp::Move(s, d, m)),
    ]
}

fn apply(model: &mut [BTreeSet<Vec<u8>>; 2], op: &SetOp) {
    match op {
        SetOp::Add(s, members) => model[*s].extend(members.iter().cloned()),
        SetOp::Rem(s, members) => {
            for member in members {
                model[*s].remove(member);
            }
        }
        SetOp::Pop(s, count) => {
            for _ in 0..*count {
                model[*s].pop_first();
            }
        }
        SetOp::Move(s, d, member) => {
            if s != d && model[*s].remove(member) {
                model[*d].insert(member.clone());
            }
        }
    }
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Property: stored sets track a model under arbitrary operations.
    #[test]
    fn prop_sets_match_model(ops in prop::collection::vec(arb_op(), 1..25)) {
        let store = MemoryStore::new();
        let keys = KeySpace::new("prop", 0);
        let clock = ManualClock::new(1);
        let mut model: [BTreeSet<Vec<u8>>; 2] = Default::default();

        for op in &ops {
            let mut txn = store.begin().unwrap();
            match op {
                SetOp::Add(s, members) => {
                    let before = model[*s].len();
                    let mut set = SetHandle::load(&mut txn, &keys, &clock, SET_KEYS[*s]).unwrap();
                    let added = set.sadd(members).unwrap();
                    apply(&mut model, op);
                    prop_assert_eq!(added as usize, model[*s].len() - before);
                }
                SetOp::Rem(s, members) => {
                    let before = model[*s].len();
                    let mut set = SetHandle::load(&mut txn, &keys, &clock, SET_KEYS[*s]).unwrap();
                    let removed = set.srem(members).unwrap();
                    apply(&mut model, op);
                    prop_assert_eq!(removed as usize, before - model[*s].len());
                }
                SetOp::Pop(s, count) => {
                    let expected: Vec<Vec<u8>> = model[*s].iter().take(*count as usize).cloned().collect();
                    let mut set = SetHandle::load(&mut txn, &keys, &clock, SET_KEYS[*s]).unwrap();
                    prop_assert_eq!(set.spop(*count).unwrap(), expected);
                    apply(&mut model, op);
                }
                SetOp::Move(s, d, member) => {
                    let expected = model[*s].contains(member);
                    let mut set = SetHandle::load(&mut txn, &keys, &clock, SET_KEYS[*s]).unwrap();
                    prop_assert_eq!(set.smove(SET_KEYS[*d], member).unwrap(), expected);
                    apply(&mut model, op);
                }
            }
            txn.commit().unwrap();
        }

        for (i, key) in SET_KEYS.iter().enumerate() {
            let mut txn = store.begin().unwrap();
            let set = SetHandle::load(&mut txn, &keys, &clock, key).unwrap();
            let expected: Vec<Vec<u8>> = model[i].iter().cloned().collect();

            prop_assert_eq!(set.smembers().unwrap(), expected.clone());
            if set.exists() {
                prop_assert_eq!(set.scard(), expected.len() as u64);
                let prefix = member_prefix(&keys.data_prefix(&set.meta().header.id));
                prop_assert_eq!(store.keys_with_prefix(&prefix).len(), expected.len());
            } else {
                prop_assert!(expected.is_empty());
            }
            for member in &expected {
                prop_assert!(set.sismember(member).unwrap());
            }
        }
    }

    /// Property: dedup keeps each distinct member once, at its first position.
    #[test]
    fn prop_dedup_first_occurrence(members in prop::collection::vec(arb_member(), 0..20)) {
        let unique = dedup_members(&members);

        let distinct: HashSet<&[u8]> = members.iter().map(Vec::as_slice).collect();
        prop_assert_eq!(unique.len(), distinct.len());

        let mut seen = HashSet::new();
        let firsts: Vec<&[u8]> = members.iter().map(Vec::as_slice).filter(|m| seen.insert(*m)).collect();
        prop_assert_eq!(unique, firsts);
    }
}
