#![cfg(test)]

// Property tests for EntryTable kept inside the crate so they do not
// require feature gates to access internal modules.

use crate::entry_table::EntryTable;
use proptest::prelude::*;
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Get(usize),
    Contains(String),
    Index(usize),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![contains_pool, "[a-z]{0,5}".prop_map(|s| s)].prop_map(OpI::Contains),
            (0usize..10).prop_map(OpI::Index),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Insertion-ordered association list; the obvious reference model.
#[derive(Default)]
struct Model {
    entries: Vec<(Key, i32)>,
}

impl Model {
    fn insert(&mut self, k: Key, v: i32) -> Option<i32> {
        match self.entries.iter_mut().find(|(mk, _)| *mk == k) {
            Some((_, mv)) => Some(std::mem::replace(mv, v)),
            None => {
                self.entries.push((k, v));
                None
            }
        }
    }
    fn get(&self, k: &str) -> Option<i32> {
        self.entries.iter().find(|(mk, _)| mk.0 == k).map(|(_, v)| *v)
    }
}

fn run_scenario<S>(mut sut: EntryTable<Key, i32, S>, pool: Vec<String>, ops: Vec<OpI>) -> Result<(), TestCaseError>
where
    S: std::hash::BuildHasher,
{
    let mut model = Model::default();
    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = Key(pool[i].clone());
                prop_assert_eq!(sut.insert(k.clone(), v), model.insert(k, v));
            }
            OpI::Get(i) => {
                prop_assert_eq!(sut.get(pool[i].as_str()).copied(), model.get(&pool[i]));
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(s.as_str()), model.get(&s).is_some());
            }
            OpI::Index(i) => {
                let got = sut.get_index(i).map(|(k, v)| (k.clone(), *v));
                prop_assert_eq!(got, model.entries.get(i).cloned());
            }
            OpI::Iterate => {
                let seen: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(&seen, &model.entries);
            }
        }
        prop_assert_eq!(sut.len(), model.entries.len());
        prop_assert_eq!(sut.is_empty(), model.entries.is_empty());
    }
    Ok(())
}

// Property: State-machine equivalence against an insertion-ordered model.
// Invariants exercised across random operation sequences:
// - Re-inserting a key replaces its value and returns the old one.
// - Positions follow first insertion and never move.
// - `get`/`contains_key` parity with the model, including borrowed lookup.
// - `iter` yields every entry exactly once, in insertion order.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(EntryTable::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl std::hash::BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: Same state-machine invariants as above, under worst-case
// collision behavior (constant hasher).
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(EntryTable::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}
