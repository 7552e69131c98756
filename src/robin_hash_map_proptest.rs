#![cfg(test)]

// Property tests for RobinHashMap kept inside the crate so they can check
// table-level counters (capacity, tombstones, cursor epochs) directly.

use crate::cursor::Cursor;
use crate::policy::MAX_LOAD;
use crate::robin_hash_map::RobinHashMap;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
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
    GetOrDefault(usize),
    Remove(usize),
    Find(usize),
    At(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let at_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::GetOrDefault),
            5 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![at_pool.prop_map(|s: String| s), "[a-z]{0,5}".prop_map(|s| s)]
                .prop_map(OpI::At),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Runs one scenario against `sut`, using std::collections::HashMap as model.
// Invariants exercised after every op:
// - insert is insert-if-absent: the first value wins, duplicates report false.
// - get_or_insert_default inserts 0 on a miss and never overwrites on a hit.
// - remove returns the model's value and leaves the key absent.
// - find/at parity with the model; at fails only for absent keys.
// - begin→end traversal and `iter` both yield exactly the model's key set.
// - len/is_empty parity; len + tombstones never exceeds capacity.
// - a cursor taken before an op is only readable afterwards if capacity and
//   epoch are unchanged.
fn run_state_machine<S: BuildHasher>(
    mut sut: RobinHashMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        let before_cap = sut.capacity();
        let probe_key = key_from(&pool, 0);
        let probe_cursor: Cursor = sut.find(&probe_key);

        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                let stored = sut.insert(k.clone(), v);
                prop_assert_eq!(stored, !already, "insert reports whether it stored");
                model.entry(k).or_insert(v);
            }
            OpI::GetOrDefault(i) => {
                let k = key_from(&pool, i);
                let got = *sut.get_or_insert_default(k.clone());
                let expected = *model.entry(k).or_insert(0);
                prop_assert_eq!(got, expected);
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                let len_before = sut.len();
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert!(!sut.contains_key(&k));
                prop_assert!(sut.len() <= len_before);
            }
            OpI::Find(i) => {
                let k = key_from(&pool, i);
                let c = sut.find(&k);
                match model.get(&k) {
                    Some(v) => {
                        prop_assert_eq!(c.value(&sut), Some(v));
                        prop_assert_eq!(c.key(&sut), Some(&k));
                    }
                    None => prop_assert_eq!(c, sut.end()),
                }
            }
            OpI::At(s) => {
                let expected = model.get(&Key(s.clone()));
                prop_assert_eq!(sut.at(s.as_str()).ok(), expected);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                if let Some(v) = sut.get_mut(&k) {
                    *v = v.saturating_add(d);
                }
                if let Some(v) = model.get_mut(&k) {
                    *v = v.saturating_add(d);
                }
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), before_cap, "clear keeps capacity");
                prop_assert_eq!(sut.tombstones(), 0);
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.len() + sut.tombstones() <= sut.capacity());
        prop_assert!(
            (sut.len() + sut.tombstones()) as f64 <= MAX_LOAD * sut.capacity() as f64 + 1.0
        );

        let mut walked = 0usize;
        let mut c = sut.begin();
        while c != sut.end() {
            let (k, v) = c.entry(&sut).expect("cursor before end is occupied");
            prop_assert_eq!(model.get(k), Some(v));
            walked += 1;
            c = c.advance(&sut);
        }
        prop_assert_eq!(walked, model.len());

        if sut.capacity() != before_cap {
            prop_assert_eq!(probe_cursor.key(&sut), None, "rebuild invalidates cursors");
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(RobinHashMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
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
// collision behavior (constant hasher). Every entry shares one ideal index,
// so Robin Hood displacement and tombstone pass-through carry all lookups.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(RobinHashMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Property: removing a random subset after bulk insertion keeps exactly the
// complement retrievable, whether or not compaction fired along the way.
proptest! {
    #[test]
    fn prop_bulk_remove_keeps_complement(n in 1usize..400, mask in proptest::collection::vec(any::<bool>(), 400)) {
        let mut m: RobinHashMap<usize, usize> = (0..n).map(|k| (k, k * 7)).collect();
        for k in (0..n).filter(|&k| mask[k]) {
            prop_assert_eq!(m.remove(&k), Some(k * 7));
        }
        prop_assert!(m.tombstones() <= m.len() + 2);
        for k in 0..n {
            let expected = if mask[k] { None } else { Some(k * 7) };
            prop_assert_eq!(m.get(&k).copied(), expected);
        }
        prop_assert_eq!(m.len(), (0..n).filter(|&k| !mask[k]).count());
    }
}
