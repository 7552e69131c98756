//! Compaction/resize policy and the shared rebuild routine.

use crate::table::Table;

/// Maximum load factor, counting tombstones as load.
pub const MAX_LOAD: f64 = 0.69;

/// Which rebuild a mutating call must perform before it proceeds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Rebuild {
    /// Same capacity, tombstones purged.
    Compact,
    /// Doubled capacity, tombstones purged.
    Grow,
}

impl Rebuild {
    /// Decide from the current counters. Compaction wins when tombstones
    /// outnumber live entries; in that state the live entries fit at the
    /// current capacity anyway.
    pub(crate) fn plan(len: usize, tombstones: usize, capacity: usize) -> Option<Rebuild> {
        if tombstones > len {
            Some(Rebuild::Compact)
        } else if exceeds_load(len + tombstones, capacity) {
            Some(Rebuild::Grow)
        } else {
            None
        }
    }

    pub(crate) fn target_capacity(self, capacity: usize) -> usize {
        match self {
            Rebuild::Compact => capacity,
            Rebuild::Grow => capacity
                .checked_mul(2)
                .expect("capacity overflow while growing table"),
        }
    }
}

#[inline]
pub(crate) fn exceeds_load(occupied: usize, capacity: usize) -> bool {
    occupied as f64 > MAX_LOAD * capacity as f64
}

/// Smallest doubling of 1 able to take `entries` inserts without a growth
/// rebuild.
pub(crate) fn capacity_for(entries: usize) -> usize {
    let mut capacity = 1usize;
    // The check runs before each insert, so the last insert sees `entries - 1`.
    while exceeds_load(entries.saturating_sub(1), capacity) {
        capacity = capacity
            .checked_mul(2)
            .expect("capacity overflow while sizing table");
    }
    capacity
}

impl<K, V> Table<K, V> {
    /// Moves every live entry, in index order, into a fresh table of
    /// `capacity` slots and returns it.
    ///
    /// The replacement is allocated before `self` is touched. Placement only
    /// uses stored hashes, so no user code runs while `self` is being drained.
    pub(crate) fn rebuilt(&mut self, capacity: usize) -> Table<K, V> {
        let mut fresh = Table::with_capacity(capacity);
        for slot in self.slots_mut() {
            if let Some(b) = slot.take().into_bucket() {
                fresh.place(b.hash, b.key, b.value);
            }
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Slot;

    /// Invariant: compaction is chosen whenever tombstones outnumber live
    /// entries, growth when the load factor is exceeded, nothing otherwise.
    #[test]
    fn plan_decisions() {
        assert_eq!(Rebuild::plan(0, 0, 1), None);
        assert_eq!(Rebuild::plan(1, 0, 1), Some(Rebuild::Grow));
        assert_eq!(Rebuild::plan(1, 0, 2), None);
        assert_eq!(Rebuild::plan(2, 0, 2), Some(Rebuild::Grow));
        assert_eq!(Rebuild::plan(3, 4, 16), Some(Rebuild::Compact));
        assert_eq!(Rebuild::plan(4, 4, 16), None);
        assert_eq!(Rebuild::plan(6, 6, 16), Some(Rebuild::Grow));
        // 0.69 * 100 = 69
        assert_eq!(Rebuild::plan(69, 0, 100), None);
        assert_eq!(Rebuild::plan(69, 1, 100), Some(Rebuild::Grow));
    }

    #[test]
    fn target_capacity_per_kind() {
        assert_eq!(Rebuild::Compact.target_capacity(8), 8);
        assert_eq!(Rebuild::Grow.target_capacity(8), 16);
    }

    /// Invariant: `capacity_for(n)` admits `n` inserts without growth and is
    /// the smallest such doubling.
    #[test]
    fn capacity_for_fits_entries() {
        assert_eq!(capacity_for(0), 1);
        assert_eq!(capacity_for(1), 1);
        assert_eq!(capacity_for(2), 2);
        assert_eq!(capacity_for(3), 4);
        assert_eq!(capacity_for(100), 256);
        for n in 0..300 {
            let c = capacity_for(n);
            assert!(!exceeds_load(n.saturating_sub(1), c));
            if c > 1 {
                assert!(exceeds_load(n.saturating_sub(1), c / 2));
            }
        }
    }

    /// Invariant: a rebuild keeps every live entry, drops tombstones and
    /// leaves the source table empty.
    #[test]
    fn rebuild_purges_tombstones() {
        let mut t: Table<u64, u64> = Table::with_capacity(8);
        for k in 0..5u64 {
            t.place(k, k, k * 10);
        }
        t.erase(1, |k| *k == 1);
        t.erase(3, |k| *k == 3);
        assert_eq!((t.len(), t.tombstones()), (3, 2));

        let fresh = t.rebuilt(16);
        assert_eq!(fresh.capacity(), 16);
        assert_eq!((fresh.len(), fresh.tombstones()), (3, 0));
        for k in [0u64, 2, 4] {
            let i = fresh.find(k, |q| *q == k).expect("live entry kept");
            assert_eq!(fresh.bucket(i).map(|b| b.value), Some(k * 10));
        }
        assert!(fresh.find(1, |q| *q == 1).is_none());
        assert!(t.slots().iter().all(Slot::is_empty));
    }

    /// Invariant: same-capacity rebuild keeps live entries in their
    /// pre-rebuild relative order when nothing collides.
    #[test]
    fn compaction_preserves_order() {
        let mut t: Table<u64, ()> = Table::with_capacity(8);
        for k in [6u64, 2, 4, 0] {
            t.place(k, k, ());
        }
        t.erase(4, |k| *k == 4);
        let fresh = t.rebuilt(8);
        let keys: Vec<u64> = fresh
            .slots()
            .iter()
            .filter_map(|s| s.bucket().map(|b| b.key))
            .collect();
        assert_eq!(keys, vec![0, 2, 6]);
    }
}
