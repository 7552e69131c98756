//! Probe engine: linear probing with Robin Hood displacement.
//!
//! Every walk starts at `hash mod capacity` and steps forward one slot at a
//! time, wrapping at capacity. Lookups stop at the first Empty slot or when
//! the walk comes back to where it started; the second condition is what
//! terminates a probe over a table saturated with entries and tombstones.

use crate::slot::{Bucket, Slot};
use crate::table::Table;

/// Outcome of [`Table::place`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Placed {
    /// Where the new key settled.
    pub(crate) index: usize,
    /// Whether a Robin Hood swap moved at least one resident entry.
    pub(crate) shifted: bool,
}

impl<K, V> Table<K, V> {
    /// Index of the occupied slot whose key matches, if any.
    ///
    /// `eq` only runs for entries whose stored hash equals `hash`.
    pub(crate) fn find(&self, hash: u64, mut eq: impl FnMut(&K) -> bool) -> Option<usize> {
        let start = self.ideal_index(hash);
        let mut i = start;
        loop {
            match self.slot(i)? {
                Slot::Empty => return None,
                Slot::Occupied(b) if b.hash == hash && eq(&b.key) => return Some(i),
                // Tombstones and non-matching entries are passed through.
                _ => {}
            }
            i = self.next_index(i);
            if i == start {
                return None;
            }
        }
    }

    /// Places an entry whose key is known to be absent and reports where
    /// that key settled and whether any resident entry was moved.
    ///
    /// Robin Hood rule: when the carried entry has probed further than the
    /// resident, they trade places and the evicted resident carries on. The
    /// walk ends at the first Empty or Tombstone slot.
    pub(crate) fn place(&mut self, hash: u64, key: K, value: V) -> Placed {
        debug_assert!(self.len() < self.capacity(), "placement into a full table");
        let cap = self.capacity();
        let mut carried = Bucket::new(key, value, hash);
        let mut settled = None;
        let mut i = self.ideal_index(hash);
        loop {
            let slot = &mut self.slots_mut()[i];
            if let Slot::Occupied(resident) = slot {
                if carried.displacement > resident.displacement {
                    core::mem::swap(&mut carried, resident);
                    settled.get_or_insert(i);
                }
                carried.displacement += 1;
                i = if i + 1 == cap { 0 } else { i + 1 };
                continue;
            }
            let reused = slot.is_tombstone();
            *slot = Slot::Occupied(carried);
            self.record_placed(reused);
            return Placed {
                index: settled.unwrap_or(i),
                shifted: settled.is_some(),
            };
        }
    }

    /// Tombstones the matching entry and returns it. Same walk as `find`.
    pub(crate) fn erase(&mut self, hash: u64, eq: impl FnMut(&K) -> bool) -> Option<Bucket<K, V>> {
        let i = self.find(hash, eq)?;
        let bucket = self.slots_mut()[i].bury()?;
        self.record_buried();
        Some(bucket)
    }
}
