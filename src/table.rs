//! Table: fixed-capacity slot array plus its occupancy counters.
//!
//! Index `capacity()` is the end position. It is never stored and never
//! probed; cursors compare against it to detect the end of storage.

use crate::slot::{Bucket, Slot};

pub(crate) struct Table<K, V> {
    slots: Box<[Slot<K, V>]>,
    len: usize,
    tombstones: usize,
}

impl<K, V> Table<K, V> {
    /// Allocates `capacity` empty slots. Capacity must be positive.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "table capacity must be positive");
        let slots = (0..capacity).map(|_| Slot::Empty).collect();
        Self {
            slots,
            len: 0,
            tombstones: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[inline]
    pub(crate) fn ideal_index(&self, hash: u64) -> usize {
        (hash % self.capacity() as u64) as usize
    }

    /// Next probe position, wrapping at capacity.
    #[inline]
    pub(crate) fn next_index(&self, i: usize) -> usize {
        let n = i + 1;
        if n == self.capacity() {
            0
        } else {
            n
        }
    }

    #[inline]
    pub(crate) fn slot(&self, i: usize) -> Option<&Slot<K, V>> {
        self.slots.get(i)
    }

    #[inline]
    pub(crate) fn bucket(&self, i: usize) -> Option<&Bucket<K, V>> {
        self.slots.get(i).and_then(Slot::bucket)
    }

    #[inline]
    pub(crate) fn bucket_mut(&mut self, i: usize) -> Option<&mut Bucket<K, V>> {
        self.slots.get_mut(i).and_then(Slot::bucket_mut)
    }

    /// First occupied index at or after `from`, or `capacity()` if none.
    /// Never wraps.
    pub(crate) fn next_occupied(&self, from: usize) -> usize {
        let cap = self.capacity();
        if from >= cap {
            return cap;
        }
        self.slots[from..]
            .iter()
            .position(Slot::is_occupied)
            .map_or(cap, |off| from + off)
    }

    /// Resets every slot to Empty without touching capacity.
    pub(crate) fn clear(&mut self) {
        for s in self.slots.iter_mut() {
            *s = Slot::Empty;
        }
        self.len = 0;
        self.tombstones = 0;
    }

    pub(crate) fn slots(&self) -> &[Slot<K, V>] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [Slot<K, V>] {
        &mut self.slots
    }

    pub(crate) fn into_slots(self) -> Box<[Slot<K, V>]> {
        self.slots
    }

    // Counter bookkeeping for the probe engine.

    #[inline]
    pub(crate) fn record_placed(&mut self, reused_tombstone: bool) {
        self.len += 1;
        if reused_tombstone {
            self.tombstones -= 1;
        }
    }

    #[inline]
    pub(crate) fn record_buried(&mut self) {
        self.len -= 1;
        self.tombstones += 1;
    }
}
