//! Slot: one storage cell of the open-addressed table.

use core::mem;

/// A live entry. The hash is computed once at insertion and reused by every
/// probe and rebuild afterwards.
#[derive(Debug, Clone)]
pub(crate) struct Bucket<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    /// Probe steps between the ideal index and the slot this entry sits in.
    pub(crate) displacement: usize,
}

impl<K, V> Bucket<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            displacement: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(Bucket<K, V>),
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

impl<K, V> Slot<K, V> {
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub(crate) fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }

    #[inline]
    pub(crate) fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    #[inline]
    pub(crate) fn bucket(&self) -> Option<&Bucket<K, V>> {
        match self {
            Slot::Occupied(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn bucket_mut(&mut self) -> Option<&mut Bucket<K, V>> {
        match self {
            Slot::Occupied(b) => Some(b),
            _ => None,
        }
    }

    pub(crate) fn into_bucket(self) -> Option<Bucket<K, V>> {
        match self {
            Slot::Occupied(b) => Some(b),
            _ => None,
        }
    }

    /// Moves the contents out, leaving `Empty` behind.
    pub(crate) fn take(&mut self) -> Slot<K, V> {
        mem::take(self)
    }

    /// Marks an occupied slot deleted and hands back its entry. Other states
    /// are left untouched.
    pub(crate) fn bury(&mut self) -> Option<Bucket<K, V>> {
        if !self.is_occupied() {
            return None;
        }
        mem::replace(self, Slot::Tombstone).into_bucket()
    }
}
