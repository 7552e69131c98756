//! Cursor: index-based traversal handle tagged with the map's epoch.

use crate::robin_hash_map::RobinHashMap;

/// A position in a map's slot array.
///
/// Cursors come from [`RobinHashMap::begin`], [`RobinHashMap::end`] and
/// [`RobinHashMap::find`]. They are plain `Copy` values that borrow nothing;
/// reading through one goes back to the map.
///
/// Every outstanding cursor is invalidated by:
/// - a rebuild (an insert or remove that compacts or grows the table);
/// - an insert whose Robin Hood placement moves resident entries;
/// - `clear`.
///
/// Reading through an invalidated cursor yields `None` and advancing it
/// yields `end()`. Removes and inserts that land without moving anyone
/// leave cursors to other entries valid.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    index: usize,
    epoch: u64,
}

impl Cursor {
    pub(crate) fn new(index: usize, epoch: u64) -> Self {
        Cursor { index, epoch }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True when positioned at the end of storage, or stale.
    pub fn is_end<K, V, S>(&self, map: &RobinHashMap<K, V, S>) -> bool {
        map.cursor_is_end(*self)
    }

    /// Next occupied position, or `map.end()`. Never wraps.
    pub fn advance<K, V, S>(&self, map: &RobinHashMap<K, V, S>) -> Cursor {
        map.cursor_advance(*self)
    }

    pub fn key<'a, K, V, S>(&self, map: &'a RobinHashMap<K, V, S>) -> Option<&'a K> {
        map.cursor_entry(*self).map(|(k, _)| k)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a RobinHashMap<K, V, S>) -> Option<&'a V> {
        map.cursor_entry(*self).map(|(_, v)| v)
    }

    pub fn entry<'a, K, V, S>(&self, map: &'a RobinHashMap<K, V, S>) -> Option<(&'a K, &'a V)> {
        map.cursor_entry(*self)
    }

    /// Mutable access to the value. Keys stay immutable.
    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut RobinHashMap<K, V, S>) -> Option<&'a mut V> {
        map.cursor_value_mut(*self)
    }
}
