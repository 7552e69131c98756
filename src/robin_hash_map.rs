//! RobinHashMap: public container over the open-addressed table.

use crate::cursor::Cursor;
use crate::error::LookupError;
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::policy::{capacity_for, Rebuild};
use crate::probe::Placed;
use crate::table::Table;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::DefaultHashBuilder;

/// Hash map with Robin Hood linear probing and tombstone deletion.
///
/// Keys are unique. `insert` never overwrites; use `get_mut` or
/// `get_or_insert_default` to change a stored value.
///
/// The map has no internal synchronization. Mutation takes `&mut self`, so
/// sharing one across threads while any thread mutates it requires an
/// external lock held by the caller.
pub struct RobinHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    table: Table<K, V>,
    // Bumped on every rebuild, clear and insert that shifts residents;
    // stamps cursors.
    epoch: u64,
}

impl<K, V> RobinHashMap<K, V, DefaultHashBuilder> {
    /// Empty map with the default hasher and a single slot.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Sized to take `capacity` inserts without a growth rebuild.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<K, V> Default for RobinHashMap<K, V, DefaultHashBuilder> {
    fn default() -> Self {
        Self::new()
    }
}

// Accessors that never hash or compare keys.
impl<K, V, S> RobinHashMap<K, V, S> {
    /// Empty map using `hasher` for every key.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            table: Table::with_capacity(1),
            epoch: 0,
        }
    }

    /// Sized to take `capacity` inserts without a growth rebuild, using `hasher`.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            table: Table::with_capacity(capacity_for(capacity)),
            epoch: 0,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when no live entries remain. Tombstones do not count.
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Number of slots in the current table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Deleted slots not yet purged by a rebuild.
    pub fn tombstones(&self) -> usize {
        self.table.tombstones()
    }

    /// `(len + tombstones) / capacity`.
    pub fn load_factor(&self) -> f64 {
        (self.table.len() + self.table.tombstones()) as f64 / self.table.capacity() as f64
    }

    /// The hashing strategy this map was built with.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Removes every entry. Capacity is kept; cursors are invalidated.
    pub fn clear(&mut self) {
        log::trace!(
            "clearing map: {} live, {} tombstones, capacity {}",
            self.table.len(),
            self.table.tombstones(),
            self.table.capacity()
        );
        self.table.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Iterates `(&K, &V)` in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.table.slots().iter(),
            remaining: self.table.len(),
        }
    }

    /// Iterates `(&K, &mut V)` in slot order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let remaining = self.table.len();
        IterMut {
            slots: self.table.slots_mut().iter_mut(),
            remaining,
        }
    }

    /// Iterates keys in slot order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Iterates values in slot order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Iterates values mutably in slot order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Cursor at the first live entry, or `end()` when empty.
    pub fn begin(&self) -> Cursor {
        Cursor::new(self.table.next_occupied(0), self.epoch)
    }

    /// Cursor one past the last slot.
    pub fn end(&self) -> Cursor {
        Cursor::new(self.table.capacity(), self.epoch)
    }

    pub(crate) fn cursor_is_end(&self, c: Cursor) -> bool {
        c.epoch() != self.epoch || c.index() >= self.table.capacity()
    }

    pub(crate) fn cursor_entry(&self, c: Cursor) -> Option<(&K, &V)> {
        if c.epoch() != self.epoch {
            return None;
        }
        self.table.bucket(c.index()).map(|b| (&b.key, &b.value))
    }

    pub(crate) fn cursor_value_mut(&mut self, c: Cursor) -> Option<&mut V> {
        if c.epoch() != self.epoch {
            return None;
        }
        self.table.bucket_mut(c.index()).map(|b| &mut b.value)
    }

    pub(crate) fn cursor_advance(&self, c: Cursor) -> Cursor {
        if self.cursor_is_end(c) {
            return self.end();
        }
        Cursor::new(self.table.next_occupied(c.index() + 1), self.epoch)
    }

    /// Runs the compaction/resize policy ahead of a mutation.
    fn apply_policy(&mut self) {
        let capacity = self.table.capacity();
        let Some(plan) = Rebuild::plan(self.table.len(), self.table.tombstones(), capacity) else {
            return;
        };
        let target = plan.target_capacity(capacity);
        log::debug!(
            "{:?} rebuild: {} live, {} tombstones purged, capacity {} -> {}",
            plan,
            self.table.len(),
            self.table.tombstones(),
            capacity,
            target
        );
        self.table = self.table.rebuilt(target);
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// A Robin Hood swap moved resident entries, so cursors may now name
    /// other keys.
    fn note_shift(&mut self, placed: Placed) {
        if placed.shifted {
            log::trace!("placement at {} shifted residents; cursors invalidated", placed.index);
            self.epoch = self.epoch.wrapping_add(1);
        }
    }
}

impl<K, V, S> RobinHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn index_of<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.table.find(hash, |k| k.borrow() == q)
    }

    /// Inserts `key -> value` unless the key is already present. Returns
    /// whether the pair was stored; on `false` the existing value is kept
    /// and `value` is dropped.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.apply_policy();
        let hash = self.make_hash(&key);
        if self.table.find(hash, |k| *k == key).is_some() {
            return false;
        }
        let placed = self.table.place(hash, key, value);
        self.note_shift(placed);
        true
    }

    /// Removes `q` if present and returns its value.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Removes `q` if present and returns the stored key and value.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.apply_policy();
        let hash = self.make_hash(q);
        self.table
            .erase(hash, |k| k.borrow() == q)
            .map(|b| (b.key, b.value))
    }

    /// Cursor at the entry for `q`, or `end()`.
    pub fn find<Q>(&self, q: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.index_of(q) {
            Some(i) => Cursor::new(i, self.epoch),
            None => self.end(),
        }
    }

    /// True when `q` has a live entry.
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index_of(q).is_some()
    }

    /// Shared reference to the value for `q`.
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_key_value(q).map(|(_, v)| v)
    }

    /// Stored key and value for `q`.
    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.index_of(q)?;
        self.table.bucket(i).map(|b| (&b.key, &b.value))
    }

    /// Mutable reference to the value for `q`. Never inserts.
    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let i = self.index_of(q)?;
        self.table.bucket_mut(i).map(|b| &mut b.value)
    }

    /// Value for `q`, or [`LookupError::NotFound`].
    pub fn at<Q>(&self, q: &Q) -> Result<&V, LookupError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(LookupError::NotFound)
    }

    /// Mutable value for `q`, or [`LookupError::NotFound`].
    pub fn at_mut<Q>(&mut self, q: &Q) -> Result<&mut V, LookupError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(q).ok_or(LookupError::NotFound)
    }

    /// Mutable reference to the value for `key`, inserting `default()` first
    /// when the key is absent. `default` only runs on a miss.
    ///
    /// A miss is a mutation: it may trigger a rebuild, which invalidates
    /// cursors.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        let index = match self.table.find(hash, |k| *k == key) {
            Some(i) => i,
            None => {
                let value = default();
                self.apply_policy();
                let placed = self.table.place(hash, key, value);
                self.note_shift(placed);
                placed.index
            }
        };
        self.table
            .bucket_mut(index)
            .map(|b| &mut b.value)
            .expect("entry must exist at the index it was found or placed at")
    }

    /// Mutable reference to the value for `key`, inserting `V::default()`
    /// when the key is absent.
    ///
    /// This looks like a read but mutates on a miss: the map grows by one
    /// entry and may rebuild, invalidating cursors. Use [`get_mut`] for a
    /// lookup that never inserts.
    ///
    /// [`get_mut`]: RobinHashMap::get_mut
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }
}

impl<K, V, S> Clone for RobinHashMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity_and_hasher(self.len(), self.hasher.clone());
        out.extend(self.iter().map(|(k, v)| (k.clone(), v.clone())));
        out
    }

    /// Snapshot-then-rebuild: every live pair of `source` is cloned before
    /// `self` is cleared, then re-inserted.
    fn clone_from(&mut self, source: &Self) {
        let snapshot: Vec<(K, V)> = source
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.hasher = source.hasher.clone();
        self.clear();
        self.extend(snapshot);
    }
}

impl<K, V, S> PartialEq for RobinHashMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, S> Eq for RobinHashMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S> fmt::Debug for RobinHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S> Extend<(K, V)> for RobinHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, S> Extend<(&'a K, &'a V)> for RobinHashMap<K, V, S>
where
    K: Eq + Hash + Copy,
    V: Copy,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(k, v)| (*k, *v)));
    }
}

impl<K, V, S> FromIterator<(K, V)> for RobinHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for RobinHashMap<K, V, DefaultHashBuilder>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a, K, V, S> IntoIterator for &'a RobinHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut RobinHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S> IntoIterator for RobinHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let remaining = self.table.len();
        IntoIter {
            slots: self.table.into_slots().into_vec().into_iter(),
            remaining,
        }
    }
}
