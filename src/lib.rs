//! rh-hashmap: an open-addressed hash map with Robin Hood probing,
//! tombstone deletion and periodic compaction.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a drop-in dictionary whose storage is one contiguous array of
//!   value-typed slots, addressed by index. No per-entry allocation and no
//!   raw pointers.
//! - Layers:
//!   - `Slot`: Empty, Tombstone, or an occupied entry with its stored hash
//!     and probe displacement.
//!   - `Table`: fixed-capacity slot array plus `len`/`tombstones` counters;
//!     the probe engine (find/place/erase) and the rebuild routine are
//!     implemented on it.
//!   - `RobinHashMap<K, V, S>`: public API. Runs the compaction/resize
//!     policy before each mutation and exposes cursors and iterators.
//!
//! Constraints
//! - Keys are unique; `insert` is insert-if-absent and never overwrites.
//! - Every walk is linear and wraps at capacity. Lookups stop at the first
//!   Empty slot or after one full lap, so a table with no Empty slot still
//!   terminates.
//! - `(len + tombstones) <= MAX_LOAD * capacity` is checked before each
//!   mutation, never after.
//!
//! Policy
//! - Tombstones outnumbering live entries: rebuild at the same capacity.
//! - Otherwise load above `MAX_LOAD` (0.69): rebuild at double capacity.
//! - Both go through one routine. The replacement table is allocated before
//!   the live one is drained.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its `u64` hash. Probing compares stored hashes before
//!   keys, and rebuilds place entries from the stored hash alone, so neither
//!   `K: Hash` nor `K: Eq` runs during a rebuild.
//!
//! Cursors
//! - A `Cursor` is an index plus the epoch it was taken in. Rebuilds,
//!   `clear`, and inserts whose Robin Hood swaps move residents bump the
//!   epoch; stale cursors read `None` and advance to `end()`.
//!
//! Notes and non-goals
//! - No internal synchronization. Send/Sync follow `K`, `V` and `S`.
//! - No ordered iteration; order is slot order and changes on rebuild.
//! - No mandated hash-flooding resistance. The default hasher is hashbrown's.

mod cursor;
mod error;
mod iter;
mod policy;
mod probe;
mod robin_hash_map;
mod robin_hash_map_proptest;
mod slot;
mod table;

// Public surface
pub use cursor::Cursor;
pub use error::LookupError;
pub use hashbrown::DefaultHashBuilder;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use policy::MAX_LOAD;
pub use robin_hash_map::RobinHashMap;
