//! Hash map and set aliases.
//!
//! All in-memory indices use `hashbrown` tables keyed with `ahash`, which is
//! considerably faster than SipHash for the small integer keys used here.

/// Fast, non-cryptographic hash builder.
pub type FxBuildHasher = ahash::RandomState;

/// Hash map with the fast hasher.
pub type FxHashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Hash set with the fast hasher.
pub type FxHashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Creates an empty [`FxHashMap`] sized for `capacity` entries.
#[must_use]
pub fn map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher::default())
}
