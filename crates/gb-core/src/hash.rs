//! Fx hash map and set aliases.
//!
//! Entity ids, filter keys and label names are all short strings, which is
//! the case the Fx hash from `rustc-hash` is tuned for. None of these maps
//! hold attacker-controlled keys in a long-lived server, so HashDoS
//! resistance is not needed.
//!
//! # Examples
//!
//! ```
//! use gb_core::{FxHashMap, fx_hash_map_with_capacity};
//!
//! let mut by_id: FxHashMap<&str, usize> = fx_hash_map_with_capacity(4);
//! by_id.insert("LA_kwDOA", 0);
//! assert_eq!(by_id.get("LA_kwDOA"), Some(&0));
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new [`FxHashMap`] able to hold `capacity` entries without
/// reallocating.
///
/// Mappers size their dedup indexes from the node count of the connection
/// they walk.
#[inline]
#[must_use]
pub fn fx_hash_map_with_capacity<K, V>(capacity: usize) -> FxHashMap<K, V> {
    FxHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

/// Creates a new [`FxHashSet`] able to hold `capacity` entries without
/// reallocating.
#[inline]
#[must_use]
pub fn fx_hash_set_with_capacity<V>(capacity: usize) -> FxHashSet<V> {
    FxHashSet::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}
