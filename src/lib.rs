//! frozen-map: an immutable, insertion-ordered map that can itself be
//! hashed, compared and serialized like a plain value.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map that is built once and never mutated, usable as a key in
//!   other maps whenever its contents allow it.
//! - Layers:
//!   - EntryTable<K, V, S>: structural storage. A dense entry vector holds
//!     insertion order; a `hashbrown::HashTable` of positions gives O(1)
//!     average lookup. Each entry keeps its precomputed lookup hash.
//!   - TryHash + HashCell: fallible per-value hashing and a single-assignment
//!     cache for the container digest (unset, computed, or unhashable).
//!   - FrozenMap<K, V, S>: public API. An `Arc` handle over the table and
//!     the cache, so clones are the same instance.
//!
//! Constraints
//! - Contents never change after construction; no `&mut` access exists.
//! - Sources are copied in; the caller's map or pair list is never aliased.
//! - Hashability is a property of content: `try_hash` fails iff some value
//!   fails `TryHash`. Lookup, iteration and equality never depend on it.
//! - Each value is hashed at most once per instance. The digest is computed
//!   lazily on first request and cached together with any failure.
//!
//! Hash combination
//! - Keys and values are digested with a fixed-key hasher, independent of
//!   the lookup `BuildHasher`, so equal maps hash equal.
//! - Each (key, value) pair is mixed asymmetrically and non-linearly, then
//!   pairs are summed. The sum makes the digest order-independent; the mix
//!   keeps swapped values or key/value transpositions from colliding the
//!   way plain `hash(k) ^ hash(v)` does.
//!
//! Identity
//! - `FrozenMap::construct(Source::Frozen(m), None)` hands back `m` itself.
//!   `from_pairs` and friends always allocate.
//!
//! Threading
//! - `FrozenMap` is `Send + Sync` when its parts are. The hash cell is a
//!   `OnceLock`, so concurrent first calls to `try_hash` compute once.
//!
//! Notes and non-goals
//! - No partial updates and no structural sharing between instances.
//! - No ordering comparisons between maps.

mod entry_table;
mod error;
mod frozen_map;
mod hash;
mod hash_cell;
mod mapping;
mod reduce;
mod source;
mod value;

#[cfg(test)]
mod entry_table_proptest;

// Public surface
pub use error::{Error, Unhashable};
pub use frozen_map::{FrozenMap, Iter, Keys, Values};
pub use hash::TryHash;
pub use hash_cell::HashState;
pub use mapping::Mapping;
pub use reduce::Reduced;
pub use source::{KeywordName, Kwargs, Source};
pub use value::Value;

#[cfg(feature = "bench_internal")]
pub use entry_table::EntryTable;
