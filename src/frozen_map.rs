//! FrozenMap: the public immutable container.

use crate::entry_table::{self, EntryTable};
use crate::error::{Error, Unhashable};
use crate::hash::{digest_of, try_digest_of, Combiner, TryHash};
use crate::hash_cell::{HashCell, HashState};
use crate::mapping::Mapping;
use crate::source::{Kwargs, Source};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};
use core::ops::Index;
use std::collections::hash_map::RandomState;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, trace};

struct Inner<K, V, S> {
    table: EntryTable<K, V, S>,
    hash: HashCell,
}

/// An immutable, insertion-ordered map.
///
/// A `FrozenMap` is a cheap handle over storage that is never mutated after
/// construction: cloning it yields the same instance (see [`ptr_eq`]).
/// Equality ignores order. The map is hashable exactly when every value it
/// holds is ([`try_hash`]); the digest is computed on first request and
/// cached for the lifetime of the instance.
///
/// [`ptr_eq`]: FrozenMap::ptr_eq
/// [`try_hash`]: FrozenMap::try_hash
pub struct FrozenMap<K, V, S = RandomState> {
    inner: Arc<Inner<K, V, S>>,
}

impl<K, V, S> Clone for FrozenMap<K, V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> FrozenMap<K, V>
where
    K: Eq + Hash,
{
    /// The empty map.
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S> Default for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    /// Build a new map from `(key, value)` pairs.
    ///
    /// Always allocates fresh storage. A key seen twice keeps its first
    /// position and its last value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_pairs_with_hasher(pairs, S::default())
    }

    /// Copy every entry out of `source`; later changes to it are not seen.
    pub fn from_mapping<M>(source: &M) -> Self
    where
        M: Mapping<K, V> + ?Sized,
        K: Clone,
        V: Clone,
    {
        Self::from_pairs(source.pairs().map(|(k, v)| (k.clone(), v.clone())))
    }

    /// General constructor: an optional positional source plus named entries.
    ///
    /// Named entries are applied after the source and win on key collision.
    /// An existing map passed with no named entries is returned as is.
    pub fn construct(source: Source<'_, K, V, S>, kwargs: Option<Kwargs<V>>) -> Self
    where
        K: Clone + From<String>,
        V: Clone,
    {
        let (source, kwargs) = match (source, kwargs.filter(|kw| !kw.is_empty())) {
            (Source::Frozen(existing), None) => {
                trace!(len = existing.len(), "frozen map reused without copying");
                return existing;
            }
            other => other,
        };
        let named = kwargs
            .into_iter()
            .flat_map(Kwargs::into_entries)
            .map(|(name, v)| (K::from(name), v));

        match source {
            Source::Empty => {
                trace!("building frozen map from named entries");
                Self::from_pairs(named)
            }
            Source::Frozen(existing) => {
                trace!(len = existing.len(), "copying frozen map to apply named entries");
                let copied = existing.iter().map(|(k, v)| (k.clone(), v.clone()));
                Self::from_pairs(copied.chain(named))
            }
            Source::Mapping(m) => {
                trace!(len = m.len(), "copying mapping into frozen map");
                let copied = m.pairs().map(|(k, v)| (k.clone(), v.clone()));
                Self::from_pairs(copied.chain(named))
            }
            Source::Pairs(pairs) => {
                trace!(len = pairs.len(), "building frozen map from pairs");
                Self::from_pairs(pairs.into_iter().chain(named))
            }
        }
    }
}

impl<K, V, S> FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// The empty map using `hasher` for lookups.
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_table(EntryTable::with_hasher(hasher))
    }

    /// Build a new map from `(key, value)` pairs using `hasher` for lookups.
    pub fn from_pairs_with_hasher<I>(pairs: I, hasher: S) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        let (lower, _) = pairs.size_hint();
        let mut table = EntryTable::with_capacity_and_hasher(lower, hasher);
        table.extend(pairs);
        table.shrink_to_fit();
        trace!(len = table.len(), "frozen map built");
        Self::from_table(table)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.table.get(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.table.get_key_value(key)
    }

    /// Like [`get`](Self::get), but an absent key is an error.
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq + fmt::Debug,
    {
        self.get(key).ok_or_else(|| Error::KeyNotFound {
            key: format!("{:?}", key),
        })
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.table.contains_key(key)
    }

    /// Same content as `other`, whatever kind of mapping it is.
    pub fn eq_mapping<V2, M>(&self, other: &M) -> bool
    where
        M: Mapping<K, V2> + ?Sized,
        V: PartialEq<V2>,
    {
        self.len() == other.len()
            && other
                .pairs()
                .all(|(k, v)| self.get(k).map_or(false, |mine| mine == v))
    }
}

impl<K, V, S> FrozenMap<K, V, S> {
    fn from_table(table: EntryTable<K, V, S>) -> Self {
        Self {
            inner: Arc::new(Inner {
                table,
                hash: HashCell::new(),
            }),
        }
    }

    pub fn hasher(&self) -> &S {
        self.inner.table.hasher()
    }

    pub fn len(&self) -> usize {
        self.inner.table.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.table.is_empty()
    }

    /// Entry at position `index` in insertion order.
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.inner.table.get_index(index)
    }

    /// Entries in insertion order. Each call starts a fresh pass.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.inner.table.iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// True if both handles refer to the same instance.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }

    /// Current state of the hash cache, without computing anything.
    pub fn hash_state(&self) -> HashState {
        self.inner.hash.state()
    }
}

impl<K, V, S> FrozenMap<K, V, S>
where
    K: Hash,
    V: TryHash,
{
    /// Content digest, or the reason the map cannot be hashed.
    ///
    /// The first call hashes every key and value once and caches the outcome,
    /// success or failure. Later calls only read the cache.
    pub fn try_hash(&self) -> Result<u64, Unhashable> {
        self.inner.hash.get_or_compute(|| {
            let mut combiner = Combiner::default();
            for (k, v) in self.inner.table.iter() {
                match try_digest_of(v) {
                    Ok(vd) => combiner.add(digest_of(k), vd),
                    Err(cause) => {
                        debug!(cause = cause.type_name(), "frozen map holds an unhashable value");
                        return Err(Unhashable::new("FrozenMap"));
                    }
                }
            }
            let h = combiner.finish();
            trace!(len = self.len(), hash = h, "frozen map hash computed");
            Ok(h)
        })
    }

    pub fn is_hashable(&self) -> bool {
        self.try_hash().is_ok()
    }
}

impl<K, V, S> TryHash for FrozenMap<K, V, S>
where
    K: Hash,
    V: TryHash,
{
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        state.write_u64(FrozenMap::try_hash(self)?);
        Ok(())
    }
}

/// Hashes the cached content digest.
///
/// # Panics
///
/// Panics if the map holds an unhashable value. Use
/// [`FrozenMap::try_hash`] to check first.
impl<K, V, S> Hash for FrozenMap<K, V, S>
where
    K: Hash,
    V: TryHash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        match FrozenMap::try_hash(self) {
            Ok(h) => state.write_u64(h),
            Err(e) => panic!("{}", e),
        }
    }
}

impl<K, V, S, S2> PartialEq<FrozenMap<K, V, S2>> for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &FrozenMap<K, V, S2>) -> bool {
        self.eq_mapping(other)
    }
}

impl<K, V, S> Eq for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    V: Eq,
    S: BuildHasher,
{
}

impl<K, V, S, S2> PartialEq<HashMap<K, V, S2>> for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &HashMap<K, V, S2>) -> bool {
        self.eq_mapping(other)
    }
}

impl<K, V, S, S2> PartialEq<FrozenMap<K, V, S>> for HashMap<K, V, S2>
where
    K: Eq + Hash,
    V: PartialEq,
    S: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &FrozenMap<K, V, S>) -> bool {
        other.eq_mapping(self)
    }
}

impl<K, V, S> PartialEq<BTreeMap<K, V>> for FrozenMap<K, V, S>
where
    K: Eq + Hash + Ord,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &BTreeMap<K, V>) -> bool {
        self.eq_mapping(other)
    }
}

impl<K, V, S> PartialEq<FrozenMap<K, V, S>> for BTreeMap<K, V>
where
    K: Eq + Hash + Ord,
    V: PartialEq,
    S: BuildHasher,
{
    fn eq(&self, other: &FrozenMap<K, V, S>) -> bool {
        other.eq_mapping(self)
    }
}

impl<K, Q, V, S> Index<&Q> for FrozenMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(v) => v,
            None => panic!("key not found in FrozenMap"),
        }
    }
}

impl<K, V, S> fmt::Debug for FrozenMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FrozenMap(")?;
        fmt::Debug::fmt(&self.inner.table, f)?;
        f.write_str(")")
    }
}

impl<K, V, S> FromIterator<(K, V)> for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for FrozenMap<K, V>
where
    K: Eq + Hash,
{
    fn from(pairs: [(K, V); N]) -> Self {
        Self::from_pairs(pairs)
    }
}

impl<K, V, S> From<HashMap<K, V, S>> for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn from(map: HashMap<K, V, S>) -> Self {
        let hasher = map.hasher().clone();
        Self::from_pairs_with_hasher(map, hasher)
    }
}

impl<K, V> From<BTreeMap<K, V>> for FrozenMap<K, V>
where
    K: Eq + Hash,
{
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::from_pairs(map)
    }
}

/// Iterator over `(&K, &V)` in insertion order.
pub struct Iter<'a, K, V> {
    inner: entry_table::Iter<'a, K, V>,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// Iterator over keys in insertion order.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Keys<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<'a, K, V> ExactSizeIterator for Keys<'a, K, V> {}

/// Iterator over values in insertion order.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Clone for Values<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Values<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<'a, K, V> ExactSizeIterator for Values<'a, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a FrozenMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
