//! EntryTable: insertion-ordered storage layer with precomputed hashes.

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_table::Entry as TableEntry;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

/// Dense entry vector indexed by a hash table of positions.
///
/// Entries never move once pushed, so positions double as insertion order.
/// Each entry keeps the hash computed at insertion; the index is rebuilt
/// from stored hashes and never calls `K: Hash` again.
#[derive(Clone)]
pub struct EntryTable<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<usize>,
    entries: Vec<Entry<K, V>>,
}

impl<K, V> EntryTable<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<K, V> Default for EntryTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over entries in insertion order.
pub struct Iter<'a, K, V> {
    it: core::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self {
        Self {
            it: self.it.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|e| (&e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back().map(|e| (&e.key, &e.value))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<K, V, S> EntryTable<K, V, S> {
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_index(&self, i: usize) -> Option<(&K, &V)> {
        self.entries.get(i).map(|e| (&e.key, &e.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.entries.iter(),
        }
    }
}

impl<K, V, S> EntryTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    /// Position of `q` in insertion order, if present.
    pub fn find<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        if self.entries.is_empty() {
            return None;
        }
        let hash = self.make_hash(q);
        self.index
            .find(hash, |&i| self.entries[i].key.borrow() == q)
            .copied()
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|i| &self.entries[i].value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|i| {
            let e = &self.entries[i];
            (&e.key, &e.value)
        })
    }

    /// Insert `key`, or overwrite the value of an equal key already present.
    ///
    /// Overwriting keeps the stored key and its position; only the value is
    /// replaced and the old one returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        match self.index.entry(
            hash,
            |&i| self.entries[i].key == key,
            |&i| self.entries[i].hash,
        ) {
            TableEntry::Occupied(o) => {
                let i = *o.get();
                Some(core::mem::replace(&mut self.entries[i].value, value))
            }
            TableEntry::Vacant(v) => {
                let i = self.entries.len();
                let _ = v.insert(i);
                self.entries.push(Entry { key, value, hash });
                None
            }
        }
    }

    /// Release spare capacity left over from building.
    pub fn shrink_to_fit(&mut self) {
        let entries = &self.entries;
        self.index.shrink_to_fit(|&i| entries[i].hash);
        self.entries.shrink_to_fit();
    }
}

impl<K, V, S> Extend<(K, V)> for EntryTable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let entries = &self.entries;
        self.index.reserve(lower, |&i| entries[i].hash);
        self.entries.reserve(lower);
        for (k, v) in iter {
            let _ = self.insert(k, v);
        }
    }
}

impl<K, V, S> core::fmt::Debug for EntryTable<K, V, S>
where
    K: core::fmt::Debug,
    V: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.key, &e.value)))
            .finish()
    }
}
