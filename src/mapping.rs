//! Read-only mapping protocol shared by frozen and std maps.

use crate::frozen_map::FrozenMap;
use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeMap, HashMap};

/// Anything that can be read as a finite set of `(key, value)` entries.
///
/// Object safe, so construction can take `&dyn Mapping<K, V>`.
pub trait Mapping<K, V> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &K) -> Option<&V>;

    fn contains(&self, key: &K) -> bool {
        self.lookup(key).is_some()
    }

    /// All entries, in the mapping's own iteration order.
    fn pairs(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_>;
}

impl<K, V, S> Mapping<K, V> for FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        FrozenMap::len(self)
    }
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
    fn pairs(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
}

impl<K, V, S> Mapping<K, V> for HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
    fn pairs(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
}

impl<K, V, S> Mapping<K, V> for hashbrown::HashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn len(&self) -> usize {
        hashbrown::HashMap::len(self)
    }
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
    fn pairs(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
}

impl<K, V> Mapping<K, V> for BTreeMap<K, V>
where
    K: Ord,
{
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
    fn lookup(&self, key: &K) -> Option<&V> {
        self.get(key)
    }
    fn pairs(&self) -> Box<dyn Iterator<Item = (&K, &V)> + '_> {
        Box::new(self.iter())
    }
}
