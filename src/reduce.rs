//! Reduce/reconstruct support and serde integration.
//!
//! A frozen map reduces to its constructor plus the owned entries it was
//! built from. Deserialization takes the same road: entries are collected
//! and handed to [`FrozenMap::from_pairs`], so a restored map is built
//! exactly like a fresh one.

use crate::frozen_map::FrozenMap;
use core::hash::{BuildHasher, Hash};

/// A frozen map taken apart into `(constructor, args)`.
pub struct Reduced<K, V, S> {
    pub constructor: fn(Vec<(K, V)>) -> FrozenMap<K, V, S>,
    pub args: Vec<(K, V)>,
}

impl<K, V, S> Reduced<K, V, S> {
    /// Call the constructor with the stored entries.
    pub fn rebuild(self) -> FrozenMap<K, V, S> {
        (self.constructor)(self.args)
    }
}

fn construct_from_pairs<K, V, S>(pairs: Vec<(K, V)>) -> FrozenMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    FrozenMap::from_pairs(pairs)
}

impl<K, V, S> FrozenMap<K, V, S>
where
    K: Eq + Hash + Clone,
    V: Clone,
    S: BuildHasher + Default,
{
    /// Reduce to a reconstructable form.
    pub fn reduce(&self) -> Reduced<K, V, S> {
        Reduced {
            constructor: construct_from_pairs::<K, V, S>,
            args: self.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::FrozenMap;
    use core::fmt;
    use core::hash::{BuildHasher, Hash};
    use core::marker::PhantomData;
    use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
    use serde::ser::{Serialize, SerializeMap, Serializer};

    impl<K, V, S> Serialize for FrozenMap<K, V, S>
    where
        K: Serialize,
        V: Serialize,
    {
        fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
            let mut map = serializer.serialize_map(Some(self.len()))?;
            for (k, v) in self.iter() {
                map.serialize_entry(k, v)?;
            }
            map.end()
        }
    }

    struct FrozenMapVisitor<K, V, S> {
        _pd: PhantomData<fn() -> FrozenMap<K, V, S>>,
    }

    impl<'de, K, V, S> Visitor<'de> for FrozenMapVisitor<K, V, S>
    where
        K: Deserialize<'de> + Eq + Hash,
        V: Deserialize<'de>,
        S: BuildHasher + Default,
    {
        type Value = FrozenMap<K, V, S>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            // Cap the preallocation; the hint comes from untrusted input.
            let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0).min(4096));
            while let Some((k, v)) = access.next_entry()? {
                pairs.push((k, v));
            }
            Ok(super::construct_from_pairs(pairs))
        }
    }

    impl<'de, K, V, S> Deserialize<'de> for FrozenMap<K, V, S>
    where
        K: Deserialize<'de> + Eq + Hash,
        V: Deserialize<'de>,
        S: BuildHasher + Default,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_map(FrozenMapVisitor { _pd: PhantomData })
        }
    }
}
