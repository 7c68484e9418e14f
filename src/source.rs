//! Construction inputs for [`FrozenMap::construct`](crate::FrozenMap::construct).

use crate::error::Error;
use crate::frozen_map::FrozenMap;
use crate::mapping::Mapping;
use crate::value::Value;
use std::collections::hash_map::RandomState;

/// The positional source of a frozen map.
pub enum Source<'a, K, V, S = RandomState> {
    /// No positional source.
    Empty,
    /// An existing frozen map; reused as is when no named entries follow.
    Frozen(FrozenMap<K, V, S>),
    /// Any mapping; its entries are cloned in.
    Mapping(&'a dyn Mapping<K, V>),
    /// An owned sequence of `(key, value)` pairs.
    Pairs(Vec<(K, V)>),
}

impl<'a, K, V, S> From<FrozenMap<K, V, S>> for Source<'a, K, V, S> {
    fn from(map: FrozenMap<K, V, S>) -> Self {
        Source::Frozen(map)
    }
}

impl<'a, K, V, S> From<Vec<(K, V)>> for Source<'a, K, V, S> {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Source::Pairs(pairs)
    }
}

/// A name usable for a named entry.
///
/// String-like names convert; anything else is rejected with
/// [`Error::InvalidKeywordType`].
pub trait KeywordName {
    fn into_keyword(self) -> Result<String, Error>;
}

impl KeywordName for String {
    fn into_keyword(self) -> Result<String, Error> {
        Ok(self)
    }
}

impl KeywordName for &str {
    fn into_keyword(self) -> Result<String, Error> {
        Ok(self.to_owned())
    }
}

impl KeywordName for Value {
    fn into_keyword(self) -> Result<String, Error> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(Error::InvalidKeywordType {
                found: other.type_name(),
            }),
        }
    }
}

macro_rules! reject_keyword {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl KeywordName for $t {
                fn into_keyword(self) -> Result<String, Error> {
                    Err(Error::InvalidKeywordType { found: $name })
                }
            }
        )*
    };
}

reject_keyword!(
    i32 => "int",
    i64 => "int",
    u32 => "int",
    u64 => "int",
    usize => "int",
    bool => "bool",
    char => "char",
    f64 => "float",
);

/// Named entries keyed by strings, applied after the positional source.
#[derive(Clone, Debug, PartialEq)]
pub struct Kwargs<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for Kwargs<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Kwargs<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add one named entry.
    pub fn with(mut self, name: impl Into<String>, value: V) -> Self {
        self.entries.push((name.into(), value));
        self
    }

    /// Collect named entries from a loosely typed source.
    ///
    /// Fails on the first name that is not a string.
    pub fn try_from_entries<Q, I>(entries: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (Q, V)>,
        Q: KeywordName,
    {
        let entries = entries
            .into_iter()
            .map(|(name, value)| Ok((name.into_keyword()?, value)))
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}
