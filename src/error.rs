//! Error types for frozen map construction, lookup and hashing.

use thiserror::Error;

/// Content could not be hashed.
///
/// Returned by [`TryHash`](crate::TryHash) implementations when a value is
/// not hashable, and by [`FrozenMap::try_hash`](crate::FrozenMap::try_hash)
/// when any value held by the map is not.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("unhashable type: '{type_name}'")]
pub struct Unhashable {
    type_name: &'static str,
}

impl Unhashable {
    pub const fn new(type_name: &'static str) -> Self {
        Self { type_name }
    }

    /// Name of the type that refused to hash.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Top-level error type for frozen map operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A named entry was supplied under a key that is not a string.
    #[error("invalid keyword argument type: keywords must be strings, not '{found}'")]
    InvalidKeywordType { found: &'static str },

    /// Direct lookup of an absent key.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// Hashing failed on unhashable content.
    #[error(transparent)]
    Unhashable(#[from] Unhashable),
}
