//! Fallible, content-dependent hashing.
//!
//! `TryHash` is the runtime counterpart of `Hash`: a value may refuse to
//! hash depending on what it holds. Frozen maps use it for their values so
//! that hashability is a property of content rather than of the type.
//!
//! Container digests are built from per-entry digests taken with a
//! fixed-key hasher, so two equal maps hash equal regardless of the
//! `BuildHasher` each one uses for lookups.

use crate::error::Unhashable;
use core::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;
use std::rc::Rc;
use std::sync::Arc;

/// Hashing that may fail at runtime.
pub trait TryHash {
    /// Feed this value into `state`, or report that it cannot be hashed.
    ///
    /// On error the hasher state is unspecified and must be discarded.
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable>;
}

macro_rules! try_hash_via_hash {
    ($($t:ty),* $(,)?) => {
        $(
            impl TryHash for $t {
                #[inline]
                fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                    Hash::hash(self, state);
                    Ok(())
                }
            }
        )*
    };
}

try_hash_via_hash!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    str,
    String,
);

macro_rules! try_hash_float {
    ($($t:ty),*) => {
        $(
            impl TryHash for $t {
                #[inline]
                fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
                    // -0.0 == 0.0, so both must feed the same bits.
                    let v = if *self == 0.0 { 0.0 } else { *self };
                    v.to_bits().hash(state);
                    Ok(())
                }
            }
        )*
    };
}

try_hash_float!(f32, f64);

impl<T: TryHash + ?Sized> TryHash for &T {
    #[inline]
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        (**self).try_hash(state)
    }
}

impl<T: TryHash + ?Sized> TryHash for Box<T> {
    #[inline]
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        (**self).try_hash(state)
    }
}

impl<T: TryHash + ?Sized> TryHash for Rc<T> {
    #[inline]
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        (**self).try_hash(state)
    }
}

impl<T: TryHash + ?Sized> TryHash for Arc<T> {
    #[inline]
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        (**self).try_hash(state)
    }
}

impl<T: TryHash> TryHash for Option<T> {
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        match self {
            None => {
                state.write_u8(0);
                Ok(())
            }
            Some(v) => {
                state.write_u8(1);
                v.try_hash(state)
            }
        }
    }
}

macro_rules! try_hash_tuple {
    ($($name:ident)+) => {
        impl<$($name: TryHash),+> TryHash for ($($name,)+) {
            #[allow(non_snake_case)]
            fn try_hash<HH: Hasher>(&self, state: &mut HH) -> Result<(), Unhashable> {
                let ($($name,)+) = self;
                $($name.try_hash(state)?;)+
                Ok(())
            }
        }
    };
}

try_hash_tuple!(A);
try_hash_tuple!(A B);
try_hash_tuple!(A B C);
try_hash_tuple!(A B C D);
try_hash_tuple!(A B C D E);
try_hash_tuple!(A B C D E F);

/// Digest of a hashable value under the fixed-key hasher.
#[inline]
pub(crate) fn digest_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut h = DefaultHasher::new();
    value.hash(&mut h);
    h.finish()
}

/// Digest of a possibly-unhashable value under the fixed-key hasher.
#[inline]
pub(crate) fn try_digest_of<T: TryHash + ?Sized>(value: &T) -> Result<u64, Unhashable> {
    let mut h = DefaultHasher::new();
    value.try_hash(&mut h)?;
    Ok(h.finish())
}

const KEY_MUL: u64 = 0x9e37_79b9_7f4a_7c15;
const VALUE_MUL: u64 = 0xc2b2_ae3d_27d4_eb4f;
const LEN_MUL: u64 = 0x1656_67b1_9e37_79f9;

/// 64-bit finalizer from MurmurHash3.
#[inline]
const fn fmix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// Mix one entry's key and value digests.
///
/// Not symmetric: `mix_pair(a, b) != mix_pair(b, a)` in general, and the
/// result is not linear in either input, so moving a value to another key
/// changes the sum of mixed pairs.
#[inline]
pub(crate) const fn mix_pair(key: u64, value: u64) -> u64 {
    fmix64(key.wrapping_mul(KEY_MUL) ^ value.rotate_left(29).wrapping_mul(VALUE_MUL))
}

/// Order-independent accumulator over mixed entry digests.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Combiner {
    acc: u64,
    len: u64,
}

impl Combiner {
    #[inline]
    pub(crate) fn add(&mut self, key: u64, value: u64) {
        self.acc = self.acc.wrapping_add(mix_pair(key, value));
        self.len += 1;
    }

    #[inline]
    pub(crate) fn finish(self) -> u64 {
        fmix64(self.acc ^ self.len.wrapping_mul(LEN_MUL))
    }
}
