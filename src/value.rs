//! Dynamic values whose hashability is only known at runtime.
//!
//! `Value` mirrors loosely typed content: scalars, strings and tuples hash
//! when their parts do, a `List` never hashes, and a nested `Map` hashes
//! when its own values do.

use crate::error::Unhashable;
use crate::frozen_map::FrozenMap;
use crate::hash::TryHash;
use core::hash::{Hash, Hasher};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Hashable iff every element is.
    Tuple(Vec<Value>),
    /// Mutable sequence; never hashable.
    List(Vec<Value>),
    Map(FrozenMap<String, Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::Tuple(_) => "tuple",
            Value::List(_) => "list",
            Value::Map(_) => "FrozenMap",
        }
    }
}

impl TryHash for Value {
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<(), Unhashable> {
        core::mem::discriminant(self).hash(state);
        match self {
            Value::None => Ok(()),
            Value::Bool(b) => b.try_hash(state),
            Value::Int(i) => i.try_hash(state),
            Value::Float(f) => f.try_hash(state),
            Value::Str(s) => s.try_hash(state),
            Value::Bytes(b) => {
                b.hash(state);
                Ok(())
            }
            Value::Tuple(items) => {
                state.write_usize(items.len());
                for item in items {
                    item.try_hash(state)?;
                }
                Ok(())
            }
            Value::List(_) => Err(Unhashable::new("list")),
            Value::Map(m) => TryHash::try_hash(m, state),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<FrozenMap<String, Value>> for Value {
    fn from(m: FrozenMap<String, Value>) -> Self {
        Value::Map(m)
    }
}
