//! Single-assignment cache for a container's content hash.
//!
//! The cell starts `Unset` and moves exactly once to a terminal state:
//! either the computed digest or a permanent `Unhashable` marker. Racing
//! first callers block on the same initialization; the computation runs
//! at most once per cell.

use crate::error::Unhashable;
use std::sync::OnceLock;

/// Observable state of a frozen map's hash cache.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HashState {
    /// `hash()` has not been requested yet.
    Unset,
    /// Digest computed and cached.
    Computed(u64),
    /// Some value refused to hash; every later call fails the same way.
    Unhashable(Unhashable),
}

#[derive(Debug, Default)]
pub(crate) struct HashCell {
    slot: OnceLock<Result<u64, Unhashable>>,
}

impl HashCell {
    pub(crate) const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Return the cached result, running `compute` only if nothing is cached.
    #[inline]
    pub(crate) fn get_or_compute<F>(&self, compute: F) -> Result<u64, Unhashable>
    where
        F: FnOnce() -> Result<u64, Unhashable>,
    {
        *self.slot.get_or_init(compute)
    }

    pub(crate) fn state(&self) -> HashState {
        match self.slot.get() {
            None => HashState::Unset,
            Some(Ok(h)) => HashState::Computed(*h),
            Some(Err(e)) => HashState::Unhashable(*e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn computes_once_then_caches() {
        let cell = HashCell::new();
        let calls = Cell::new(0);
        assert_eq!(cell.state(), HashState::Unset);

        let compute = || {
            calls.set(calls.get() + 1);
            Ok(42)
        };
        assert_eq!(cell.get_or_compute(compute), Ok(42));
        assert_eq!(cell.get_or_compute(|| Ok(7)), Ok(42));
        assert_eq!(calls.get(), 1);
        assert_eq!(cell.state(), HashState::Computed(42));
    }

    #[test]
    fn failure_is_terminal() {
        let cell = HashCell::new();
        let err = Unhashable::new("list");
        assert_eq!(cell.get_or_compute(|| Err(err)), Err(err));
        // A later successful computation must not replace the marker.
        assert_eq!(cell.get_or_compute(|| Ok(1)), Err(err));
        assert_eq!(cell.state(), HashState::Unhashable(err));
    }
}
