//! Every heap allocation made while decoding untrusted input goes through an
//! [`AllocGate`]. The gate can refuse any single allocation, which lets tests
//! force a failure at each allocation site in turn and check that the caller
//! gets [`ErrorKind::OutOfMemory`](crate::error::ErrorKind::OutOfMemory) with
//! nothing half built. Memory is then reserved with `try_reserve` so a real
//! exhaustion surfaces the same way instead of aborting.

use std::cell::Cell;

use crate::error::{Error, Result};

pub trait AllocGate {
    /// Returns false to refuse an allocation of `bytes` bytes.
    fn admit(&self, bytes: usize) -> bool;
}

/// Admits every allocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unlimited;

impl AllocGate for Unlimited {
    fn admit(&self, _bytes: usize) -> bool {
        true
    }
}

/// Counts allocation requests and refuses exactly the nth one (1-based).
#[derive(Debug, Default)]
pub struct FailingGate {
    fail_at: Option<usize>,
    seen: Cell<usize>,
}

impl FailingGate {
    /// A gate that never refuses, only counts.
    pub fn counting() -> Self {
        Self::default()
    }

    pub fn fail_at(nth: usize) -> Self {
        Self {
            fail_at: Some(nth),
            seen: Cell::new(0),
        }
    }

    /// Number of allocation requests seen so far.
    pub fn seen(&self) -> usize {
        self.seen.get()
    }
}

impl AllocGate for FailingGate {
    fn admit(&self, _bytes: usize) -> bool {
        let nth = self.seen.get() + 1;
        self.seen.set(nth);
        self.fail_at != Some(nth)
    }
}

/// Make room for `additional` more elements in `vec`.
///
/// Does not consult the gate when no allocation is needed.
pub fn try_reserve<T>(gate: &dyn AllocGate, vec: &mut Vec<T>, additional: usize) -> Result<()> {
    if vec.capacity() - vec.len() >= additional {
        return Ok(());
    }
    if !gate.admit(additional.saturating_mul(std::mem::size_of::<T>())) {
        return Err(Error::out_of_memory());
    }
    vec.try_reserve_exact(additional)?;
    Ok(())
}

pub fn try_vec<T>(gate: &dyn AllocGate, capacity: usize) -> Result<Vec<T>> {
    let mut vec = Vec::new();
    try_reserve(gate, &mut vec, capacity)?;
    Ok(vec)
}

/// Owned copy of `bytes`. An empty slice copies without allocating.
pub fn try_copy(gate: &dyn AllocGate, bytes: &[u8]) -> Result<Vec<u8>> {
    let mut vec = try_vec(gate, bytes.len())?;
    vec.extend_from_slice(bytes);
    Ok(vec)
}

pub fn try_string(gate: &dyn AllocGate, capacity: usize) -> Result<String> {
    let mut string = String::new();
    if capacity > 0 {
        if !gate.admit(capacity) {
            return Err(Error::out_of_memory());
        }
        string.try_reserve_exact(capacity)?;
    }
    Ok(string)
}
