//! Budgeted, allocate-once memory for the core's arrays.
//!
//! Mirrors the data tightly-coupled memory of the target processing element:
//! a fixed number of bytes handed out during initialization and never
//! returned. Every allocation is charged against the budget before the heap
//! is touched.

use crate::error::{ArrayKind, CoreError, CoreResult};

/// Data memory of 64 KiB, the per-core budget of the reference hardware.
pub const DEFAULT_DTCM_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct Dtcm {
    capacity: usize,
    used: usize,
}

impl Dtcm {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, used: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn available(&self) -> usize {
        self.capacity - self.used
    }

    /// Charges `bytes` against the budget.
    pub fn reserve(&mut self, what: ArrayKind, bytes: usize) -> CoreResult<()> {
        if bytes > self.available() {
            log::error!("Unable to allocate {} - Out of DTCM", what);
            return Err(CoreError::OutOfMemory {
                array: what,
                requested_bytes: bytes,
                available_bytes: self.available(),
            });
        }

        self.used += bytes;
        Ok(())
    }

    /// Allocates `count` records of `record_bytes` each, filled with `init`.
    ///
    /// A zero `record_bytes` is a record kind that carries no state: nothing
    /// is charged and the call cannot fail.
    pub fn allocate<T: Clone>(
        &mut self,
        what: ArrayKind,
        count: usize,
        record_bytes: usize,
        init: T,
    ) -> CoreResult<Vec<T>> {
        self.allocate_with_header(what, 0, count, record_bytes, init)
    }

    /// As [`Dtcm::allocate`], with `header_bytes` charged in the same
    /// reservation so a failure reports the whole block.
    pub fn allocate_with_header<T: Clone>(
        &mut self,
        what: ArrayKind,
        header_bytes: usize,
        count: usize,
        record_bytes: usize,
        init: T,
    ) -> CoreResult<Vec<T>> {
        if header_bytes == 0 && record_bytes == 0 {
            return Ok(vec![init; count]);
        }

        let requested_bytes = record_bytes
            .checked_mul(count)
            .and_then(|bytes| bytes.checked_add(header_bytes))
            .ok_or(CoreError::OutOfMemory {
                array: what,
                requested_bytes: usize::MAX,
                available_bytes: self.available(),
            })?;

        self.reserve(what, requested_bytes)?;

        let mut records = Vec::new();
        if records.try_reserve_exact(count).is_err() {
            self.used -= requested_bytes;
            log::error!("Unable to allocate {} - heap exhausted", what);
            return Err(CoreError::OutOfMemory {
                array: what,
                requested_bytes,
                available_bytes: self.available(),
            });
        }

        records.resize(count, init);
        Ok(records)
    }
}

impl Default for Dtcm {
    fn default() -> Self {
        Self::new(DEFAULT_DTCM_BYTES)
    }
}
