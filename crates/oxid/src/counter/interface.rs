use std::sync::Arc;

use crate::{Error, Result};

/// Width of the counter field in bits.
pub const COUNTER_BITS: u32 = 24;

/// Number of distinct counter values, `2^24`.
pub const COUNTER_MODULUS: u32 = 1 << COUNTER_BITS;

/// Largest counter value, `2^24 - 1`. The value after it is `0`.
pub const COUNTER_MAX: u32 = COUNTER_MODULUS - 1;

/// A shared 24-bit counter with atomic increment-and-wrap semantics.
///
/// This is the only mutable state involved in generating identifiers. An
/// implementation owns its value exclusively; callers interact with it only
/// through these two operations, so an in-memory atomic and an externally
/// persisted sequence are interchangeable.
///
/// # Contract
///
/// - [`next_counter`](Self::next_counter) computes `(value + 1) mod 2^24`,
///   stores it and returns it, as one atomic step. Concurrent callers must
///   receive pairwise distinct values; causally ordered calls receive values
///   that increase by exactly one (mod `2^24`) in that order.
/// - After `2^24 - 1` the next value is `0`. Wraparound is not an error.
/// - A store that cannot read or advance its value must return
///   [`Error::CounterStoreUnavailable`]. It must never fall back to a
///   default or cached value.
///
/// # Example
///
/// ```
/// use oxid::counter::{AtomicCounter, CounterStore, COUNTER_MAX};
///
/// let counter = AtomicCounter::new(COUNTER_MAX - 1);
/// assert_eq!(counter.next_counter().unwrap(), COUNTER_MAX);
/// assert_eq!(counter.next_counter().unwrap(), 0);
/// ```
pub trait CounterStore {
    /// Atomically advances the counter and returns the new value.
    ///
    /// # Errors
    ///
    /// [`Error::CounterStoreUnavailable`] if the backing store fails, or
    /// [`Error::LockPoisoned`] for a poisoned std mutex.
    fn next_counter(&self) -> Result<u32>;

    /// Overwrites the stored value. The next call to
    /// [`next_counter`](Self::next_counter) returns `value + 1` (mod `2^24`).
    ///
    /// Meant for initialization and for seeding tests near the wrap boundary.
    ///
    /// # Errors
    ///
    /// [`Error::CounterOutOfRange`] if `value > COUNTER_MAX`, otherwise the
    /// same failures as [`next_counter`](Self::next_counter).
    fn set_counter(&self, value: u32) -> Result<()>;
}

/// Rejects values that do not fit in 24 bits.
///
/// # Errors
///
/// [`Error::CounterOutOfRange`] if `value > COUNTER_MAX`.
pub fn check_counter(value: u32) -> Result<u32> {
    if value > COUNTER_MAX {
        return Err(Error::CounterOutOfRange {
            value: u64::from(value),
        });
    }
    Ok(value)
}

impl<C: CounterStore + ?Sized> CounterStore for &C {
    fn next_counter(&self) -> Result<u32> {
        (**self).next_counter()
    }

    fn set_counter(&self, value: u32) -> Result<()> {
        (**self).set_counter(value)
    }
}

impl<C: CounterStore + ?Sized> CounterStore for Arc<C> {
    fn next_counter(&self) -> Result<u32> {
        (**self).next_counter()
    }

    fn set_counter(&self, value: u32) -> Result<()> {
        (**self).set_counter(value)
    }
}

impl<C: CounterStore + ?Sized> CounterStore for Box<C> {
    fn next_counter(&self) -> Result<u32> {
        (**self).next_counter()
    }

    fn set_counter(&self, value: u32) -> Result<()> {
        (**self).set_counter(value)
    }
}
