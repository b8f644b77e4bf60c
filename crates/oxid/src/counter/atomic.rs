use portable_atomic::{AtomicU32, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result,
    counter::{COUNTER_MAX, CounterStore, check_counter},
};

/// A lock-free, in-memory [`CounterStore`].
///
/// The value lives in an [`AtomicU32`] advanced with a single `fetch_add`.
/// Because `2^32` is a multiple of `2^24`, masking the post-increment value
/// gives exactly `(value + 1) mod 2^24`, and no two callers can observe the
/// same pre-increment value.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Never blocks, never fails
///
/// ## Recommended When
/// - Generating in a single process with no external sequence
/// - You want the lowest possible latency under contention
///
/// ## See Also
/// - [`LockCounter`]
///
/// [`LockCounter`]: crate::counter::LockCounter
#[derive(Debug)]
pub struct AtomicCounter {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU32>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU32,
}

impl AtomicCounter {
    /// Creates a counter holding `seed`. The first
    /// [`next_counter`](CounterStore::next_counter) returns `seed + 1`
    /// (mod `2^24`).
    ///
    /// Only the low 24 bits of `seed` are kept.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            state: AtomicU32::new(seed & COUNTER_MAX).into(),
        }
    }

    /// Creates a counter seeded from the thread-local RNG, so restarts of the
    /// same process do not replay the same counter values.
    #[must_use]
    pub fn random() -> Self {
        Self::new(rand::random::<u32>())
    }

    /// The value most recently issued (or seeded).
    #[must_use]
    pub fn current(&self) -> u32 {
        self.state.load(Ordering::Relaxed) & COUNTER_MAX
    }
}

impl Default for AtomicCounter {
    fn default() -> Self {
        Self::random()
    }
}

impl CounterStore for AtomicCounter {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn next_counter(&self) -> Result<u32> {
        let prev = self.state.fetch_add(1, Ordering::Relaxed);
        let next = prev.wrapping_add(1) & COUNTER_MAX;
        #[cfg(feature = "tracing")]
        if next == 0 {
            tracing::debug!("counter wrapped around");
        }
        Ok(next)
    }

    fn set_counter(&self, value: u32) -> Result<()> {
        self.state.store(check_counter(value)?, Ordering::Relaxed);
        Ok(())
    }
}
