use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result,
    counter::{COUNTER_MAX, CounterStore, Mutex, check_counter},
};

/// A mutex-protected [`CounterStore`].
///
/// Clones share the same value, so one `LockCounter` can be handed to many
/// generators.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access across threads (with `parking-lot`)
///
/// ## Recommended When
/// - Your target doesn't support 32-bit atomics
/// - Fair access across threads is important
///
/// ## See Also
/// - [`AtomicCounter`]
///
/// [`AtomicCounter`]: crate::counter::AtomicCounter
#[derive(Clone, Debug)]
pub struct LockCounter {
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<u32>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<u32>>,
}

impl LockCounter {
    /// Creates a counter holding the low 24 bits of `seed`.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(seed & COUNTER_MAX).into()),
        }
    }

    /// Creates a counter seeded from the thread-local RNG.
    #[must_use]
    pub fn random() -> Self {
        Self::new(rand::random::<u32>())
    }
}

impl Default for LockCounter {
    fn default() -> Self {
        Self::random()
    }
}

impl CounterStore for LockCounter {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn next_counter(&self) -> Result<u32> {
        #[cfg(feature = "parking-lot")]
        let mut value = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut value = self.state.lock()?;

        *value = (*value + 1) & COUNTER_MAX;
        Ok(*value)
    }

    fn set_counter(&self, value: u32) -> Result<()> {
        let value = check_counter(value)?;

        #[cfg(feature = "parking-lot")]
        let mut state = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut state = self.state.lock()?;

        *state = value;
        Ok(())
    }
}
