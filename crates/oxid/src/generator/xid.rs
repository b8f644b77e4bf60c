use std::time::SystemTime;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result,
    counter::{AtomicCounter, CounterStore},
    id::Xid,
    identity::IdentityContext,
    time::{SystemClock, TimeSource, unix_seconds},
};

/// Generates [`Xid`]s from a timestamp, an injected [`IdentityContext`] and
/// the next value of a [`CounterStore`].
///
/// The generator holds no mutable state of its own; all uniqueness comes
/// from the counter store, so it is `Send + Sync` whenever `C` and `T` are
/// and can be shared freely between threads.
///
/// ## Guarantees
/// - Each successful call draws exactly one counter value, and the counter
///   field of the result equals it.
/// - Counter store failures are returned as-is; no identifier is produced
///   with a guessed counter.
///
/// ## See Also
/// - [`AtomicCounter`]
/// - [`crate::counter::LockCounter`]
#[derive(Clone, Debug)]
pub struct XidGenerator<C, T = SystemClock>
where
    C: CounterStore,
    T: TimeSource,
{
    identity: IdentityContext,
    counter: C,
    time: T,
}

/// A generator over an in-memory atomic counter and the system clock.
pub type DefaultXidGenerator = XidGenerator<AtomicCounter, SystemClock>;

impl<C, T> XidGenerator<C, T>
where
    C: CounterStore,
    T: TimeSource,
{
    /// Creates a generator from its three collaborators.
    ///
    /// # Example
    ///
    /// ```
    /// use oxid::{
    ///     counter::AtomicCounter,
    ///     generator::XidGenerator,
    ///     identity::IdentityContext,
    ///     time::SystemClock,
    /// };
    ///
    /// let identity = IdentityContext::new([0xaa, 0xbb, 0xcc], 42);
    /// let generator = XidGenerator::new(identity, AtomicCounter::new(0), SystemClock);
    ///
    /// let id = generator.next_xid(None).unwrap();
    /// assert_eq!(id.machine(), [0xaa, 0xbb, 0xcc]);
    /// assert_eq!(id.pid(), 42);
    /// assert_eq!(id.counter(), 1);
    /// ```
    pub const fn new(identity: IdentityContext, counter: C, time: T) -> Self {
        Self {
            identity,
            counter,
            time,
        }
    }

    /// Builds the next identifier.
    ///
    /// With `at = None` the time source is read; otherwise `at` is used
    /// verbatim, which lets callers backfill identifiers for past or future
    /// instants. Both are truncated to whole seconds.
    ///
    /// The timestamp is validated before the counter is touched, so a
    /// rejected instant consumes no counter value.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampOutOfRange`] if the instant is before the unix
    ///   epoch or does not fit in 32 bits of seconds.
    /// - Any error from [`CounterStore::next_counter`], notably
    ///   [`Error::CounterStoreUnavailable`].
    ///
    /// [`Error::TimestampOutOfRange`]: crate::Error::TimestampOutOfRange
    /// [`Error::CounterStoreUnavailable`]: crate::Error::CounterStoreUnavailable
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_xid(&self, at: Option<SystemTime>) -> Result<Xid> {
        let timestamp = unix_seconds(at.unwrap_or_else(|| self.time.now()))?;
        let counter = self.counter.next_counter()?;
        Ok(Xid::from_components(
            timestamp,
            self.identity.machine(),
            self.identity.pid(),
            counter,
        ))
    }

    /// Builds the next identifier and returns its text form.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next_xid`].
    pub fn generate(&self, at: Option<SystemTime>) -> Result<String> {
        self.next_xid(at).map(|id| id.encode())
    }

    /// The identity embedded in every identifier from this generator.
    pub const fn identity(&self) -> &IdentityContext {
        &self.identity
    }

    /// The backing counter store, e.g. to seed it with
    /// [`CounterStore::set_counter`].
    pub const fn counter(&self) -> &C {
        &self.counter
    }
}

impl DefaultXidGenerator {
    /// Detects the process identity and seeds a random in-memory counter.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfig`](crate::Error::InvalidConfig) if an identity
    /// override in the environment is malformed.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            IdentityContext::from_env()?,
            AtomicCounter::random(),
            SystemClock,
        ))
    }
}
