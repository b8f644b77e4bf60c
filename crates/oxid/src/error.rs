use crate::base32::Base32Error;
use thiserror::Error;

/// A result type defaulting to the crate [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `oxid` can produce.
///
/// Decode failures are local to the input and never retryable: the caller
/// must supply a corrected string. [`Error::CounterStoreUnavailable`] is the
/// only transient condition; callers may retry it, but the crate never
/// replaces a failed counter read with a default value.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The text form could not be decoded.
    #[error("invalid xid: {0}")]
    Decode(#[from] Base32Error),

    /// An inspection was asked of a string that is not a valid xid.
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(#[source] Base32Error),

    /// The backing counter could not be read or advanced.
    #[error("counter store unavailable: {reason}")]
    CounterStoreUnavailable {
        /// Description of the underlying failure.
        reason: String,
    },

    /// A counter value outside `[0, 2^24)` was supplied.
    #[error("counter value {value} out of range (max {max})", max = crate::counter::COUNTER_MAX)]
    CounterOutOfRange {
        /// The rejected value.
        value: u64,
    },

    /// The instant cannot be represented as unsigned 32-bit unix seconds.
    #[error("timestamp out of range: {secs}s relative to the unix epoch")]
    TimestampOutOfRange {
        /// Signed seconds relative to the unix epoch.
        secs: i128,
    },

    /// An integer byte array did not have exactly 12 elements.
    #[error("invalid byte array length: expected {expected}, got {len}", expected = crate::id::RAW_LEN)]
    InvalidByteArray {
        /// Number of elements supplied.
        len: usize,
    },

    /// An integer byte array element was outside `0..=255`.
    #[error("byte value {value} at index {index} is out of range 0..=255")]
    ByteOutOfRange {
        /// Position of the element.
        index: usize,
        /// The rejected element.
        value: i64,
    },

    /// An identity override could not be parsed.
    #[error("invalid {key}: {reason}")]
    InvalidConfig {
        /// The configuration key, e.g. `OXID_MACHINE_ID`.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A counter mutex was poisoned by a panicking thread.
    ///
    /// `parking_lot` mutexes do not poison, so this variant only exists with
    /// the `lock` feature on the std mutex.
    #[cfg_attr(docsrs, doc(cfg(all(feature = "lock", not(feature = "parking-lot")))))]
    #[cfg(all(feature = "lock", not(feature = "parking-lot")))]
    #[error("counter lock poisoned")]
    LockPoisoned,
}

#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
use crate::counter::{MutexGuard, PoisonError};
#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
