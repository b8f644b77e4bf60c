use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Error, Result};

/// A trait for time sources that return the current wall-clock instant.
///
/// This abstraction allows you to plug in the real system clock, a monotonic
/// clock, or a mocked time source in tests.
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime, UNIX_EPOCH};
/// use oxid::time::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn now(&self) -> SystemTime {
///         UNIX_EPOCH + Duration::from_secs(1234)
///     }
/// }
///
/// assert_eq!(FixedTime.now(), UNIX_EPOCH + Duration::from_secs(1234));
/// ```
pub trait TimeSource {
    /// Returns the current instant.
    fn now(&self) -> SystemTime;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

/// Converts an instant to whole unix seconds, truncating any sub-second
/// part.
///
/// # Errors
///
/// [`Error::TimestampOutOfRange`] for instants before the unix epoch or at
/// or beyond `2^32` seconds after it (early 2106).
pub fn unix_seconds(at: SystemTime) -> Result<u32> {
    match at.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => u32::try_from(elapsed.as_secs()).map_err(|_| Error::TimestampOutOfRange {
            secs: i128::from(elapsed.as_secs()),
        }),
        Err(before) => {
            let behind = before.duration();
            // Round toward negative infinity, like the floor of the instant.
            let secs = i128::from(behind.as_secs()) + i128::from(behind.subsec_nanos() > 0);
            Err(Error::TimestampOutOfRange { secs: -secs })
        }
    }
}
