use std::time::SystemTime;

use crate::time::TimeSource;

/// Reads [`SystemTime::now`] on every call.
///
/// Follows the host clock exactly, including any step adjustments. Use
/// [`MonotonicClock`](crate::time::MonotonicClock) when timestamps must never
/// go backwards within a process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
