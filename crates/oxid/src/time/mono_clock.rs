use std::time::{Instant, SystemTime};

use crate::time::TimeSource;

/// A wall-clock aligned time source that never goes backwards.
///
/// At construction the clock captures `SystemTime::now()` and
/// `Instant::now()` together; afterwards it reports the captured wall time
/// plus the monotonic time elapsed since. NTP steps or manual clock changes
/// after construction therefore do not move timestamps backwards.
///
/// Clones share the same anchor.
///
/// # Example
///
/// ```
/// use oxid::time::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::default();
/// let a = clock.now();
/// let b = clock.now();
/// assert!(a <= b);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    wall_anchor: SystemTime,
    mono_anchor: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Anchors a new clock to the current wall time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_anchor(SystemTime::now())
    }

    /// Anchors a new clock so that "now" reads as `wall_anchor`.
    #[must_use]
    pub fn with_anchor(wall_anchor: SystemTime) -> Self {
        Self {
            wall_anchor,
            mono_anchor: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicClock {
    fn now(&self) -> SystemTime {
        self.wall_anchor + self.mono_anchor.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn starts_at_anchor() {
        let anchor = UNIX_EPOCH + Duration::from_secs(1_000_000);
        let clock = MonotonicClock::with_anchor(anchor);
        let now = clock.now();
        assert!(now >= anchor);
        assert!(now < anchor + Duration::from_secs(5));
    }

    #[test]
    fn never_goes_backwards() {
        let clock = MonotonicClock::new();
        let mut last = clock.now();
        for _ in 0..10_000 {
            let now = clock.now();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_with_elapsed_time() {
        let clock = MonotonicClock::new();
        let before = clock.now();
        std::thread::sleep(Duration::from_millis(20));
        let after = clock.now();
        assert!(after.duration_since(before).unwrap() >= Duration::from_millis(20));
    }
}
