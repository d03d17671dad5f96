//! Exposure countdown timer.
//!
//! Shared by the simple-cycle runner and the custom-program runner: a start
//! timestamp plus a configured duration, queried each tick for the remaining
//! time.  Integer milliseconds throughout — the sec:ms unit produces
//! sub-second durations that must not round away.

/// Countdown over a fixed exposure window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposureTimer {
    start_ms: u64,
    duration_ms: u64,
}

impl ExposureTimer {
    /// Start a countdown of `duration_ms` at `now_ms`.
    pub fn start(now_ms: u64, duration_ms: u64) -> Self {
        Self {
            start_ms: now_ms,
            duration_ms,
        }
    }

    /// Configured window length.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Milliseconds left, saturating at zero.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.start_ms);
        self.duration_ms.saturating_sub(elapsed)
    }

    /// Whole seconds left, rounded up so the display never shows 00:00
    /// while output is still on.
    pub fn remaining_secs(&self, now_ms: u64) -> u64 {
        self.remaining_ms(now_ms).div_ceil(1000)
    }

    /// True once the window has fully elapsed.
    pub fn expired(&self, now_ms: u64) -> bool {
        self.remaining_ms(now_ms) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_from_duration() {
        let t = ExposureTimer::start(1_000, 300_000);
        assert_eq!(t.remaining_ms(1_000), 300_000);
        assert_eq!(t.remaining_ms(151_000), 150_000);
        assert!(!t.expired(300_999));
        assert!(t.expired(301_000));
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let t = ExposureTimer::start(0, 500);
        assert_eq!(t.remaining_ms(10_000), 0);
        assert!(t.expired(10_000));
    }

    #[test]
    fn clock_before_start_is_full_window() {
        // A start timestamp in the "future" (timer handed a stale now) must
        // not underflow.
        let t = ExposureTimer::start(5_000, 1_000);
        assert_eq!(t.remaining_ms(4_000), 1_000);
    }

    #[test]
    fn remaining_secs_rounds_up() {
        let t = ExposureTimer::start(0, 2_500);
        assert_eq!(t.remaining_secs(0), 3);
        assert_eq!(t.remaining_secs(2_000), 1);
        assert_eq!(t.remaining_secs(2_500), 0);
    }

    #[test]
    fn sub_second_window_expires() {
        let t = ExposureTimer::start(100, 500);
        assert!(!t.expired(599));
        assert!(t.expired(600));
    }
}
