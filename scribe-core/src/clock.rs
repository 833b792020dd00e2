//! Clock - Timestamp Source
//!
//! TigerStyle: backends never read the wall clock directly. Every
//! `created_at`/`updated_at` comes from an injected [`Clock`], so tests
//! control time explicitly.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use crate::constants::{CLOCK_ADVANCE_MS_MAX, TIME_MS_PER_SEC};

/// Source of timestamps for post records.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A simulated clock for deterministic testing.
///
/// TigerStyle:
/// - Time only moves forward
/// - All time operations are explicit
/// - No reliance on system time
#[derive(Debug, Default)]
pub struct SimClock {
    /// Current time in milliseconds since epoch
    current_ms: AtomicU64,
}

impl SimClock {
    /// Create a new clock starting at time zero.
    ///
    /// # Example
    /// ```
    /// use scribe_core::SimClock;
    /// let clock = SimClock::new();
    /// assert_eq!(clock.now_ms(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::at_ms(0)
    }

    /// Create a clock starting at the given time.
    #[must_use]
    pub fn at_ms(start_ms: u64) -> Self {
        Self {
            current_ms: AtomicU64::new(start_ms),
        }
    }

    /// Get current time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.current_ms.load(Ordering::SeqCst)
    }

    /// Advance time by the given milliseconds.
    ///
    /// # Panics
    /// Panics if ms exceeds `CLOCK_ADVANCE_MS_MAX`.
    ///
    /// # Returns
    /// The new current time.
    pub fn advance_ms(&self, ms: u64) -> u64 {
        // Precondition
        assert!(
            ms <= CLOCK_ADVANCE_MS_MAX,
            "advance_ms({ms}) exceeds max ({CLOCK_ADVANCE_MS_MAX})"
        );

        let old_time = self.current_ms.fetch_add(ms, Ordering::SeqCst);
        let new_time = old_time.saturating_add(ms);

        // Postcondition
        assert!(new_time >= old_time, "time must not go backwards");

        new_time
    }

    /// Advance time by the given seconds.
    pub fn advance_secs(&self, secs: u64) -> u64 {
        self.advance_ms(secs.saturating_mul(TIME_MS_PER_SEC))
    }
}

impl Clock for SimClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = i64::try_from(self.now_ms()).unwrap_or(i64::MAX);
        Utc.timestamp_millis_opt(ms)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_clock_starts_at_given_time() {
        let clock = SimClock::at_ms(5_000);
        assert_eq!(clock.now_ms(), 5_000);
        assert_eq!(clock.now().timestamp(), 5);
    }

    #[test]
    fn test_sim_clock_advance() {
        let clock = SimClock::new();
        assert_eq!(clock.advance_ms(250), 250);
        assert_eq!(clock.advance_secs(2), 2_250);
        assert_eq!(clock.now().timestamp_millis(), 2_250);
    }

    #[test]
    #[should_panic(expected = "exceeds max")]
    fn test_sim_clock_advance_too_far() {
        let clock = SimClock::new();
        clock.advance_ms(CLOCK_ADVANCE_MS_MAX + 1);
    }
}
