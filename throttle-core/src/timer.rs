//! Drift-free periodic rate limiter for cooperative tasks.

/// A `{last_due, period}` pair that lets a task run at most once per period.
///
/// Time is a free-running `u32` millisecond counter. All comparisons use
/// wrapping arithmetic, so the timer keeps working when the counter rolls
/// over after ~49.7 days.
///
/// When a run is due, the due time advances by exactly one period instead
/// of snapping to "now". Late polls therefore do not push the schedule back,
/// and a loop that stalled for several periods catches up with back-to-back
/// runs on the following polls.
///
/// # Example
///
/// ```
/// use throttle_core::PeriodicTimer;
///
/// let mut timer = PeriodicTimer::new(5);
/// assert!(!timer.poll(4));
/// assert!(timer.poll(6));
/// // Next run is due at 10, not at 11.
/// assert!(timer.poll(10));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeriodicTimer {
    last_due_ms: u32,
    period_ms: u32,
}

impl PeriodicTimer {
    /// Create a timer whose schedule is anchored at time zero.
    #[must_use]
    pub const fn new(period_ms: u32) -> Self {
        Self::starting_at(0, period_ms)
    }

    /// Create a timer whose first run is due one period after `now_ms`.
    #[must_use]
    pub const fn starting_at(now_ms: u32, period_ms: u32) -> Self {
        Self {
            last_due_ms: now_ms,
            period_ms,
        }
    }

    /// Check whether a run is due and, if so, consume it.
    ///
    /// Returns `true` at most once per elapsed period.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if !self.is_due(now_ms) {
            return false;
        }
        self.last_due_ms = self.last_due_ms.wrapping_add(self.period_ms);
        true
    }

    /// Check whether a run is due without consuming it.
    #[inline]
    #[must_use]
    pub fn is_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_due_ms) >= self.period_ms
    }

    /// Change the period, keeping the current anchor.
    ///
    /// The next run becomes due `period_ms` after the last one.
    #[inline]
    pub fn set_period(&mut self, period_ms: u32) {
        self.period_ms = period_ms;
    }

    /// The configured period in milliseconds.
    #[inline]
    #[must_use]
    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// The time the most recent run was due.
    #[inline]
    #[must_use]
    pub const fn last_due_ms(&self) -> u32 {
        self.last_due_ms
    }
}
