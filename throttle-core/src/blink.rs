//! Status LED blinking at a connection-dependent interval.

use crate::output::StatusLed;
use crate::timer::PeriodicTimer;

/// How often the status LED toggles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkInterval {
    /// LED is left in its current state.
    Disabled,
    /// Toggle every `n` milliseconds.
    Millis(u32),
}

impl BlinkInterval {
    /// The interval in milliseconds, or `None` when disabled.
    ///
    /// `Millis(0)` counts as disabled.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> Option<u32> {
        match self {
            BlinkInterval::Millis(ms) if ms > 0 => Some(ms),
            _ => None,
        }
    }
}

/// LED blink task state.
///
/// The interval is written by the connection state machine; the toggle is
/// performed by [`BlinkTask::poll`] from the main loop. Toggle times follow a
/// [`PeriodicTimer`], so they stay on a fixed grid even when polls are late.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkTask {
    interval: BlinkInterval,
    timer: PeriodicTimer,
    led_on: bool,
}

impl BlinkTask {
    /// Create a blink task with the LED off and the schedule anchored at zero.
    #[must_use]
    pub const fn new(interval: BlinkInterval) -> Self {
        Self::starting_at(0, interval)
    }

    /// Create a blink task with the LED off and the schedule anchored at `now_ms`.
    #[must_use]
    pub const fn starting_at(now_ms: u32, interval: BlinkInterval) -> Self {
        let period_ms = match interval.as_millis() {
            Some(ms) => ms,
            None => 0,
        };
        Self {
            interval,
            timer: PeriodicTimer::starting_at(now_ms, period_ms),
            led_on: false,
        }
    }

    /// Change the blink interval.
    ///
    /// The last toggle time is kept; the next toggle is due one new interval
    /// after it.
    pub fn set_interval(&mut self, interval: BlinkInterval) {
        self.interval = interval;
        if let Some(ms) = interval.as_millis() {
            self.timer.set_period(ms);
        }
    }

    /// Current blink interval.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> BlinkInterval {
        self.interval
    }

    /// Logical LED state after the most recent toggle.
    #[inline]
    #[must_use]
    pub const fn led_on(&self) -> bool {
        self.led_on
    }

    /// Time of the most recent toggle (on the schedule grid).
    #[inline]
    #[must_use]
    pub const fn last_toggle_ms(&self) -> u32 {
        self.timer.last_due_ms()
    }

    /// Toggle the LED if an interval has elapsed since the last toggle.
    ///
    /// Returns the new LED state when a toggle happened.
    pub fn poll<L: StatusLed>(&mut self, now_ms: u32, led: &mut L) -> Option<bool> {
        self.interval.as_millis()?;

        if !self.timer.poll(now_ms) {
            return None;
        }

        self.led_on = !self.led_on;
        led.set(self.led_on);
        Some(self.led_on)
    }
}
