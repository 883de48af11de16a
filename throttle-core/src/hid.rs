//! HID sampling task: read the axis, condition it, emit a report.

use crate::conditioner::Conditioned;
use crate::input::{AxisInput, InputError};
use crate::output::ReportSink;
use crate::report::{emit_report, Emission};
use crate::timer::PeriodicTimer;

/// Sampling and report period.
pub const HID_TASK_PERIOD_MS: u32 = 5;

/// What a due HID tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidOutcome {
    /// A sample was taken and handed to the emitter.
    Sampled {
        value: Conditioned,
        emission: Emission,
    },
    /// The ADC produced no sample; nothing was emitted this tick.
    NoSample(InputError),
}

/// Periodic sample -> condition -> emit task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HidTask {
    timer: PeriodicTimer,
}

impl HidTask {
    /// Create the task with the default 5 ms period.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_period(HID_TASK_PERIOD_MS)
    }

    /// Create the task with a custom period.
    #[must_use]
    pub const fn with_period(period_ms: u32) -> Self {
        Self {
            timer: PeriodicTimer::new(period_ms),
        }
    }

    /// Create the task with the default period, first due 5 ms after `now_ms`.
    #[must_use]
    pub const fn starting_at(now_ms: u32) -> Self {
        Self {
            timer: PeriodicTimer::starting_at(now_ms, HID_TASK_PERIOD_MS),
        }
    }

    /// The task's rate limiter.
    #[inline]
    #[must_use]
    pub const fn timer(&self) -> &PeriodicTimer {
        &self.timer
    }

    /// Run one tick if due.
    ///
    /// Returns `None` when not due. When due, exactly one sample is read
    /// and at most one send is attempted.
    pub fn poll<A, S>(&mut self, now_ms: u32, input: &mut A, sink: &mut S) -> Option<HidOutcome>
    where
        A: AxisInput,
        S: ReportSink,
    {
        if !self.timer.poll(now_ms) {
            return None;
        }

        let raw = match input.try_read() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("ADC read failed: {:?}", e);
                return Some(HidOutcome::NoSample(e));
            }
        };

        let value = Conditioned::from_raw(raw);
        trace!(
            "ADC raw: {}, clamped: {}, scaled: {}",
            value.raw,
            value.clamped,
            value.scaled
        );

        let emission = emit_report(sink, value.scaled);
        Some(HidOutcome::Sampled { value, emission })
    }
}

impl Default for HidTask {
    fn default() -> Self {
        Self::new()
    }
}
