//! Clock and status LED adapters.

use embassy_time::Instant;
use embassy_rp::gpio::{Level, Output};
use throttle_core::{Clock, StatusLed};

/// Millisecond clock backed by the embassy time driver.
///
/// Truncates the 64-bit uptime to `u32`; the core's timers use wrapping
/// arithmetic, so the rollover every ~49.7 days is harmless.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[inline]
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}

/// Status LED on an RP2040 push-pull output.
pub struct BoardLed<'d> {
    pin: Output<'d>,
}

impl<'d> BoardLed<'d> {
    /// Wrap an output pin. The pin level is not touched.
    #[must_use]
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl StatusLed for BoardLed<'_> {
    fn set(&mut self, on: bool) {
        self.pin.set_level(Level::from(on));
    }
}
