//! ADC-based throttle input.
//!
//! Samples a single RP2040 ADC channel (GPIO 26 / ADC0 on the Pico) in
//! blocking one-shot mode. A conversion takes about 2 µs, well inside the
//! main loop's budget.

use embassy_rp::adc::{Adc, Blocking, Channel, Error as AdcError};
use throttle_core::{AxisInput, InputError};

/// Convert ADC errors to [`InputError`].
///
/// This is a helper function instead of a `From` impl to avoid orphan rule issues
/// (both `AdcError` and `InputError` are defined in external crates).
#[inline]
fn adc_error_to_input_error(e: AdcError) -> InputError {
    match e {
        AdcError::ConversionFailed => InputError::Conversion,
        #[allow(unreachable_patterns)]
        _ => InputError::Io,
    }
}

/// Throttle axis read from one ADC channel.
pub struct AdcAxisInput<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
}

impl<'d> AdcAxisInput<'d> {
    /// Create a new axis input from a blocking ADC and the wiper channel.
    #[must_use]
    pub fn new(adc: Adc<'d, Blocking>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl AxisInput for AdcAxisInput<'_> {
    fn try_read(&mut self) -> Result<u16, InputError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(adc_error_to_input_error)
    }
}
