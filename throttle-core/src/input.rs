//! Analog input trait and error types.

/// Error type for analog input operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// The converter did not produce a sample.
    Conversion,
    /// Any other peripheral I/O error.
    Io,
}

/// A single analog channel sampled at native resolution.
///
/// # Non-blocking
///
/// Implementations must return promptly. A conversion that cannot complete
/// right now is reported as an error; the caller skips that tick.
pub trait AxisInput {
    /// Take one raw sample (12-bit on the RP2040, `0..=4095`).
    fn try_read(&mut self) -> Result<u16, InputError>;
}
