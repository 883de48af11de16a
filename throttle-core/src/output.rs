//! Output traits (HID report sink, status LED) and error types.

use crate::report::JoystickReport;

/// Error type for report output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// Device not ready (e.g., USB not configured or bus suspended).
    NotReady,
    /// The previous report is still being transferred.
    Busy,
    /// USB/communication I/O error.
    Io,
}

/// Destination for joystick reports (USB HID input endpoint, instance 0).
///
/// # Non-blocking
///
/// Neither method may wait. `try_send` either hands the report to the
/// transport or fails immediately; there is no queue behind it.
pub trait ReportSink {
    /// Check if the sink can accept a new report right now.
    fn is_ready(&self) -> bool;

    /// Hand one report to the transport.
    fn try_send(&mut self, report: &JoystickReport) -> Result<(), OutputError>;
}

/// A single on/off indicator.
pub trait StatusLed {
    /// Drive the LED on (`true`) or off (`false`).
    fn set(&mut self, on: bool);
}
