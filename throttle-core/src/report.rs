//! HID joystick report and the "latest value wins" emitter.

use crate::output::{OutputError, ReportSink};

/// USB HID joystick report.
///
/// One absolute axis (Z) in `0..=32767`. On the wire this is exactly
/// [`Self::SIZE`] bytes, little-endian, with no report ID byte and no
/// padding. The layout must match the HID report descriptor the firmware
/// advertises.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    /// Axis position, `0..=32767`.
    pub z: u16,
}

impl JoystickReport {
    /// Size of the report in bytes.
    pub const SIZE: usize = 2;

    /// Create a report carrying the given axis value.
    #[inline]
    #[must_use]
    pub const fn new(z: u16) -> Self {
        Self { z }
    }

    /// Neutral/zero report.
    #[inline]
    #[must_use]
    pub const fn neutral() -> Self {
        Self { z: 0 }
    }

    /// Convert the report to its wire bytes.
    #[inline]
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.z.to_le_bytes()
    }
}

/// Result of one emit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Emission {
    /// The report was handed to the sink.
    Sent,
    /// The sink was not ready; the report was discarded.
    Skipped,
    /// The sink claimed readiness but refused the report; it was discarded.
    Failed(OutputError),
}

impl Emission {
    /// Whether the report reached the sink.
    #[inline]
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Emission::Sent)
    }
}

/// Build a report from `value` and try to deliver it.
///
/// A send is attempted only when the sink reports ready. Otherwise, or if
/// the attempt fails, the report is dropped: no retry, no buffering. The
/// next tick samples a fresh value, so staleness is bounded by the sampling
/// period.
pub fn emit_report<S: ReportSink>(sink: &mut S, value: u16) -> Emission {
    let report = JoystickReport::new(value);

    if !sink.is_ready() {
        trace!("report skipped, sink not ready");
        return Emission::Skipped;
    }

    match sink.try_send(&report) {
        Ok(()) => Emission::Sent,
        Err(e) => {
            debug!("report dropped: {:?}", e);
            Emission::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    struct MockSink {
        ready: bool,
        result: Result<(), OutputError>,
        sent: Vec<JoystickReport>,
        attempts: usize,
    }

    impl MockSink {
        fn new(ready: bool) -> Self {
            Self {
                ready,
                result: Ok(()),
                sent: Vec::new(),
                attempts: 0,
            }
        }
    }

    impl ReportSink for MockSink {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn try_send(&mut self, report: &JoystickReport) -> Result<(), OutputError> {
            self.attempts += 1;
            if self.result.is_ok() {
                self.sent.push(*report);
            }
            self.result
        }
    }

    #[test]
    fn test_report_wire_layout() {
        assert_eq!(JoystickReport::SIZE, 2);
        assert_eq!(JoystickReport::new(0x1234).to_bytes(), [0x34, 0x12]);
        assert_eq!(JoystickReport::new(32767).to_bytes(), [0xFF, 0x7F]);
        assert_eq!(JoystickReport::neutral().to_bytes(), [0x00, 0x00]);
    }

    #[test]
    fn test_emit_when_ready() {
        let mut sink = MockSink::new(true);
        assert_eq!(emit_report(&mut sink, 16383), Emission::Sent);
        assert_eq!(sink.attempts, 1);
        assert_eq!(sink.sent, [JoystickReport::new(16383)]);
    }

    #[test]
    fn test_emit_skips_when_not_ready() {
        let mut sink = MockSink::new(false);
        assert_eq!(emit_report(&mut sink, 100), Emission::Skipped);
        assert_eq!(sink.attempts, 0);
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn test_emit_failure_is_absorbed() {
        let mut sink = MockSink::new(true);
        sink.result = Err(OutputError::Busy);
        let emission = emit_report(&mut sink, 100);
        assert_eq!(emission, Emission::Failed(OutputError::Busy));
        assert!(!emission.is_sent());
        assert_eq!(sink.attempts, 1);

        // No retry: the next emit carries the new value only.
        sink.result = Ok(());
        assert!(emit_report(&mut sink, 200).is_sent());
        assert_eq!(sink.sent, [JoystickReport::new(200)]);
    }
}
