//! USB bus bookkeeping shared by the device stack and the report path.
//!
//! [`LinkTracker`] turns raw bus callbacks (reset, enable, configure,
//! suspend) into at most one [`UsbEvent`] each and knows whether reports may
//! be sent. [`ReportGate`] holds the two flags the report sink checks: the
//! link readiness published by the tracker's owner, and whether a report is
//! still being transferred.

use crate::connection::UsbEvent;
use crate::output::OutputError;
use portable_atomic::{AtomicBool, Ordering};

/// Configured/suspended state of the bus as reported by the USB stack.
///
/// Duplicate callbacks produce no event, so the connection state machine
/// only ever sees real transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkTracker {
    configured: bool,
    suspended: bool,
    remote_wakeup_en: bool,
}

impl LinkTracker {
    /// Detached bus: not configured, not suspended.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            configured: false,
            suspended: false,
            remote_wakeup_en: false,
        }
    }

    /// Whether a host has the device configured.
    #[inline]
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.configured
    }

    /// Whether the bus is suspended.
    #[inline]
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Reports may be sent: configured and not suspended.
    #[inline]
    #[must_use]
    pub const fn ready(&self) -> bool {
        self.configured && !self.suspended
    }

    /// Bus reset. Clears suspend and drops the configuration.
    pub fn on_reset(&mut self) -> Option<UsbEvent> {
        self.suspended = false;
        self.deconfigure()
    }

    /// Bus enabled or disabled. Disabling behaves like a reset.
    pub fn on_enabled(&mut self, enabled: bool) -> Option<UsbEvent> {
        if enabled {
            return None;
        }
        self.on_reset()
    }

    /// Host set or cleared the configuration.
    pub fn on_configured(&mut self, configured: bool) -> Option<UsbEvent> {
        if !configured {
            return self.deconfigure();
        }
        if self.configured {
            return None;
        }
        self.configured = true;
        Some(UsbEvent::Mount)
    }

    /// Bus suspended or resumed. Repeats of the current state are ignored.
    pub fn on_suspended(&mut self, suspended: bool) -> Option<UsbEvent> {
        if self.suspended == suspended {
            return None;
        }
        self.suspended = suspended;
        Some(if suspended {
            UsbEvent::Suspend {
                remote_wakeup_en: self.remote_wakeup_en,
            }
        } else {
            UsbEvent::Resume
        })
    }

    /// Host enabled or disabled remote wakeup. Carried on the next suspend.
    pub fn on_remote_wakeup_enabled(&mut self, enabled: bool) {
        self.remote_wakeup_en = enabled;
    }

    fn deconfigure(&mut self) -> Option<UsbEvent> {
        if !self.configured {
            return None;
        }
        self.configured = false;
        Some(UsbEvent::Unmount)
    }
}

/// Lock-free readiness flags between the report producer and the writer.
///
/// At most one report is in flight: [`ReportGate::try_claim`] succeeds only
/// when the link is ready and the previous report has been released.
#[derive(Debug, Default)]
pub struct ReportGate {
    link_ready: AtomicBool,
    in_flight: AtomicBool,
}

impl ReportGate {
    /// Link down, nothing in flight.
    pub const fn new() -> Self {
        Self {
            link_ready: AtomicBool::new(false),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Publish the link readiness, usually [`LinkTracker::ready`].
    pub fn set_link_ready(&self, ready: bool) {
        self.link_ready.store(ready, Ordering::Release);
    }

    /// Whether the link is up, regardless of any report in flight.
    pub fn link_ready(&self) -> bool {
        self.link_ready.load(Ordering::Acquire)
    }

    /// Whether a report has been claimed and not yet released.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Link up and nothing in flight.
    pub fn is_ready(&self) -> bool {
        self.link_ready() && !self.in_flight()
    }

    /// Reserve the single in-flight slot for a new report.
    pub fn try_claim(&self) -> Result<(), OutputError> {
        if !self.link_ready() {
            return Err(OutputError::NotReady);
        }
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(OutputError::Busy);
        }
        Ok(())
    }

    /// The claimed report has been transferred (or failed); free the slot.
    pub fn release(&self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    fn configured() -> LinkTracker {
        let mut tracker = LinkTracker::new();
        assert_eq!(tracker.on_configured(true), Some(UsbEvent::Mount));
        tracker
    }

    #[test]
    fn test_reset_while_not_configured_is_silent() {
        let mut tracker = LinkTracker::new();
        assert_eq!(tracker.on_reset(), None);
        assert_eq!(tracker.on_enabled(false), None);
        assert!(!tracker.ready());
    }

    #[test]
    fn test_reset_while_configured_and_suspended() {
        let mut tracker = configured();
        assert!(tracker.on_suspended(true).is_some());
        assert_eq!(tracker.on_reset(), Some(UsbEvent::Unmount));
        assert!(!tracker.is_configured());
        assert!(!tracker.is_suspended());
        assert!(!tracker.ready());
    }

    #[test]
    fn test_disable_while_configured_unmounts_once() {
        let mut tracker = configured();
        assert_eq!(tracker.on_enabled(false), Some(UsbEvent::Unmount));
        assert_eq!(tracker.on_enabled(false), None);
        assert_eq!(tracker.on_enabled(true), None);
    }

    #[test]
    fn test_configure_is_idempotent() {
        let mut tracker = configured();
        assert_eq!(tracker.on_configured(true), None);
        assert_eq!(tracker.on_configured(false), Some(UsbEvent::Unmount));
        assert_eq!(tracker.on_configured(false), None);
    }

    #[test]
    fn test_duplicate_suspend_is_ignored() {
        let mut tracker = configured();
        assert_eq!(
            tracker.on_suspended(true),
            Some(UsbEvent::Suspend {
                remote_wakeup_en: false
            })
        );
        assert_eq!(tracker.on_suspended(true), None);
        assert_eq!(tracker.on_suspended(false), Some(UsbEvent::Resume));
        assert_eq!(tracker.on_suspended(false), None);
    }

    #[test]
    fn test_suspend_carries_remote_wakeup() {
        let mut tracker = configured();
        tracker.on_remote_wakeup_enabled(true);
        assert_eq!(
            tracker.on_suspended(true),
            Some(UsbEvent::Suspend {
                remote_wakeup_en: true
            })
        );
    }

    #[test]
    fn test_ready_only_when_configured_and_not_suspended() {
        let mut tracker = LinkTracker::new();
        assert!(!tracker.ready());

        tracker.on_suspended(true);
        assert!(!tracker.ready());
        tracker.on_configured(true);
        assert!(!tracker.ready());
        tracker.on_suspended(false);
        assert!(tracker.ready());

        tracker.on_configured(false);
        assert!(!tracker.ready());
    }

    #[test]
    fn test_gate_not_ready_until_link_up() {
        let gate = ReportGate::new();
        assert!(!gate.is_ready());
        assert_eq!(gate.try_claim(), Err(OutputError::NotReady));
        assert!(!gate.in_flight());
    }

    #[test]
    fn test_in_flight_report_blocks_the_next() {
        let gate = ReportGate::new();
        gate.set_link_ready(true);
        assert!(gate.is_ready());

        assert_eq!(gate.try_claim(), Ok(()));
        assert!(gate.in_flight());
        assert!(!gate.is_ready());
        assert_eq!(gate.try_claim(), Err(OutputError::Busy));

        gate.release();
        assert!(gate.is_ready());
        assert_eq!(gate.try_claim(), Ok(()));
    }

    #[test]
    fn test_link_drop_with_report_in_flight() {
        let gate = ReportGate::new();
        gate.set_link_ready(true);
        assert_eq!(gate.try_claim(), Ok(()));

        gate.set_link_ready(false);
        gate.release();
        assert!(!gate.is_ready());
        assert_eq!(gate.try_claim(), Err(OutputError::NotReady));
    }
}
