//! USB HID joystick output and connection event plumbing.
//!
//! The embassy-usb device and the HID writer run as their own executor
//! tasks. The main loop never awaits them; it talks to them only through a
//! [`HidLink`]:
//!
//! - [`UsbLinkHandler`] receives embassy-usb bus callbacks and queues them
//!   as [`UsbEvent`]s.
//! - [`UsbEventQueue`] drains that queue during the loop's USB service step.
//! - [`UsbHidOutput`] hands the latest report to the writer task, but only
//!   when the link is up and no earlier report is still in flight.

use crate::config;
use defmt::{debug, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, ReportId, RequestHandler, State};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Handler};
use throttle_core::{
    JoystickReport, LinkTracker, OutputError, ReportGate, ReportSink, UsbEvent, UsbStack,
};

/// Size of the HID input report in bytes.
pub const REPORT_SIZE: usize = JoystickReport::SIZE;

/// USB driver type for the RP2040.
pub type UsbDriver<'d> = Driver<'d, USB>;

/// HID writer for the joystick interface.
pub type ThrottleHidWriter<'d> = HidWriter<'d, UsbDriver<'d>, REPORT_SIZE>;

/// HID Joystick Report Descriptor.
///
/// This descriptor defines a joystick with a single absolute Z axis,
/// 16 bits, logical range 0..=32767, and no report ID.
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Throttle axis ---
    0x09, 0x32, //   Usage (Z)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x7F, //   Logical Maximum (32767)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    0xC0, // End Collection
];

/// State shared between the USB tasks and the main loop.
///
/// Every operation on it is non-blocking from the loop's side.
pub struct HidLink {
    events: Channel<CriticalSectionRawMutex, UsbEvent, { config::USB_EVENT_QUEUE_DEPTH }>,
    report: Signal<CriticalSectionRawMutex, JoystickReport>,
    gate: ReportGate,
}

impl HidLink {
    /// Create an idle link: no events, link down, nothing in flight.
    pub const fn new() -> Self {
        Self {
            events: Channel::new(),
            report: Signal::new(),
            gate: ReportGate::new(),
        }
    }
}

impl Default for HidLink {
    fn default() -> Self {
        Self::new()
    }
}

/// embassy-usb bus handler feeding a [`LinkTracker`].
///
/// Callbacks run inside the USB device task; they only queue events and
/// update the readiness flag.
pub struct UsbLinkHandler {
    link: &'static HidLink,
    tracker: LinkTracker,
}

impl UsbLinkHandler {
    /// Create a handler publishing into `link`.
    pub const fn new(link: &'static HidLink) -> Self {
        Self {
            link,
            tracker: LinkTracker::new(),
        }
    }

    fn publish(&mut self, event: Option<UsbEvent>) {
        if let Some(event) = event {
            if self.link.events.try_send(event).is_err() {
                warn!("USB event queue full, dropped {:?}", event);
            }
        }
        self.link.gate.set_link_ready(self.tracker.ready());
    }
}

impl Handler for UsbLinkHandler {
    fn enabled(&mut self, enabled: bool) {
        let event = self.tracker.on_enabled(enabled);
        self.publish(event);
    }

    fn reset(&mut self) {
        let event = self.tracker.on_reset();
        self.publish(event);
    }

    fn configured(&mut self, configured: bool) {
        let event = self.tracker.on_configured(configured);
        self.publish(event);
    }

    fn suspended(&mut self, suspended: bool) {
        let event = self.tracker.on_suspended(suspended);
        self.publish(event);
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        self.tracker.on_remote_wakeup_enabled(enabled);
    }
}

/// The loop's view of the USB stack: drains queued connection events.
pub struct UsbEventQueue {
    link: &'static HidLink,
}

impl UsbEventQueue {
    /// Create a queue reader for `link`.
    pub const fn new(link: &'static HidLink) -> Self {
        Self { link }
    }
}

impl UsbStack for UsbEventQueue {
    fn service<F: FnMut(UsbEvent)>(&mut self, mut on_event: F) {
        while let Ok(event) = self.link.events.try_receive() {
            on_event(event);
        }
    }
}

/// USB HID joystick output.
///
/// Hands reports to [`run_hid_writer`] through a latest-value signal. At most
/// one report is in flight; while it is, the sink reports not ready.
pub struct UsbHidOutput {
    link: &'static HidLink,
}

impl UsbHidOutput {
    /// Create an output publishing into `link`.
    pub const fn new(link: &'static HidLink) -> Self {
        Self { link }
    }
}

impl ReportSink for UsbHidOutput {
    fn is_ready(&self) -> bool {
        self.link.gate.is_ready()
    }

    fn try_send(&mut self, report: &JoystickReport) -> Result<(), OutputError> {
        self.link.gate.try_claim()?;
        self.link.report.signal(*report);
        Ok(())
    }
}

/// Transfer reports handed over by [`UsbHidOutput`], forever.
///
/// Must be run from a dedicated executor task.
pub async fn run_hid_writer(mut writer: ThrottleHidWriter<'static>, link: &'static HidLink) -> ! {
    loop {
        let report = link.report.wait().await;
        if let Err(e) = writer.write(&report.to_bytes()).await {
            warn!("USB HID write failed: {:?}", e);
        }
        link.gate.release();
    }
}

/// HID request handler (handles GET_REPORT, SET_REPORT, etc.).
///
/// The device exposes no report state to control requests: GET_REPORT
/// answers with zero bytes, SET_REPORT is accepted and ignored.
pub struct ThrottleRequestHandler;

impl RequestHandler for ThrottleRequestHandler {
    fn get_report(&mut self, _id: ReportId, _buf: &mut [u8]) -> Option<usize> {
        debug!("GET_REPORT answered with zero bytes");
        Some(0)
    }

    fn set_report(&mut self, _id: ReportId, data: &[u8]) -> OutResponse {
        debug!("SET_REPORT ignored ({} bytes)", data.len());
        OutResponse::Accepted
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, _duration_ms: u32) {}

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        None
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by [`run_hid_writer`].
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
    request_handler: &'d mut ThrottleRequestHandler,
) -> ThrottleHidWriter<'d> {
    let config = HidConfig {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: Some(request_handler),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
        // embassy-usb 0.5 always advertises subclass None / boot protocol None.
    };

    HidWriter::new(builder, state, config)
}
