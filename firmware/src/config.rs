//! Board and USB constants.
//!
//! Pin assignments, USB identity and queue sizes live here so they can be
//! tuned in one place. Signal conditioning and timing constants belong to
//! `throttle-core`.

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "Rust Throttle";
pub const USB_PRODUCT: &str = "USB Throttle Axis";
pub const USB_SERIAL_NUMBER: &str = "001";

/// Bus power draw advertised to the host (mA).
pub const USB_MAX_POWER_MA: u16 = 100;

/// HID polling interval (ms). 1 ms = 1000 Hz for lowest latency.
pub const USB_HID_POLL_MS: u8 = 1;

/// Connection events buffered between two loop iterations.
///
/// The loop drains the queue every pass, so a burst (reset, configure,
/// suspend) never comes close to this.
pub const USB_EVENT_QUEUE_DEPTH: usize = 8;

// GPIO pin assignments (Raspberry Pi Pico)
//
// These are logical names; the `embassy_rp::peripherals` types are picked
// in `main.rs`.
//
//   Throttle wiper → GPIO 26 (ADC0)
//   Status LED     → GPIO 25 (on-board)
