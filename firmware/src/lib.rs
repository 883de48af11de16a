//! USB HID throttle for RP2040.
//!
//! This crate provides the embedded side of a single-axis USB throttle:
//! it samples a potentiometer on the ADC and reports it to the host as a
//! USB HID joystick axis, blinking the on-board LED to show the USB link
//! state.
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | ADC0     | 26   | Throttle potentiometer wiper |
//! | LED      | 25   | On-board LED (USB link state) |
//!
//! # Architecture
//!
//! The firmware uses the Embassy executor with three tasks:
//!
//! - **USB Task**: runs the embassy-usb device stack
//! - **HID Writer Task**: transfers the latest report to the host
//! - **Main Task**: the cooperative loop from [`throttle_core::Scheduler`],
//!   yielding to the executor after every iteration
//!
//! The loop never awaits the USB tasks. Connection events reach it through a
//! queue drained each iteration, and reports leave it through a
//! latest-value signal guarded by an in-flight flag (see [`usb_output`]).
//!
//! | Link state | LED blink |
//! |------------|-----------|
//! | Not mounted | 250 ms |
//! | Mounted | 1000 ms |
//! | Suspended | 2500 ms |
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)
//!
//! Per-sample diagnostics (raw, clamped and scaled values) are logged at
//! `trace` level; build with `DEFMT_LOG=trace` to see them.
//!
//! # Re-exports
//!
//! This crate re-exports the public items of [`throttle_core`] that the
//! firmware wires together, so the binary only needs to depend on this crate.

#![no_std]

// Re-export core types for convenience
pub use throttle_core::{
    condition, AxisInput, BlinkInterval, Clock, ConnectionState, DeviceContext, HidOutcome,
    InputError, JoystickReport, OutputError, ReportSink, Scheduler, StatusLed, UsbEvent, UsbStack,
};

pub mod board;
pub mod config;
pub mod input;
pub mod usb_output;

pub use board::{BoardLed, EmbassyClock};
pub use input::AdcAxisInput;
pub use usb_output::{
    configure_usb_hid, run_hid_writer, HidLink, ThrottleHidWriter, ThrottleRequestHandler,
    UsbEventQueue, UsbHidOutput, UsbLinkHandler,
};
