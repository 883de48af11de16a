//! Platform-agnostic throttle axis logic and cooperative scheduling.
//!
//! This crate holds everything about the USB throttle that does not touch a
//! concrete chip: the signal conditioning transform, the HID report wire
//! format, the USB connection state machine, the LED blink pattern and the
//! cooperative loop that ties them together. Hardware is reached through the
//! small traits in [`input`], [`output`] and [`scheduler`], so the whole device
//! can be exercised on the host with mock peripherals.
//!
//! # Overview
//!
//! - [`conditioner`]: dead-zone, clamp and rescale of raw ADC samples ([`condition`])
//! - [`report`]: the 2-byte [`JoystickReport`] and the non-blocking [`emit_report`]
//! - [`connection`]: [`ConnectionMonitor`] driven by [`UsbEvent`]s
//! - [`link`]: [`LinkTracker`] for bus callbacks, [`ReportGate`] for report readiness
//! - [`blink`]: [`BlinkTask`], the LED toggler
//! - [`timer`]: [`PeriodicTimer`], the drift-free rate limiter both tasks use
//! - [`hid`]: [`HidTask`], sample -> condition -> emit every 5 ms
//! - [`scheduler`]: [`Scheduler`], one iteration of the main loop
//!
//! # Example
//!
//! ```rust
//! use throttle_core::{condition, ConnectionMonitor, UsbEvent, BlinkInterval};
//!
//! assert_eq!(condition(1665), 16383);
//!
//! let mut monitor = ConnectionMonitor::new();
//! assert_eq!(monitor.handle(UsbEvent::Mount), BlinkInterval::Millis(1000));
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// Must come first so the logging macros are visible to every module below.
#[macro_use]
mod fmt;

pub mod blink;
pub mod conditioner;
pub mod connection;
pub mod hid;
pub mod input;
pub mod link;
pub mod output;
pub mod report;
pub mod scheduler;
pub mod timer;

// Re-export main types at crate root
pub use blink::{BlinkInterval, BlinkTask};
pub use conditioner::{clamp, condition, scale, Conditioned, ADC_MAX, DEADZONE_MIN, REPORT_MAX};
pub use connection::{ConnectionMonitor, ConnectionState, UsbEvent};
pub use hid::{HidOutcome, HidTask, HID_TASK_PERIOD_MS};
pub use input::{AxisInput, InputError};
pub use link::{LinkTracker, ReportGate};
pub use output::{OutputError, ReportSink, StatusLed};
pub use report::{emit_report, Emission, JoystickReport};
pub use scheduler::{Clock, DeviceContext, Scheduler, UsbStack};
pub use timer::PeriodicTimer;
