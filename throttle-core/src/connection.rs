//! USB connection state machine.
//!
//! Driven exclusively by events from the USB stack. Its only observable
//! output is the LED [`BlinkInterval`] for the current state:
//!
//! | State       | Blink interval |
//! |-------------|----------------|
//! | `Unmounted` | 250 ms         |
//! | `Mounted`   | 1000 ms        |
//! | `Suspended` | 2500 ms        |

use crate::blink::BlinkInterval;

/// Blink interval while the device is not enumerated.
pub const BLINK_NOT_MOUNTED_MS: u32 = 250;

/// Blink interval while the device is configured by a host.
pub const BLINK_MOUNTED_MS: u32 = 1000;

/// Blink interval while the bus is suspended.
pub const BLINK_SUSPENDED_MS: u32 = 2500;

/// USB link state as seen by the application.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    #[default]
    Unmounted,
    Mounted,
    Suspended,
}

impl ConnectionState {
    /// LED blink interval associated with this state.
    #[must_use]
    pub const fn blink_interval(self) -> BlinkInterval {
        match self {
            ConnectionState::Unmounted => BlinkInterval::Millis(BLINK_NOT_MOUNTED_MS),
            ConnectionState::Mounted => BlinkInterval::Millis(BLINK_MOUNTED_MS),
            ConnectionState::Suspended => BlinkInterval::Millis(BLINK_SUSPENDED_MS),
        }
    }
}

/// Connection notification delivered by the USB stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsbEvent {
    /// Host configured the device.
    Mount,
    /// Device was deconfigured, reset or detached.
    Unmount,
    /// Host suspended the bus.
    Suspend {
        /// Whether the host allowed remote wakeup. Not acted upon.
        remote_wakeup_en: bool,
    },
    /// Bus activity resumed.
    Resume,
}

/// Tracks the USB link and derives the LED blink interval.
///
/// Besides the visible [`ConnectionState`], the monitor remembers whether the
/// link is mounted underneath a suspend, which decides where `Resume` lands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionMonitor {
    state: ConnectionState,
    mounted: bool,
}

impl ConnectionMonitor {
    /// Start unmounted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ConnectionState::Unmounted,
            mounted: false,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether a host has the device configured (regardless of suspend).
    #[inline]
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Blink interval for the current state.
    #[inline]
    #[must_use]
    pub const fn blink_interval(&self) -> BlinkInterval {
        self.state.blink_interval()
    }

    /// Apply an event and return the resulting blink interval.
    pub fn handle(&mut self, event: UsbEvent) -> BlinkInterval {
        let previous = self.state;

        match event {
            UsbEvent::Mount => self.on_mount(),
            UsbEvent::Unmount => self.on_unmount(),
            UsbEvent::Suspend { remote_wakeup_en } => self.on_suspend(remote_wakeup_en),
            UsbEvent::Resume => self.on_resume(),
        }

        if previous != self.state {
            info!("USB: {:?} -> {:?}", previous, self.state);
        }
        self.blink_interval()
    }

    /// Host configured the device.
    pub fn on_mount(&mut self) {
        self.mounted = true;
        self.state = ConnectionState::Mounted;
    }

    /// Device lost its configuration.
    pub fn on_unmount(&mut self) {
        self.mounted = false;
        self.state = ConnectionState::Unmounted;
    }

    /// Bus suspended. The mounted flag is left untouched.
    pub fn on_suspend(&mut self, _remote_wakeup_en: bool) {
        self.state = ConnectionState::Suspended;
    }

    /// Bus resumed: back to `Mounted` if the link is still configured.
    pub fn on_resume(&mut self) {
        self.state = if self.mounted {
            ConnectionState::Mounted
        } else {
            ConnectionState::Unmounted
        };
    }
}
