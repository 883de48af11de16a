//! Cooperative main loop.
//!
//! One [`Scheduler::run_once`] call is one iteration of the device's
//! forever-loop. It always runs the same three steps, in order:
//!
//! 1. service the USB stack, which may deliver connection events,
//! 2. poll the LED blink task,
//! 3. poll the HID sampling task.
//!
//! Nothing here blocks or fails. Each task rate-limits itself and returns
//! immediately when it is not due, which is the only fairness mechanism.
//! The caller owns the forever-loop, so an async executor can yield between
//! iterations.

use crate::blink::{BlinkInterval, BlinkTask};
use crate::connection::{ConnectionMonitor, UsbEvent};
use crate::hid::{HidOutcome, HidTask};
use crate::input::AxisInput;
use crate::output::{ReportSink, StatusLed};

/// Free-running millisecond counter.
pub trait Clock {
    /// Milliseconds since boot, wrapping at `u32::MAX`.
    fn now_ms(&self) -> u32;
}

/// The USB device stack's cooperative entry point.
pub trait UsbStack {
    /// Do any pending USB work without blocking.
    ///
    /// Connection events that occurred are reported through `on_event`
    /// synchronously, before this method returns.
    fn service<F: FnMut(UsbEvent)>(&mut self, on_event: F);
}

/// All mutable device state, owned by the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceContext {
    pub connection: ConnectionMonitor,
    pub blink: BlinkTask,
    pub hid: HidTask,
}

impl DeviceContext {
    /// Power-on state: unmounted, fast blink, LED off, timers at zero.
    #[must_use]
    pub const fn new() -> Self {
        let connection = ConnectionMonitor::new();
        Self {
            blink: BlinkTask::new(connection.blink_interval()),
            connection,
            hid: HidTask::new(),
        }
    }

    /// Power-on state with both task schedules anchored at `now_ms`.
    #[must_use]
    pub const fn starting_at(now_ms: u32) -> Self {
        let connection = ConnectionMonitor::new();
        Self {
            blink: BlinkTask::starting_at(now_ms, connection.blink_interval()),
            connection,
            hid: HidTask::starting_at(now_ms),
        }
    }

    /// Apply a USB connection event and update the blink interval.
    pub fn handle_usb_event(&mut self, event: UsbEvent) -> BlinkInterval {
        let interval = self.connection.handle(event);
        self.blink.set_interval(interval);
        interval
    }
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the hardware handles and the device context and runs the loop.
pub struct Scheduler<C, U, L, A, S> {
    clock: C,
    usb: U,
    led: L,
    input: A,
    sink: S,
    context: DeviceContext,
}

impl<C, U, L, A, S> Scheduler<C, U, L, A, S>
where
    C: Clock,
    U: UsbStack,
    L: StatusLed,
    A: AxisInput,
    S: ReportSink,
{
    /// Create a scheduler in the power-on state.
    pub fn new(clock: C, usb: U, led: L, input: A, sink: S) -> Self {
        Self::with_context(clock, usb, led, input, sink, DeviceContext::new())
    }

    /// Create a scheduler with an explicit starting context.
    pub fn with_context(clock: C, usb: U, led: L, input: A, sink: S, context: DeviceContext) -> Self {
        Self {
            clock,
            usb,
            led,
            input,
            sink,
            context,
        }
    }

    /// One loop iteration: USB service, LED task, HID task.
    ///
    /// Returns what the HID task did, if it was due.
    pub fn run_once(&mut self) -> Option<HidOutcome> {
        let context = &mut self.context;
        self.usb.service(|event| {
            context.handle_usb_event(event);
        });

        let now_ms = self.clock.now_ms();
        self.context.blink.poll(now_ms, &mut self.led);

        let now_ms = self.clock.now_ms();
        self.context
            .hid
            .poll(now_ms, &mut self.input, &mut self.sink)
    }

    /// Get a reference to the device context.
    pub fn context(&self) -> &DeviceContext {
        &self.context
    }

    /// Get a reference to the clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Get a mutable reference to the USB stack.
    pub fn usb_mut(&mut self) -> &mut U {
        &mut self.usb
    }

    /// Get a reference to the status LED.
    pub fn led(&self) -> &L {
        &self.led
    }

    /// Get a reference to the report sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Decompose the scheduler into its hardware handles and context.
    pub fn into_parts(self) -> (C, U, L, A, S, DeviceContext) {
        (
            self.clock,
            self.usb,
            self.led,
            self.input,
            self.sink,
            self.context,
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::connection::ConnectionState;
    use crate::input::InputError;
    use crate::output::OutputError;
    use crate::report::JoystickReport;
    use core::cell::Cell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Clone, Default)]
    struct MockClock(Rc<Cell<u32>>);

    impl Clock for MockClock {
        fn now_ms(&self) -> u32 {
            self.0.get()
        }
    }

    #[derive(Default)]
    struct MockUsb {
        pending: Vec<UsbEvent>,
        services: usize,
    }

    impl UsbStack for MockUsb {
        fn service<F: FnMut(UsbEvent)>(&mut self, mut on_event: F) {
            self.services += 1;
            for event in self.pending.drain(..) {
                on_event(event);
            }
        }
    }

    #[derive(Default)]
    struct MockLed(Vec<bool>);

    impl StatusLed for MockLed {
        fn set(&mut self, on: bool) {
            self.0.push(on);
        }
    }

    struct MockInput(u16);

    impl AxisInput for MockInput {
        fn try_read(&mut self) -> Result<u16, InputError> {
            Ok(self.0)
        }
    }

    #[derive(Default)]
    struct MockSink(Vec<JoystickReport>);

    impl ReportSink for MockSink {
        fn is_ready(&self) -> bool {
            true
        }

        fn try_send(&mut self, report: &JoystickReport) -> Result<(), OutputError> {
            self.0.push(*report);
            Ok(())
        }
    }

    fn scheduler() -> (
        Rc<Cell<u32>>,
        Scheduler<MockClock, MockUsb, MockLed, MockInput, MockSink>,
    ) {
        let clock = MockClock::default();
        let time = clock.0.clone();
        let scheduler = Scheduler::new(
            clock,
            MockUsb::default(),
            MockLed::default(),
            MockInput(2100),
            MockSink::default(),
        );
        (time, scheduler)
    }

    #[test]
    fn test_power_on_context() {
        let context = DeviceContext::new();
        assert_eq!(context.connection.state(), ConnectionState::Unmounted);
        assert_eq!(context.blink.interval(), BlinkInterval::Millis(250));
        assert!(!context.blink.led_on());
    }

    #[test]
    fn test_services_usb_every_iteration() {
        let (_time, mut scheduler) = scheduler();
        for _ in 0..3 {
            assert_eq!(scheduler.run_once(), None);
        }
        assert_eq!(scheduler.usb_mut().services, 3);
        assert!(scheduler.led().0.is_empty());
        assert!(scheduler.sink().0.is_empty());
    }

    #[test]
    fn test_event_applies_before_led_task_in_same_iteration() {
        let (time, mut scheduler) = scheduler();
        time.set(250);
        // Without the mount the LED would toggle at 250 ms.
        scheduler.usb_mut().pending.push(UsbEvent::Mount);
        scheduler.run_once();
        assert_eq!(scheduler.context().blink.interval(), BlinkInterval::Millis(1000));
        assert!(scheduler.led().0.is_empty());

        time.set(1000);
        scheduler.run_once();
        assert_eq!(scheduler.led().0, [true]);
    }

    #[test]
    fn test_hid_tick_reports_outcome() {
        let (time, mut scheduler) = scheduler();
        time.set(5);
        let outcome = scheduler.run_once();
        assert!(matches!(outcome, Some(HidOutcome::Sampled { .. })));
        assert_eq!(scheduler.sink().0, [JoystickReport::new(32767)]);
    }

    #[test]
    fn test_into_parts() {
        let (time, mut scheduler) = scheduler();
        time.set(250);
        scheduler.run_once();
        let (_clock, usb, led, _input, sink, context) = scheduler.into_parts();
        assert_eq!(usb.services, 1);
        assert_eq!(led.0, [true]);
        assert_eq!(sink.0.len(), 1);
        assert!(context.blink.led_on());
    }
}
