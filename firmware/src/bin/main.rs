#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_rp::adc::{Adc, Channel as AdcChannel, Config as AdcConfig};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig, UsbDevice};
use static_cell::StaticCell;
use usb_throttle::{
    config, configure_usb_hid, run_hid_writer, AdcAxisInput, BoardLed, Clock, DeviceContext,
    EmbassyClock, HidLink, Scheduler, ThrottleHidWriter, ThrottleRequestHandler, UsbEventQueue,
    UsbHidOutput, UsbLinkHandler,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Shared state between the USB tasks and the main loop.
static HID_LINK: HidLink = HidLink::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();
static REQUEST_HANDLER: StaticCell<ThrottleRequestHandler> = StaticCell::new();
static LINK_HANDLER: StaticCell<UsbLinkHandler> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("USB throttle starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- ADC Setup ---
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let wiper = AdcChannel::new_pin(p.PIN_26, Pull::None);
    let axis = AdcAxisInput::new(adc, wiper);

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Bus events (configure, reset, suspend, resume) feed the link state machine
    let link_handler = LINK_HANDLER.init(UsbLinkHandler::new(&HID_LINK));
    builder.handler(link_handler);

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let request_handler = REQUEST_HANDLER.init(ThrottleRequestHandler);
    let hid_writer = configure_usb_hid(&mut builder, hid_state, request_handler);

    // Build the USB device
    let usb_device = builder.build();

    // On-board LED shows the USB link state
    let led = BoardLed::new(Output::new(p.PIN_25, Level::Low));

    // Spawn tasks (panic if a task cannot be spawned)
    spawner.spawn(usb_task(usb_device)).unwrap();
    spawner.spawn(hid_writer_task(hid_writer)).unwrap();

    let clock = EmbassyClock;
    let context = DeviceContext::starting_at(clock.now_ms());
    let mut scheduler = Scheduler::with_context(
        clock,
        UsbEventQueue::new(&HID_LINK),
        led,
        axis,
        UsbHidOutput::new(&HID_LINK),
        context,
    );

    info!("USB throttle initialized, entering main loop");

    loop {
        scheduler.run_once();
        // Let the USB and writer tasks run between iterations
        yield_now().await;
    }
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// HID writer task - transfers the latest report to the host.
#[embassy_executor::task]
async fn hid_writer_task(writer: ThrottleHidWriter<'static>) {
    run_hid_writer(writer, &HID_LINK).await;
}
