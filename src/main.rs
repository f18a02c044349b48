//! nRF52840 firmware entry point.
//!
//! The pure core (`pub_button`) runs as a synchronous poll loop in
//! thread mode; everything time-critical lives in async tasks on a
//! high-priority [`InterruptExecutor`] so USB servicing and input
//! capture keep running while the core blocks inside a `Wait`
//! instruction or a report retry.
//!
//! Task layout:
//!   - `usb_task`            USB enumeration and endpoint servicing
//!   - `report_writer_task`  drains the report channel into the three
//!                           HID input endpoints
//!   - `led_reader_task`     keyboard output reports (host LED state)
//!   - `encoder_task`        quadrature decode on the knob A/B pins
//!   - `button_task`         debounced knob switch level
//!   - `tick_task`           foreground tick counter (~23 Hz)

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::InterruptExecutor;
use embassy_futures::select::select;
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_time::{block_for, Duration, Ticker, Timer};
use embassy_usb::class::hid::{
    Config as HidConfig, HidReader, HidReaderWriter, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, UsbDevice};
use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};
use static_cell::StaticCell;

use pub_button::config;
use pub_button::hid::consumer::CONSUMER_REPORT_DESCRIPTOR;
use pub_button::hid::keyboard::KEYBOARD_REPORT_DESCRIPTOR;
use pub_button::hid::system::SYSTEM_REPORT_DESCRIPTOR;
use pub_button::hid::{
    Delay, HidTransport, MAX_REPORT_SIZE, REPORT_ID_CONSUMER, REPORT_ID_KEYBOARD, REPORT_ID_SYSTEM,
};
use pub_button::store::ByteStore;
use pub_button::{Device, InputRegisters, QuadratureDecoder};

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

/// One input report, ID byte first.
type RawReport = heapless::Vec<u8, MAX_REPORT_SIZE>;

/// Last internal flash page, reserved for the action script.
const STORE_FLASH_ADDR: u32 = 0x000F_F000;
const FLASH_PAGE_SIZE: u32 = 4096;

static INPUTS: InputRegisters = InputRegisters::new();
static REPORTS: Channel<CriticalSectionRawMutex, RawReport, 8> = Channel::new();
static LEDS: Channel<CriticalSectionRawMutex, [u8; 2], 4> = Channel::new();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

static KB_STATE: StaticCell<State> = StaticCell::new();
static SYSTEM_STATE: StaticCell<State> = StaticCell::new();
static CONSUMER_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();

#[interrupt]
unsafe fn SWI1_EGU1() {
    EXECUTOR_HIGH.on_interrupt()
}

struct UsbParts {
    device: UsbDevice<'static, UsbDriver>,
    keyboard_reader: HidReader<'static, UsbDriver, 2>,
    keyboard_writer: HidWriter<'static, UsbDriver, 8>,
    system_writer: HidWriter<'static, UsbDriver, 8>,
    consumer_writer: HidWriter<'static, UsbDriver, 8>,
}

/// Initialise the USB stack: one HID interface per report page, with an
/// OUT endpoint on the keyboard interface for host LED state.
///
/// Must be called exactly once. All static buffers are consumed here.
fn init_usb(usbd: peripherals::USBD) -> UsbParts {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 128]);

    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    let kb_state = KB_STATE.init(State::new());
    let kb_config = HidConfig {
        report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let (keyboard_reader, keyboard_writer) =
        HidReaderWriter::<_, 2, 8>::new(&mut builder, kb_state, kb_config).split();

    let system_state = SYSTEM_STATE.init(State::new());
    let system_config = HidConfig {
        report_descriptor: SYSTEM_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let system_writer = HidWriter::new(&mut builder, system_state, system_config);

    let consumer_state = CONSUMER_STATE.init(State::new());
    let consumer_config = HidConfig {
        report_descriptor: CONSUMER_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let consumer_writer = HidWriter::new(&mut builder, consumer_state, consumer_config);

    let device = builder.build();

    info!("USB HID device initialised (keyboard + system + consumer)");

    UsbParts {
        device,
        keyboard_reader,
        keyboard_writer,
        system_writer,
        consumer_writer,
    }
}

#[embassy_executor::task]
async fn usb_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

/// Drain the report channel into the endpoint matching each report ID.
#[embassy_executor::task]
async fn report_writer_task(
    mut keyboard: HidWriter<'static, UsbDriver, 8>,
    mut system: HidWriter<'static, UsbDriver, 8>,
    mut consumer: HidWriter<'static, UsbDriver, 8>,
    reports: Receiver<'static, CriticalSectionRawMutex, RawReport, 8>,
) -> ! {
    loop {
        let report = reports.receive().await;
        let result = match report.first() {
            Some(&REPORT_ID_KEYBOARD) => keyboard.write(&report).await,
            Some(&REPORT_ID_SYSTEM) => system.write(&report).await,
            Some(&REPORT_ID_CONSUMER) => consumer.write(&report).await,
            _ => Ok(()),
        };
        if result.is_err() {
            warn!("HID report dropped");
        }
    }
}

struct LedHandler {
    leds: Sender<'static, CriticalSectionRawMutex, [u8; 2], 4>,
}

impl RequestHandler for LedHandler {
    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        if let (ReportId::Out(id), Some(&bits)) = (id, data.first()) {
            // Re-attach the report ID so the core sees the wire shape.
            let _ = self.leds.try_send([id, bits]);
        }
        OutResponse::Accepted
    }
}

/// Forward keyboard output reports (LED state) to the core.
#[embassy_executor::task]
async fn led_reader_task(reader: HidReader<'static, UsbDriver, 2>) -> ! {
    let mut handler = LedHandler {
        leds: LEDS.sender(),
    };
    reader.run(true, &mut handler).await
}

#[embassy_executor::task]
async fn encoder_task(mut pin_a: Input<'static>, mut pin_b: Input<'static>) -> ! {
    let mut decoder = QuadratureDecoder::new();
    loop {
        select(pin_a.wait_for_any_edge(), pin_b.wait_for_any_edge()).await;
        if let Some(dir) = decoder.sample(pin_a.is_high(), pin_b.is_high()) {
            INPUTS.record_detent(dir);
        }
    }
}

/// Debounced knob switch level (active low).
#[embassy_executor::task]
async fn button_task(mut pin: Input<'static>) -> ! {
    loop {
        pin.wait_for_any_edge().await;
        Timer::after_millis(config::BUTTON_DEBOUNCE_MS as u64).await;
        INPUTS.set_pressed(pin.is_low());
    }
}

#[embassy_executor::task]
async fn tick_task() -> ! {
    let mut ticker = Ticker::every(Duration::from_hz(config::TICKS_PER_SECOND as u64));
    loop {
        ticker.next().await;
        INPUTS.record_tick();
    }
}

/// HID transport backed by the report and LED channels.
struct UsbTransport {
    reports: Sender<'static, CriticalSectionRawMutex, RawReport, 8>,
    leds: Receiver<'static, CriticalSectionRawMutex, [u8; 2], 4>,
}

impl HidTransport for UsbTransport {
    fn write_report(&mut self, report: &[u8]) -> bool {
        let mut raw = RawReport::new();
        if raw.extend_from_slice(report).is_err() {
            return false;
        }
        self.reports.try_send(raw).is_ok()
    }

    /// Blocks the foreground loop; the writer task keeps draining on
    /// the interrupt executor meanwhile.
    fn backoff_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Option<usize> {
        let led = self.leds.try_receive().ok()?;
        let n = led.len().min(buf.len());
        buf[..n].copy_from_slice(&led[..n]);
        Some(n)
    }
}

struct TickDelay;

impl Delay for TickDelay {
    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}

/// EEPROM-style byte store on the last internal flash page.
///
/// All reads and writes go through a RAM cache; the dirty page is
/// flushed (erase + program) from the foreground loop after each poll,
/// so a save costs one page erase no matter how many bytes it touched.
struct FlashStore {
    flash: Nvmc<'static>,
    cache: [u8; config::STORE_LEN],
    dirty: bool,
}

impl FlashStore {
    fn new(mut flash: Nvmc<'static>) -> Self {
        let mut cache = [0xFF; config::STORE_LEN];
        if flash.read(STORE_FLASH_ADDR, &mut cache).is_err() {
            warn!("flash read failed, starting with an empty script");
            // An erased page reads 0xFF everywhere; the loader treats
            // the 0xFF count as corrupt and yields an empty list.
            cache = [0xFF; config::STORE_LEN];
        }
        Self {
            flash,
            cache,
            dirty: false,
        }
    }

    fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        let result = self
            .flash
            .erase(STORE_FLASH_ADDR, STORE_FLASH_ADDR + FLASH_PAGE_SIZE)
            .and_then(|()| self.flash.write(STORE_FLASH_ADDR, &self.cache));
        match result {
            Ok(()) => info!("script flushed to flash"),
            Err(_) => warn!("flash flush failed"),
        }
        self.dirty = false;
    }
}

impl ByteStore for FlashStore {
    fn read_byte(&self, addr: u16) -> u8 {
        self.cache[addr as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        if self.cache[addr as usize] != value {
            self.cache[addr as usize] = value;
            self.dirty = true;
        }
    }
}

#[entry]
fn main() -> ! {
    let p = embassy_nrf::init(Default::default());
    info!("pub-button v{} starting", config::VERSION);

    let usb = init_usb(p.USBD);

    // Knob wiring: A/B quadrature pair plus the push switch, all with
    // internal pull-ups.
    let pin_a = Input::new(p.P0_02, Pull::Up);
    let pin_b = Input::new(p.P0_03, Pull::Up);
    let switch = Input::new(p.P0_29, Pull::Up);

    interrupt::SWI1_EGU1.set_priority(Priority::P3);
    let spawner = EXECUTOR_HIGH.start(interrupt::SWI1_EGU1);
    unwrap!(spawner.spawn(usb_task(usb.device)));
    unwrap!(spawner.spawn(report_writer_task(
        usb.keyboard_writer,
        usb.system_writer,
        usb.consumer_writer,
        REPORTS.receiver(),
    )));
    unwrap!(spawner.spawn(led_reader_task(usb.keyboard_reader)));
    unwrap!(spawner.spawn(encoder_task(pin_a, pin_b)));
    unwrap!(spawner.spawn(button_task(switch)));
    unwrap!(spawner.spawn(tick_task()));

    let transport = UsbTransport {
        reports: REPORTS.sender(),
        leds: LEDS.receiver(),
    };
    let store = FlashStore::new(Nvmc::new(p.NVMC));
    let mut device = Device::new(transport, TickDelay, store);
    info!("loaded script with {} actions", device.list().len());

    loop {
        device.poll(&INPUTS);
        device.store_mut().flush();
        block_for(Duration::from_millis(2));
    }
}
