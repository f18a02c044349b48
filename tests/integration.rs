//! End-to-end tests driving the device through its public surface: the
//! input registers on one side and the HID transport on the other.

use std::collections::VecDeque;

use pub_button::action::{Action, ActionList, Modifiers};
use pub_button::config::{INACTIVITY_TICKS, LONG_PRESS_TICKS};
use pub_button::encoder::Direction;
use pub_button::hid::{keymap, Delay, HidTransport, REPORT_ID_KEYBOARD};
use pub_button::interp::{self, Machine};
use pub_button::store::{self, MemStore};
use pub_button::{tables, Device, HostLink, InputRegisters, Mode, QuadratureDecoder};

/// Records every written report; LED output reports are scripted.
#[derive(Default)]
struct FakeTransport {
    written: Vec<Vec<u8>>,
    pending_reads: VecDeque<Vec<u8>>,
}

impl FakeTransport {
    fn new() -> Self {
        Self::default()
    }

    fn with_leds(bits: u8) -> Self {
        let mut t = Self::default();
        t.pending_reads.push_back(vec![REPORT_ID_KEYBOARD, bits]);
        t
    }

    /// Keyboard press reports as (modifier, key) pairs, releases skipped.
    fn key_presses(&self) -> Vec<(u8, u8)> {
        self.written
            .iter()
            .filter(|r| r[0] == REPORT_ID_KEYBOARD && (r[1] != 0 || r[3] != 0))
            .map(|r| (r[1], r[3]))
            .collect()
    }

    /// The text typed so far, decoded through the ASCII keymap.
    fn typed_text(&self) -> String {
        let mut out = String::new();
        for (mods, key) in self.key_presses() {
            let shifted = mods & Modifiers::SHIFT.bits() != 0;
            for ch in 0x20..0x7Fu8 {
                if keymap::usage_for_ascii(ch) == (key, shifted) {
                    out.push(ch as char);
                    break;
                }
            }
        }
        out
    }
}

impl HidTransport for FakeTransport {
    fn write_report(&mut self, report: &[u8]) -> bool {
        self.written.push(report.to_vec());
        true
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Option<usize> {
        let report = self.pending_reads.pop_front()?;
        buf[..report.len()].copy_from_slice(&report);
        Some(report.len())
    }
}

struct NoDelay;

impl Delay for NoDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}

fn list_of(words: &[u16]) -> ActionList {
    let mut list = ActionList::new();
    for &w in words {
        list.push(Action::decode(w)).unwrap();
    }
    list
}

fn seeded_store(words: &[u16]) -> MemStore {
    let mut store = MemStore::new();
    store::save_list(&mut store, &list_of(words));
    store
}

/// A device plus simulated knob: presses, detents and timer ticks go in
/// through the input registers exactly as the firmware tasks post them.
struct Rig {
    device: Device<FakeTransport, NoDelay, MemStore>,
    inputs: InputRegisters,
}

impl Rig {
    fn new(store: MemStore) -> Self {
        Self {
            device: Device::new(FakeTransport::new(), NoDelay, store),
            inputs: InputRegisters::new(),
        }
    }

    fn poll(&mut self) {
        self.device.poll(&self.inputs);
    }

    /// Short press and release.
    fn click(&mut self) {
        self.inputs.set_pressed(true);
        self.poll();
        self.inputs.set_pressed(false);
        self.poll();
    }

    /// Press, hold for the long-press duration, release.
    fn hold(&mut self) {
        self.inputs.set_pressed(true);
        self.poll();
        for _ in 0..LONG_PRESS_TICKS {
            self.inputs.record_tick();
        }
        self.poll();
        self.inputs.set_pressed(false);
        self.poll();
    }

    fn turn(&mut self, dir: Direction) {
        self.inputs.record_detent(dir);
        self.poll();
    }

    /// Take the transport, returning everything typed so far.
    fn drain_typed(&mut self) -> String {
        let link = std::mem::replace(self.device.link_mut(), HostLink::new(FakeTransport::new()));
        link.into_transport().typed_text()
    }
}

#[test]
fn saved_script_plays_after_power_up() {
    // SHIFT+h, SHIFT+i
    let mut rig = Rig::new(seeded_store(&[0x010B, 0x010C]));
    assert_eq!(rig.device.list().len(), 2);

    rig.click();
    assert_eq!(rig.drain_typed(), "HI");
}

#[test]
fn corrupt_header_boots_an_empty_script() {
    let mut store = seeded_store(&[0x010B, 0x010C]);
    store.bytes_mut()[1] = 0xFF; // count way past capacity

    let mut rig = Rig::new(store);
    assert!(rig.device.list().is_empty());
    rig.click();
    assert_eq!(rig.drain_typed(), "");
}

#[test]
fn programming_a_key_and_saving_survives_a_power_cycle() {
    let mut rig = Rig::new(MemStore::new());

    rig.hold();
    assert_eq!(rig.device.mode(), Mode::Program);

    rig.click(); // page selector -> usage selection, seeded with 'a'
    rig.click(); // commit 'a' at slot 0
    assert_eq!(rig.device.list().len(), 1);

    rig.hold(); // back to the page selector
    assert_eq!(rig.device.mode(), Mode::Program);
    for _ in 0..3 {
        rig.turn(Direction::Clockwise); // Keyboard -> Consumer -> System -> Do
    }
    rig.click(); // usage selection, seeded with Delete

    // Press and turn anticlockwise: function nibble wraps 0x0 -> 0xF (Save).
    rig.inputs.set_pressed(true);
    rig.poll();
    rig.turn(Direction::Anticlockwise);
    rig.inputs.set_pressed(false);
    rig.poll(); // adjustment release, no commit

    rig.click(); // commit Do(Save): persists and leaves the menu
    assert_eq!(rig.device.mode(), Mode::Run);
    assert!(rig.drain_typed().contains("Saved in EEPROM"));

    // Power cycle onto the same store.
    let store = rig.device.store_mut().clone();
    let mut rig = Rig::new(store);
    assert_eq!(rig.device.list().len(), 1);
    rig.click();
    assert_eq!(rig.drain_typed(), "a");
}

#[test]
fn conditional_jumps_drive_a_loop() {
    let script = list_of(&[
        0xE003, // W = 3
        0x001B, // type 'x'
        0xE801, // W = W - 1
        0xE300, // compare W to 0
        0xF601, // jump to 1 while Plus or Minus (not zero)
    ]);
    let mut link = HostLink::new(FakeTransport::new());
    let inputs = InputRegisters::new();
    interp::play(
        &script,
        &mut Machine::new(),
        &mut link,
        &mut NoDelay,
        &mut MemStore::new(),
        &inputs,
    );
    assert_eq!(link.into_transport().typed_text(), "xxx");
}

#[test]
fn legacy_goto_jumps_to_an_absolute_address() {
    let script = list_of(&[0x0004, 0xD203, 0x0005, 0x0006]); // 'a', goto 3, 'b', 'c'
    let mut link = HostLink::new(FakeTransport::new());
    let inputs = InputRegisters::new();
    interp::play(
        &script,
        &mut Machine::new(),
        &mut link,
        &mut NoDelay,
        &mut MemStore::new(),
        &inputs,
    );
    assert_eq!(link.into_transport().typed_text(), "ac");
}

#[test]
fn legacy_goto_out_of_range_falls_through() {
    let script = list_of(&[0x0004, 0xD264]); // 'a', goto 100
    let mut link = HostLink::new(FakeTransport::new());
    let inputs = InputRegisters::new();
    interp::play(
        &script,
        &mut Machine::new(),
        &mut link,
        &mut NoDelay,
        &mut MemStore::new(),
        &inputs,
    );
    assert_eq!(link.into_transport().typed_text(), "a");
}

/// Presses the knob partway through playback, as the button task would.
struct CancellingDelay<'a> {
    inputs: &'a InputRegisters,
    calls_left: usize,
}

impl Delay for CancellingDelay<'_> {
    fn delay_ms(&mut self, _ms: u32) {
        if self.calls_left == 0 {
            self.inputs.set_pressed(true);
        } else {
            self.calls_left -= 1;
        }
    }
}

#[test]
fn playback_stops_on_a_press_and_releases_keys() {
    let script = list_of(&[0x0004, 0xEF0A, 0x0005]); // 'a', wait 10 s, 'b'
    let mut link = HostLink::new(FakeTransport::new());
    let inputs = InputRegisters::new();
    let mut delay = CancellingDelay {
        inputs: &inputs,
        calls_left: 3,
    };
    interp::play(
        &script,
        &mut Machine::new(),
        &mut link,
        &mut delay,
        &mut MemStore::new(),
        &inputs,
    );

    let t = link.into_transport();
    assert_eq!(t.typed_text(), "a"); // 'b' never happened
    let last = t.written.last().unwrap();
    assert_eq!(last.as_slice(), &[REPORT_ID_KEYBOARD, 0, 0, 0]);
}

#[test]
fn do_save_during_playback_persists_the_prefix() {
    let script = list_of(&[0x010B, 0x010C, 0xDF00]); // 'H', 'I', Do(Save)
    let mut link = HostLink::new(FakeTransport::new());
    let mut store = MemStore::new();
    let inputs = InputRegisters::new();
    interp::play(
        &script,
        &mut Machine::new(),
        &mut link,
        &mut NoDelay,
        &mut store,
        &inputs,
    );

    let saved = store::load(&store);
    assert_eq!(saved.len(), 2);
    assert_eq!(saved.get(0), Some(Action::decode(0x010B)));
    assert_eq!(link.into_transport().typed_text(), "HI");
}

#[test]
fn caps_lock_inverts_shift_for_letters() {
    // SHIFT+h then plain a, with the host's Caps Lock lit.
    let transport = FakeTransport::with_leds(0x02);
    let mut device = Device::new(transport, NoDelay, seeded_store(&[0x010B, 0x0004]));
    let inputs = InputRegisters::new();

    inputs.set_pressed(true);
    device.poll(&inputs); // latches the LED report
    inputs.set_pressed(false);
    device.poll(&inputs); // release plays the script

    let link = std::mem::replace(device.link_mut(), HostLink::new(FakeTransport::new()));
    let presses = link.into_transport().key_presses();
    assert_eq!(presses[0], (0, 0x0B)); // Shift suppressed: Caps already upper-cases
    assert_eq!(presses[1], (Modifiers::SHIFT.bits(), 0x04)); // Shift added to keep 'a' lower-case
}

#[test]
fn encoder_noise_nets_a_single_detent() {
    let mut decoder = QuadratureDecoder::new();
    let inputs = InputRegisters::new();
    // One clockwise detent with a chattering A contact.
    let samples = [
        (false, true),
        (false, true),
        (false, false),
        (false, false),
        (true, false),
        (true, true),
    ];
    for (a, b) in samples {
        if let Some(dir) = decoder.sample(a, b) {
            inputs.record_detent(dir);
        }
    }
    assert_eq!(inputs.take_rotation(), 1);
}

#[test]
fn consumer_page_steps_between_named_usages() {
    let mut rig = Rig::new(MemStore::new());
    rig.hold();
    rig.turn(Direction::Clockwise); // Keyboard -> Consumer Device
    rig.click(); // seed the first named consumer usage
    rig.turn(Direction::Clockwise); // step to the next named usage
    rig.click(); // commit

    let expected = tables::next_named_consumer(tables::FIRST_CONSUMER_USAGE);
    assert_eq!(
        rig.device.list().get(0),
        Some(Action::ConsumerDevice(expected))
    );

    // The scan wraps at both ends of the sparse table.
    let last = tables::prev_named_consumer(tables::FIRST_CONSUMER_USAGE);
    assert!(last > tables::FIRST_CONSUMER_USAGE);
    assert_eq!(tables::next_named_consumer(last), tables::FIRST_CONSUMER_USAGE);
}

#[test]
fn usage_selection_falls_back_to_the_page_selector_when_idle() {
    let mut rig = Rig::new(MemStore::new());
    rig.hold();
    rig.click(); // into usage selection

    for _ in 0..INACTIVITY_TICKS {
        rig.inputs.record_tick();
    }
    rig.poll();

    // The page-selector help line is typed on entry and again after the
    // fallback.
    let typed = rig.drain_typed();
    assert_eq!(typed.matches("Main:").count(), 2);
    assert_eq!(rig.device.mode(), Mode::Program);
}
