//! Programming mode: composing and editing the recorded script.
//!
//! The whole user interface is a text document on the host, driven
//! through [`HostLink`]. Line 1 carries the banner, line 2 the help
//! text for the current focus, line 3 the pending selection, and the
//! recorded actions are listed from line 6 down. The knob either
//! selects a page (`FocusOnPage`) or a usage within that page
//! (`FocusOnUsage`); pressing while turning adjusts the secondary
//! dimension of whichever focus is active.
//!
//! Unlike the playback path this controller is purely event-driven:
//! the device loop drains the input registers and feeds one [`Event`]
//! at a time, including a [`Event::Tick`] heartbeat that drives the
//! long-press and inactivity countdowns.

use crate::action::{Action, ActionList, LocalFn, Modifiers, Opcode, cond, page};
use crate::config::{
    FIRST_ACTION_LINE, INACTIVITY_TICKS, INFO_LINE, LONG_PRESS_TICKS, SELECTION_LINE, VERSION,
};
use crate::hid::keyboard::keys;
use crate::hid::HidTransport;
use crate::host::HostLink;
use crate::interp::SayFormat;
use crate::store::{self, ByteStore};
use crate::tables;

/// One input event, as drained from the input registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Net knob rotation since the last drain; only the sign matters.
    Turned(i8),
    Pressed,
    Released,
    /// One foreground timer tick.
    Tick,
}

/// Whether the controller is still editing after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Editing,
    /// Programming mode ended; the device returns to run mode.
    Exited,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Focus {
    OnPage,
    OnUsage,
}

/// The programming-mode state machine.
pub struct Controller {
    focus: Focus,
    /// The action being composed, kept packed so nibble adjustments
    /// work uniformly across pages.
    pending: u16,
    pressed: bool,
    turned_while_pressed: bool,
    long_press_fired: bool,
    long_press_left: u16,
    inactivity_left: u16,
}

/// The seed shown when the menu opens: key 'a', no modifiers.
const PENDING_SEED: u16 = 0x0004;

impl Controller {
    pub const fn new() -> Self {
        Self {
            focus: Focus::OnPage,
            pending: PENDING_SEED,
            pressed: false,
            turned_while_pressed: false,
            long_press_fired: false,
            long_press_left: 0,
            inactivity_left: 0,
        }
    }

    fn pending_page(&self) -> u8 {
        (self.pending >> 12) as u8
    }

    fn pending_nibble(&self) -> u8 {
        ((self.pending >> 8) & 0x0F) as u8
    }

    fn pending_low(&self) -> u8 {
        (self.pending & 0xFF) as u8
    }

    fn set_pending_page(&mut self, pg: u8) {
        self.pending = (self.pending & 0x0FFF) | ((pg as u16 & 0x0F) << 12);
    }

    fn set_pending_nibble(&mut self, n: u8) {
        self.pending = (self.pending & 0xF0FF) | ((n as u16 & 0x0F) << 8);
    }

    fn set_pending_low(&mut self, b: u8) {
        self.pending = (self.pending & 0xFF00) | b as u16;
    }

    fn pending_usage12(&self) -> u16 {
        self.pending & 0x0FFF
    }

    fn set_pending_usage12(&mut self, usage: u16) {
        self.pending = (self.pending & 0xF000) | (usage & 0x0FFF);
    }

    /// Redraw the whole menu and reset the focus to page selection.
    pub fn enter<T: HidTransport>(&mut self, list: &ActionList, link: &mut HostLink<T>) {
        link.clear_display();
        link.say("PUB! Programmable USB Button v");
        link.say(VERSION);
        for _ in 0..4 {
            link.new_line();
        }
        link.say("At Code Action");
        self.say_actions(list, link);
        self.pending = PENDING_SEED;
        self.say_page(list, link);
        self.set_focus(Focus::OnPage, link);
    }

    /// Consume one event. `Status::Exited` means the caller should
    /// leave programming mode.
    pub fn step<T: HidTransport, S: ByteStore>(
        &mut self,
        event: Event,
        list: &mut ActionList,
        link: &mut HostLink<T>,
        store: &mut S,
    ) -> Status {
        if !matches!(event, Event::Tick) {
            self.inactivity_left = INACTIVITY_TICKS;
        }
        match event {
            Event::Turned(delta) if delta != 0 => self.on_turn(delta > 0, list, link),
            Event::Turned(_) => {}
            Event::Pressed => {
                self.pressed = true;
                self.turned_while_pressed = false;
                self.long_press_fired = false;
                self.long_press_left = LONG_PRESS_TICKS;
            }
            Event::Released => {
                self.pressed = false;
                if !self.long_press_fired {
                    return self.on_short_release(list, link, store);
                }
            }
            Event::Tick => return self.on_tick(list, link),
        }
        Status::Editing
    }

    fn on_turn<T: HidTransport>(
        &mut self,
        clockwise: bool,
        list: &mut ActionList,
        link: &mut HostLink<T>,
    ) {
        if self.pressed {
            self.turned_while_pressed = true;
            match self.focus {
                Focus::OnPage => {
                    // Move the focused slot; anticlockwise from 0 wraps
                    // to the append position.
                    let focus = list.focus();
                    if clockwise {
                        if (focus as usize) < list.len() {
                            list.set_focus(focus + 1);
                        }
                    } else if focus > 0 {
                        list.set_focus(focus - 1);
                    } else if !list.is_empty() {
                        list.set_focus(list.len() as u8);
                    }
                    self.say_page(list, link);
                }
                Focus::OnUsage => {
                    self.adjust_secondary(clockwise);
                    link.select_line(SELECTION_LINE);
                    self.say_pending(list, link);
                }
            }
        } else {
            match self.focus {
                Focus::OnPage => {
                    let pg = self.pending_page();
                    self.set_pending_page(if clockwise {
                        tables::next_page(pg)
                    } else {
                        tables::prev_page(pg)
                    });
                    self.say_page(list, link);
                }
                Focus::OnUsage => {
                    self.select_adjacent_usage(clockwise);
                    link.select_line(SELECTION_LINE);
                    self.say_pending(list, link);
                    link.highlight_to_home();
                }
            }
        }
    }

    /// Press+turn adjusts the secondary dimension of the pending action.
    fn adjust_secondary(&mut self, clockwise: bool) {
        match self.pending_page() {
            // Modifier mask, local function, opcode or jump condition.
            page::KEYBOARD | page::DO | page::EXECUTE | page::JUMP => {
                let n = self.pending_nibble();
                self.set_pending_nibble(if clockwise {
                    n.wrapping_add(1)
                } else {
                    n.wrapping_sub(1)
                });
            }
            page::CONSUMER_DEVICE => {
                let u = self.pending_usage12();
                self.set_pending_usage12(if clockwise {
                    u.wrapping_add(1)
                } else {
                    u.wrapping_sub(1)
                });
            }
            _ => {
                let b = self.pending_low();
                self.set_pending_low(if clockwise {
                    b.wrapping_add(1)
                } else {
                    b.wrapping_sub(1)
                });
            }
        }
    }

    /// Plain turn steps the primary usage of the pending action. The
    /// consumer and system pages land only on named usages.
    fn select_adjacent_usage(&mut self, clockwise: bool) {
        match self.pending_page() {
            page::CONSUMER_DEVICE => {
                let u = self.pending_usage12();
                self.set_pending_usage12(if clockwise {
                    tables::next_named_consumer(u)
                } else {
                    tables::prev_named_consumer(u)
                });
            }
            page::SYSTEM_CONTROL => {
                let u = self.pending_low();
                self.set_pending_low(if clockwise {
                    tables::next_named_system(u)
                } else {
                    tables::prev_named_system(u)
                });
            }
            _ => {
                let b = self.pending_low();
                self.set_pending_low(if clockwise {
                    b.wrapping_add(1)
                } else {
                    b.wrapping_sub(1)
                });
            }
        }
    }

    fn on_tick<T: HidTransport>(&mut self, list: &ActionList, link: &mut HostLink<T>) -> Status {
        if self.pressed && !self.turned_while_pressed && !self.long_press_fired {
            if self.long_press_left > 0 {
                self.long_press_left -= 1;
            }
            if self.long_press_left == 0 {
                self.long_press_fired = true;
                match self.focus {
                    Focus::OnPage => {
                        // Leave programming mode without touching the store.
                        link.clear_display();
                        link.say("Not saved in EEPROM");
                        link.highlight_to_home();
                        return Status::Exited;
                    }
                    Focus::OnUsage => {
                        self.set_focus(Focus::OnPage, link);
                        self.say_page(list, link);
                    }
                }
            }
        } else if !self.pressed && self.focus == Focus::OnUsage {
            if self.inactivity_left > 0 {
                self.inactivity_left -= 1;
            }
            if self.inactivity_left == 0 {
                self.inactivity_left = INACTIVITY_TICKS;
                self.set_focus(Focus::OnPage, link);
                self.say_page(list, link);
            }
        }
        Status::Editing
    }

    fn on_short_release<T: HidTransport, S: ByteStore>(
        &mut self,
        list: &mut ActionList,
        link: &mut HostLink<T>,
        store: &mut S,
    ) -> Status {
        match self.focus {
            Focus::OnPage => {
                // Entering usage selection always starts from the
                // page's first sensible usage, turned or not.
                self.seed_first_usage();
                self.set_focus(Focus::OnUsage, link);
                self.say_pending(list, link);
                Status::Editing
            }
            Focus::OnUsage => {
                if self.turned_while_pressed {
                    // Adjustment gesture; nothing to commit.
                    return Status::Editing;
                }
                self.commit(list, link, store)
            }
        }
    }

    fn seed_first_usage(&mut self) {
        match self.pending_page() {
            page::KEYBOARD => {
                self.set_pending_nibble(0);
                self.set_pending_low(0x04); // the key 'a'
            }
            page::CONSUMER_DEVICE => self.set_pending_usage12(tables::FIRST_CONSUMER_USAGE),
            page::SYSTEM_CONTROL => self.set_pending_usage12(tables::FIRST_SYSTEM_USAGE as u16),
            _ => self.set_pending_usage12(0),
        }
    }

    fn commit<T: HidTransport, S: ByteStore>(
        &mut self,
        list: &mut ActionList,
        link: &mut HostLink<T>,
        store: &mut S,
    ) -> Status {
        if self.pending_page() == page::DO {
            return self.run_local_fn(list, link, store);
        }

        let slot = list.focus() as usize;
        let action = Action::decode(self.pending);
        if slot >= list.len() {
            // Appending a new action at the end of the listing.
            if list.push(action).is_err() {
                return Status::Editing; // script is full
            }
            link.keystroke(Modifiers::CTL, keys::END);
            link.new_line();
            self.say_action(list, slot, link);
        } else {
            list.set(slot, action);
            link.select_line(FIRST_ACTION_LINE + slot as u8);
            self.say_action(list, slot, link);
        }
        list.set_focus(slot as u8 + 1);
        link.select_line(SELECTION_LINE);
        self.say_pending(list, link);
        link.select_line(SELECTION_LINE);
        Status::Editing
    }

    fn run_local_fn<T: HidTransport, S: ByteStore>(
        &mut self,
        list: &mut ActionList,
        link: &mut HostLink<T>,
        store: &mut S,
    ) -> Status {
        match LocalFn::from_nibble(self.pending_nibble()) {
            Some(LocalFn::Delete) => {
                self.delete_action(self.pending_low(), list, link);
                Status::Editing
            }
            Some(LocalFn::Save) => {
                store::save_list(store, list);
                link.clear_display();
                link.say("Saved in EEPROM");
                link.highlight_to_home();
                Status::Exited
            }
            Some(LocalFn::Load) => {
                *list = store::load(store);
                link.clear_display();
                link.say("Reloaded from EEPROM");
                link.highlight_to_home();
                Status::Exited
            }
            Some(LocalFn::Redisplay) => {
                self.enter(list, link);
                Status::Editing
            }
            // Legacy playback-only functions and unassigned nibbles.
            _ => Status::Editing,
        }
    }

    fn delete_action<T: HidTransport>(
        &mut self,
        n: u8,
        list: &mut ActionList,
        link: &mut HostLink<T>,
    ) {
        if list.is_empty() {
            return;
        }
        let n = (n as usize).min(list.len() - 1);
        if n == list.len() - 1 {
            list.remove(n);
            list.set_focus(list.len() as u8);
            link.delete_last_line();
        } else {
            list.remove(n);
            list.set_focus(list.len() as u8);
            // Rewrite the listing from the deleted row down.
            link.goto_line(FIRST_ACTION_LINE + n as u8);
            link.keystroke(Modifiers::CTL.with(Modifiers::SHIFT), keys::END);
            link.keystroke(Modifiers::NONE, keys::DELETE);
            link.keystroke(Modifiers::SHIFT, keys::LEFT);
            for i in n..list.len() {
                link.new_line();
                self.say_action(list, i, link);
            }
        }
        link.select_line(SELECTION_LINE);
    }

    fn set_focus<T: HidTransport>(&mut self, focus: Focus, link: &mut HostLink<T>) {
        self.focus = focus;
        self.inactivity_left = INACTIVITY_TICKS;
        link.select_line(INFO_LINE);
        if focus == Focus::OnPage {
            link.say("Main:   Turn=Select, Press=OK, Press+Turn=Set At, Press+Hold=Exit");
        } else {
            link.say(match self.pending_page() {
                page::KEYBOARD => "Key:    Turn=Select, Press+Turn=Modify",
                page::SYSTEM_CONTROL => "System: Turn=Select",
                page::CONSUMER_DEVICE => "Cons:   Turn=Select",
                page::DO => "Do:     Turn=Modify, Press+Turn=Select",
                page::EXECUTE => "Exec:   Turn=Modify, Press+Turn=Select",
                page::JUMP => "Jump:   Turn=Modify, Press+Turn=Select",
                _ => "",
            });
            link.say(", Press=OK, Press+Hold=Return");
        }
        link.select_line(SELECTION_LINE);
    }

    fn say_page<T: HidTransport>(&self, list: &ActionList, link: &mut HostLink<T>) {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";
        let pg = self.pending_page();
        link.select_line(SELECTION_LINE);
        link.say("   ");
        link.say_char(HEX[pg as usize]);
        link.say("    ");
        link.say(tables::page_name(pg));
        if !tables::page_name(pg).is_empty() {
            link.say(" at ");
            link.say_hex(list.focus());
        }
        link.highlight_to_home();
    }

    fn say_pending<T: HidTransport>(&mut self, list: &ActionList, link: &mut HostLink<T>) {
        // Delete's operand is clamped before display so the row shown
        // is the row that would be deleted.
        if self.pending_page() == page::DO
            && LocalFn::from_nibble(self.pending_nibble()) == Some(LocalFn::Delete)
            && !list.is_empty()
            && self.pending_low() as usize >= list.len()
        {
            self.set_pending_low(list.len() as u8 - 1);
        }
        say_usage(list.focus(), self.pending, list.len() as u8, link);
    }

    fn say_action<T: HidTransport>(&self, list: &ActionList, index: usize, link: &mut HostLink<T>) {
        if let Some(action) = list.get(index) {
            say_usage(index as u8, action.encode(), list.len() as u8, link);
        }
    }

    fn say_actions<T: HidTransport>(&self, list: &ActionList, link: &mut HostLink<T>) {
        link.keystroke(Modifiers::CTL, keys::END);
        for i in 0..list.len() {
            link.new_line();
            self.say_action(list, i, link);
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

/// Type one action row: "aa pnuu description".
///
/// `aa` is the row number, `pn` the page and secondary nibble, `uu` the
/// low operand byte. `Do` rows hide the code so local functions read as
/// commands, not recordable actions.
fn say_usage<T: HidTransport>(row: u8, word: u16, count: u8, link: &mut HostLink<T>) {
    let pg = (word >> 12) as u8;
    let nibble = ((word >> 8) & 0x0F) as u8;
    let low = (word & 0xFF) as u8;

    if pg == page::DO {
        link.say("        ");
    } else {
        link.say_hex(row);
        link.say_char(b' ');
        link.say_hex(pg << 4 | nibble);
        link.say_hex(low);
        link.say_char(b' ');
    }

    match Action::decode(word) {
        Action::Keyboard { mods, key } => {
            if mods.contains(Modifiers::GUI) {
                link.say("GUI+");
            }
            if mods.contains(Modifiers::CTL) {
                link.say("CTL+");
            }
            if mods.contains(Modifiers::ALT) {
                link.say("ALT+");
            }
            if mods.contains(Modifiers::SHIFT) {
                link.say("SHIFT+");
            }
            link.say(tables::key_name(key, mods.contains(Modifiers::SHIFT)));
        }
        Action::ConsumerDevice(usage) => link.say(tables::consumer_name(usage)),
        Action::SystemControl(usage) => link.say(tables::system_name(usage)),
        Action::Jump { mask, addr } => {
            link.say(tables::jump_name(mask));
            if mask == cond::RELATIVE {
                link.say(" by ");
                link.say_signed(addr);
            } else {
                link.say(" to ");
                link.say_hex(addr);
            }
        }
        Action::Execute(op, operand) => {
            link.say(tables::opcode_name(op));
            match op {
                Opcode::WaitSec => {
                    link.say_dec(operand);
                    link.say(" sec");
                }
                Opcode::WaitMs => {
                    link.say_dec(operand);
                    link.say(" ms");
                }
                Opcode::Format => link.say(match SayFormat::from_operand(operand) {
                    SayFormat::Char => "Char",
                    SayFormat::Dec => "Decimal",
                    SayFormat::Hex => "Hex",
                }),
                _ => link.say_hex(operand),
            }
        }
        Action::Do(f, operand) => {
            link.say(tables::local_fn_name(f));
            if f == LocalFn::Delete && count > 0 {
                link.say(" at ");
                link.say_hex(operand);
            }
        }
        Action::Reserved(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeTransport;
    use crate::store::MemStore;

    struct Rig {
        ctl: Controller,
        list: ActionList,
        link: HostLink<FakeTransport>,
        store: MemStore,
    }

    impl Rig {
        fn new() -> Self {
            let mut rig = Self {
                ctl: Controller::new(),
                list: ActionList::new(),
                link: HostLink::new(FakeTransport::new()),
                store: MemStore::new(),
            };
            rig.ctl.enter(&rig.list, &mut rig.link);
            rig
        }

        fn step(&mut self, event: Event) -> Status {
            self.ctl
                .step(event, &mut self.list, &mut self.link, &mut self.store)
        }

        /// A press-and-release without any turn or long-press ticks.
        fn click(&mut self) -> Status {
            self.step(Event::Pressed);
            self.step(Event::Released)
        }

        fn long_press(&mut self) -> Status {
            self.step(Event::Pressed);
            let mut last = Status::Editing;
            for _ in 0..LONG_PRESS_TICKS {
                last = self.step(Event::Tick);
                if last == Status::Exited {
                    return last;
                }
            }
            self.step(Event::Released);
            last
        }

        fn drain_text(&mut self) -> String {
            let link = core::mem::replace(&mut self.link, HostLink::new(FakeTransport::new()));
            link.into_transport().typed_text()
        }
    }

    #[test]
    fn menu_banner_lists_existing_actions() {
        let mut rig = Rig::new();
        rig.list.push(Action::decode(0x010B)).unwrap(); // SHIFT+h
        rig.ctl.enter(&rig.list, &mut rig.link);
        let text = rig.drain_text();
        assert!(text.contains("PUB! Programmable USB Button v"));
        assert!(text.contains("At Code Action"));
        assert!(text.contains("00 010B SHIFT+H"));
    }

    #[test]
    fn click_on_page_enters_usage_selection_with_first_usage() {
        let mut rig = Rig::new();
        rig.drain_text();
        assert_eq!(rig.click(), Status::Editing);
        let text = rig.drain_text();
        // Keyboard page seeds the key 'a' with no modifiers.
        assert!(text.contains("00 0004 a"), "text was: {text}");
    }

    #[test]
    fn committing_a_keystroke_appends_and_advances() {
        let mut rig = Rig::new();
        rig.click(); // page -> usage
        assert_eq!(rig.click(), Status::Editing); // commit 'a'
        assert_eq!(rig.list.len(), 1);
        assert_eq!(
            rig.list.get(0),
            Some(Action::Keyboard {
                mods: Modifiers::NONE,
                key: 0x04
            })
        );
        assert_eq!(rig.list.focus(), 1);
    }

    #[test]
    fn turning_selects_the_next_key() {
        let mut rig = Rig::new();
        rig.click();
        rig.step(Event::Turned(1)); // 'a' -> 'b'
        rig.click();
        assert_eq!(
            rig.list.get(0),
            Some(Action::Keyboard {
                mods: Modifiers::NONE,
                key: 0x05
            })
        );
    }

    #[test]
    fn press_and_turn_adds_a_modifier() {
        let mut rig = Rig::new();
        rig.click();
        rig.step(Event::Pressed);
        rig.step(Event::Turned(1)); // modifier nibble 0 -> 1 (Shift)
        rig.step(Event::Released); // adjustment, not a commit
        assert_eq!(rig.list.len(), 0);
        rig.click(); // now commit SHIFT+a
        assert_eq!(
            rig.list.get(0),
            Some(Action::Keyboard {
                mods: Modifiers::SHIFT,
                key: 0x04
            })
        );
    }

    #[test]
    fn page_rotation_skips_reserved_pages() {
        let mut rig = Rig::new();
        rig.step(Event::Turned(1)); // Keyboard -> ConsumerDevice
        rig.step(Event::Turned(1)); // -> SystemControl
        rig.step(Event::Turned(1)); // -> Do
        rig.click(); // enter Do page usage selection
        // Secondary nibble selects the local function; 15 turns lands
        // on Save (nibble 0xF).
        rig.step(Event::Pressed);
        rig.step(Event::Turned(-1)); // nibble 0 -> 0xF
        rig.step(Event::Released);
        assert_eq!(rig.click(), Status::Exited); // Save exits
        let loaded = store::load(&rig.store);
        assert!(loaded.is_empty());
    }

    #[test]
    fn consumer_selection_lands_on_named_usages() {
        let mut rig = Rig::new();
        rig.step(Event::Turned(1)); // -> ConsumerDevice page
        rig.click();
        // Seeded at Ch+ (0x9D); one step forward is Ch- (0x9E), then
        // Play (0xB0) across the unnamed gap.
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1));
        rig.click();
        assert_eq!(rig.list.get(0), Some(Action::ConsumerDevice(0x0B0)));
    }

    #[test]
    fn system_selection_wraps() {
        let mut rig = Rig::new();
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1)); // -> SystemControl page
        rig.click(); // seeds Power Down (1)
        rig.step(Event::Turned(-1)); // wraps to Warm Restart (14)
        rig.click();
        assert_eq!(rig.list.get(0), Some(Action::SystemControl(14)));
    }

    #[test]
    fn long_press_on_page_exits_without_saving() {
        let mut rig = Rig::new();
        rig.drain_text();
        assert_eq!(rig.long_press(), Status::Exited);
        assert!(rig.drain_text().contains("Not saved in EEPROM"));
    }

    #[test]
    fn long_press_on_usage_returns_to_page() {
        let mut rig = Rig::new();
        rig.click(); // -> usage
        rig.drain_text();
        assert_eq!(rig.long_press(), Status::Editing);
        // Now a long press exits, proving focus is back on the page.
        assert_eq!(rig.long_press(), Status::Exited);
    }

    #[test]
    fn inactivity_returns_focus_to_page() {
        let mut rig = Rig::new();
        rig.click(); // -> usage
        for _ in 0..INACTIVITY_TICKS {
            assert_eq!(rig.step(Event::Tick), Status::Editing);
        }
        // Focus fell back: a long press now exits instead of returning.
        assert_eq!(rig.long_press(), Status::Exited);
    }

    #[test]
    fn activity_resets_the_inactivity_countdown() {
        let mut rig = Rig::new();
        rig.click();
        for _ in 0..INACTIVITY_TICKS - 1 {
            rig.step(Event::Tick);
        }
        rig.step(Event::Turned(1)); // resets the countdown
        rig.step(Event::Tick);
        // Still in usage selection: long press returns rather than exits.
        assert_eq!(rig.long_press(), Status::Editing);
    }

    #[test]
    fn save_persists_and_exits() {
        let mut rig = Rig::new();
        rig.click();
        rig.click(); // commit 'a'
        rig.long_press(); // back to page focus
        // Navigate to the Do page.
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1));
        rig.click();
        rig.step(Event::Pressed);
        rig.step(Event::Turned(-1)); // local fn nibble -> 0xF (Save)
        rig.step(Event::Released);
        rig.drain_text();
        assert_eq!(rig.click(), Status::Exited);
        assert!(rig.drain_text().contains("Saved in EEPROM"));

        let loaded = store::load(&rig.store);
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.get(0),
            Some(Action::Keyboard {
                mods: Modifiers::NONE,
                key: 0x04
            })
        );
    }

    #[test]
    fn load_replaces_the_working_list_and_exits() {
        let mut rig = Rig::new();
        // Seed the store with one action.
        let mut saved = ActionList::new();
        saved.push(Action::decode(0x0105)).unwrap();
        store::save_list(&mut rig.store, &saved);

        rig.click();
        rig.click(); // commit a working-list action
        rig.long_press();
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1)); // -> Do
        rig.click();
        rig.step(Event::Pressed);
        rig.step(Event::Turned(-1));
        rig.step(Event::Turned(-1)); // nibble -> 0xE (Load)
        rig.step(Event::Released);
        rig.drain_text();
        assert_eq!(rig.click(), Status::Exited);
        assert!(rig.drain_text().contains("Reloaded from EEPROM"));
        assert_eq!(rig.list.len(), 1);
        assert_eq!(rig.list.get(0), Some(Action::decode(0x0105)));
    }

    #[test]
    fn delete_clamps_to_the_last_action() {
        let mut rig = Rig::new();
        rig.list.push(Action::decode(0x0104)).unwrap();
        rig.list.push(Action::decode(0x0105)).unwrap();
        rig.list.set_focus(2);

        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1)); // -> Do page; Delete is nibble 0
        rig.click();
        // Operand defaults to 0... turn it far past the end.
        for _ in 0..9 {
            rig.step(Event::Turned(1));
        }
        rig.click(); // Delete clamps to index 1
        assert_eq!(rig.list.len(), 1);
        assert_eq!(rig.list.get(0), Some(Action::decode(0x0104)));
    }

    #[test]
    fn delete_in_the_middle_compacts_the_list() {
        let mut rig = Rig::new();
        for w in [0x0104u16, 0x0105, 0x0106] {
            rig.list.push(Action::decode(w)).unwrap();
        }
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1)); // -> Do
        rig.click(); // Delete at 0
        rig.click();
        assert_eq!(rig.list.len(), 2);
        assert_eq!(rig.list.get(0), Some(Action::decode(0x0105)));
        assert_eq!(rig.list.get(1), Some(Action::decode(0x0106)));
        assert_eq!(rig.list.focus(), 2);
    }

    #[test]
    fn overwrite_then_auto_advance() {
        let mut rig = Rig::new();
        rig.list.push(Action::decode(0x0104)).unwrap();
        rig.list.push(Action::decode(0x0105)).unwrap();
        rig.list.set_focus(0);

        rig.click(); // usage selection at slot 0
        rig.step(Event::Turned(1)); // 'a' -> 'b'
        rig.click(); // overwrite slot 0
        assert_eq!(rig.list.get(0), Some(Action::decode(0x0005)));
        assert_eq!(rig.list.len(), 2);
        assert_eq!(rig.list.focus(), 1);
    }

    #[test]
    fn press_and_turn_on_page_moves_the_slot() {
        let mut rig = Rig::new();
        rig.list.push(Action::decode(0x0104)).unwrap();
        rig.list.push(Action::decode(0x0105)).unwrap();
        rig.list.set_focus(2);

        rig.step(Event::Pressed);
        rig.step(Event::Turned(-1));
        rig.step(Event::Turned(-1));
        rig.step(Event::Released); // focus now 0; release still enters usage mode
        rig.step(Event::Turned(1)); // 'a' -> 'b'
        rig.click(); // overwrite slot 0
        assert_eq!(rig.list.get(0), Some(Action::decode(0x0005)));
    }

    #[test]
    fn anticlockwise_from_slot_zero_wraps_to_append() {
        let mut rig = Rig::new();
        rig.list.push(Action::decode(0x0104)).unwrap();
        rig.list.set_focus(0);

        rig.step(Event::Pressed);
        rig.step(Event::Turned(-1)); // 0 wraps to len
        rig.step(Event::Released);
        assert_eq!(rig.list.focus(), 1);
    }

    #[test]
    fn full_list_refuses_appends() {
        let mut rig = Rig::new();
        for _ in 0..crate::config::MAX_ACTIONS {
            rig.list.push(Action::decode(0x0004)).unwrap();
        }
        rig.list.set_focus(crate::config::MAX_ACTIONS as u8);
        rig.click();
        rig.click(); // append refused, still editing
        assert_eq!(rig.list.len(), crate::config::MAX_ACTIONS);
        assert_eq!(rig.list.focus(), crate::config::MAX_ACTIONS as u8);
    }

    #[test]
    fn redisplay_redraws_the_menu() {
        let mut rig = Rig::new();
        rig.list.push(Action::decode(0x010B)).unwrap();
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1));
        rig.step(Event::Turned(1)); // -> Do
        rig.click();
        rig.step(Event::Pressed);
        rig.step(Event::Turned(1)); // nibble 0 -> 1 (Redisplay)
        rig.step(Event::Released);
        rig.drain_text();
        assert_eq!(rig.click(), Status::Editing);
        let text = rig.drain_text();
        assert!(text.contains("PUB! Programmable USB Button v"));
        assert!(text.contains("00 010B SHIFT+H"));
    }
}
