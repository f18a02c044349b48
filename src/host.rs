//! The feedback channel to the host.
//!
//! The device has no display of its own. All status text is "said" by
//! typing it on the host as synthetic keystrokes, and the editor view
//! is manipulated through an ordinary text editor's navigation keys
//! (Ctrl+Home, Shift+End, arrows and so on). This module owns the
//! transport handle, tracks host LED state, and implements the say and
//! editor primitives everything above it is built from.

use crate::action::Modifiers;
use crate::config::{USB_WRITE_BACKOFF_MAX_MS, USB_WRITE_BACKOFF_MS};
use crate::hid::keyboard::{keys, KeyboardReport};
use crate::hid::{
    ConsumerReport, HidTransport, LedIndicators, SystemControlReport, REPORT_ID_KEYBOARD,
};
use crate::hid::{keymap, MAX_REPORT_SIZE};

/// Synthetic keyboard, consumer and system control output plus host LED
/// tracking, over any [`HidTransport`].
pub struct HostLink<T: HidTransport> {
    transport: T,
    leds: LedIndicators,
}

impl<T: HidTransport> HostLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            leds: LedIndicators::default(),
        }
    }

    pub fn leds(&self) -> LedIndicators {
        self.leds
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Drain pending output reports and latch the most recent LED state.
    pub fn poll_leds(&mut self) {
        let mut buf = [0u8; MAX_REPORT_SIZE];
        while let Some(n) = self.transport.read_report(&mut buf) {
            if n >= 2 && buf[0] == REPORT_ID_KEYBOARD {
                self.leds = LedIndicators::from_bits(buf[1]);
            }
        }
    }

    /// Send one report, retrying for as long as the transport refuses
    /// it. The pause between attempts doubles up to a fixed ceiling so
    /// a suspended or detached host costs sleeps, not a busy spin.
    fn write(&mut self, report: &[u8]) {
        let mut backoff = USB_WRITE_BACKOFF_MS;
        while !self.transport.write_report(report) {
            self.transport.backoff_ms(backoff);
            backoff = (backoff * 2).min(USB_WRITE_BACKOFF_MAX_MS);
        }
    }

    fn send_keyboard(&mut self, report: KeyboardReport) {
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let n = report.serialize(&mut buf);
        self.write(&buf[..n]);
    }

    /// Press and release one key.
    ///
    /// For alphabetic keys the Shift modifier is XORed with the host's
    /// Caps Lock LED, so "say" output reads the same regardless of the
    /// host's lock state.
    pub fn keystroke(&mut self, mods: Modifiers, key: u8) {
        let mods = self.caps_adjusted(mods, key);
        self.send_keyboard(KeyboardReport::pressed(mods, key));
        self.send_keyboard(KeyboardReport::release());
    }

    fn caps_adjusted(&self, mods: Modifiers, key: u8) -> Modifiers {
        let alphabetic = (0x04..=0x1D).contains(&key);
        if !alphabetic {
            return mods;
        }
        let want_shift = mods.contains(Modifiers::SHIFT);
        if want_shift != self.leds.caps_lock() {
            mods.with(Modifiers::SHIFT)
        } else {
            Modifiers::from_nibble(mods.bits() & !Modifiers::SHIFT.bits())
        }
    }

    /// Release all keys and modifiers.
    pub fn release_keys(&mut self) {
        self.send_keyboard(KeyboardReport::release());
    }

    /// Tap a consumer device usage (press then release).
    pub fn consumer_tap(&mut self, usage: u16) {
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let n = ConsumerReport::pressed(usage).serialize(&mut buf);
        self.write(&buf[..n]);
        let n = ConsumerReport::release().serialize(&mut buf);
        self.write(&buf[..n]);
    }

    /// Tap a system control usage (press then release).
    pub fn system_tap(&mut self, usage: u8) {
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let n = SystemControlReport::pressed(usage).serialize(&mut buf);
        self.write(&buf[..n]);
        let n = SystemControlReport::release().serialize(&mut buf);
        self.write(&buf[..n]);
    }

    /// Type one ASCII character.
    pub fn say_char(&mut self, ch: u8) {
        let (key, shifted) = keymap::usage_for_ascii(ch);
        let mods = if shifted { Modifiers::SHIFT } else { Modifiers::NONE };
        self.keystroke(mods, key);
    }

    /// Type a string.
    pub fn say(&mut self, text: &str) {
        for &b in text.as_bytes() {
            self.say_char(b);
        }
    }

    /// Type a byte as two upper-case hex digits.
    pub fn say_hex(&mut self, value: u8) {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";
        self.say_char(HEX[(value >> 4) as usize]);
        self.say_char(HEX[(value & 0x0F) as usize]);
    }

    /// Type a byte as unsigned decimal, no leading zeroes.
    pub fn say_dec(&mut self, value: u8) {
        let mut digits = [0u8; 3];
        let mut n = 0;
        let mut v = value;
        loop {
            digits[n] = b'0' + v % 10;
            n += 1;
            v /= 10;
            if v == 0 {
                break;
            }
        }
        while n > 0 {
            n -= 1;
            self.say_char(digits[n]);
        }
    }

    /// Type a byte as signed decimal with an explicit sign.
    pub fn say_signed(&mut self, value: u8) {
        let v = value as i8;
        if v < 0 {
            self.say_char(b'-');
            self.say_dec((v as i16).unsigned_abs() as u8);
        } else {
            self.say_char(b'+');
            self.say_dec(v as u8);
        }
    }

    // Editor protocol. The host is assumed to have a plain text editor
    // focused; these primitives drive its cursor and selection.

    /// Select the whole document.
    pub fn select_all(&mut self) {
        self.keystroke(Modifiers::CTL, keys::HOME);
        self.keystroke(Modifiers::CTL.with(Modifiers::SHIFT), keys::END);
    }

    /// Delete everything.
    pub fn clear_display(&mut self) {
        self.select_all();
        self.keystroke(Modifiers::NONE, keys::DELETE);
    }

    /// Put the cursor at the start of line `n` (1-based).
    pub fn goto_line(&mut self, n: u8) {
        self.keystroke(Modifiers::CTL, keys::HOME);
        for _ in 1..n {
            self.keystroke(Modifiers::NONE, keys::DOWN);
        }
    }

    /// Select line `n` (1-based) so the next say overwrites it.
    pub fn select_line(&mut self, n: u8) {
        self.goto_line(n);
        self.keystroke(Modifiers::SHIFT, keys::END);
    }

    /// Extend the selection back to the start of the current line.
    pub fn highlight_to_home(&mut self) {
        self.keystroke(Modifiers::SHIFT, keys::HOME);
    }

    /// Remove the last line of the document, newline included.
    pub fn delete_last_line(&mut self) {
        self.keystroke(Modifiers::CTL, keys::END);
        self.keystroke(Modifiers::SHIFT, keys::HOME);
        self.keystroke(Modifiers::NONE, keys::DELETE);
        self.keystroke(Modifiers::NONE, keys::BACKSPACE);
    }

    /// Open a fresh line and park the cursor at its start.
    pub fn new_line(&mut self) {
        self.keystroke(Modifiers::NONE, keys::ENTER);
        self.keystroke(Modifiers::NONE, keys::HOME);
    }
}
