//! Keyboard HID report.
//!
//! Layout (4 bytes, report ID included):
//! ```text
//! Byte 0: Report ID ('K')
//! Byte 1: Modifier bitfield
//!         Bit 0 = Left Shift, Bit 1 = Left Ctrl,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI
//! Byte 2: Reserved (0x00)
//! Byte 3: Key code (one key at a time)
//! ```
//!
//! A single key slot is enough: scripted playback presses and releases
//! one key per action, never chords beyond the modifiers.

use super::REPORT_ID_KEYBOARD;
use crate::action::Modifiers;

/// Keyboard report size in bytes, report ID included.
pub const KEYBOARD_REPORT_SIZE: usize = 4;

/// Key codes used by the feedback channel and the editor protocol.
pub mod keys {
    pub const ENTER: u8 = 0x28;
    pub const BACKSPACE: u8 = 0x2A;
    pub const SPACE: u8 = 0x2C;
    pub const CAPS_LOCK: u8 = 0x39;
    pub const HOME: u8 = 0x4A;
    pub const DELETE: u8 = 0x4C;
    pub const END: u8 = 0x4D;
    pub const RIGHT: u8 = 0x4F;
    pub const LEFT: u8 = 0x50;
    pub const DOWN: u8 = 0x51;
    pub const UP: u8 = 0x52;
}

/// One keyboard input report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier bitfield.
    pub mods: Modifiers,
    /// Key code, 0 when released.
    pub key: u8,
}

impl KeyboardReport {
    /// All keys and modifiers released.
    pub const fn release() -> Self {
        Self {
            mods: Modifiers::NONE,
            key: 0,
        }
    }

    pub const fn pressed(mods: Modifiers, key: u8) -> Self {
        Self { mods, key }
    }

    /// Serialise for transmission. Returns the bytes written (always 4).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = REPORT_ID_KEYBOARD;
        buf[1] = self.mods.bits();
        buf[2] = 0;
        buf[3] = self.key;
        KEYBOARD_REPORT_SIZE
    }

    pub fn is_release(&self) -> bool {
        self.mods == Modifiers::NONE && self.key == 0
    }
}

impl Default for KeyboardReport {
    fn default() -> Self {
        Self::release()
    }
}

/// HID report descriptor fragment for the keyboard report.
///
/// Declares the 'K' report with 4 modifier bits, 4 padding bits, one
/// reserved byte, one key code byte, and the 3 lock LEDs as an output
/// report under the same ID.
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    0x85, REPORT_ID_KEYBOARD, //   Report ID ('K')
    //
    //   - Modifier keys (4 bits + 4 padding) -
    //   Declared one usage per bit so the wire order matches the
    //   modifier bitfield: Shift, Ctrl, Alt, GUI.
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x09, 0xE1, //   Usage (Left Shift)
    0x09, 0xE0, //   Usage (Left Control)
    0x09, 0xE2, //   Usage (Left Alt)
    0x09, 0xE3, //   Usage (Left GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x04, //   Report Count (4)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x95, 0x04, //   Report Count (4)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant)
    //
    //   - Key code (1 byte) -
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array)
    //
    //   - Lock LEDs (3 bits + 5 padding) -
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x03, //   Usage Maximum (Scroll Lock)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x03, //   Report Count (3)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x05, //   Report Count (5)
    0x91, 0x01, //   Output (Constant) - padding
    //
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_layout() {
        let report = KeyboardReport::pressed(Modifiers::SHIFT.with(Modifiers::CTL), 0x0B);
        let mut buf = [0u8; 4];
        assert_eq!(report.serialize(&mut buf), 4);
        assert_eq!(buf, [b'K', 0x03, 0x00, 0x0B]);
    }

    #[test]
    fn release_is_zeroed_after_id() {
        let mut buf = [0xFFu8; 4];
        KeyboardReport::release().serialize(&mut buf);
        assert_eq!(buf, [b'K', 0, 0, 0]);
        assert!(KeyboardReport::release().is_release());
    }

    #[test]
    fn short_buffer_writes_nothing() {
        let mut buf = [0u8; 3];
        assert_eq!(KeyboardReport::release().serialize(&mut buf), 0);
    }
}
