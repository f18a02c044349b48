//! USB HID reports and the transport seam.
//!
//! The device exposes a single HID interface carrying three numbered
//! reports: keyboard, consumer device, and system control. Each report
//! ID is the ASCII initial of its page so a capture is readable at a
//! glance. Keyboard LED state (Num/Caps/Scroll Lock) arrives as an
//! output report under the keyboard report ID.

pub mod consumer;
pub mod keyboard;
pub mod keymap;
pub mod system;

pub use consumer::{ConsumerReport, CONSUMER_REPORT_SIZE};
pub use keyboard::{KeyboardReport, KEYBOARD_REPORT_SIZE};
pub use system::{SystemControlReport, SYSTEM_REPORT_SIZE};

/// Keyboard report ID.
pub const REPORT_ID_KEYBOARD: u8 = b'K';
/// System control report ID.
pub const REPORT_ID_SYSTEM: u8 = b'S';
/// Consumer device report ID.
pub const REPORT_ID_CONSUMER: u8 = b'C';

/// Largest report the device ever sends, ID byte included.
pub const MAX_REPORT_SIZE: usize = KEYBOARD_REPORT_SIZE;

/// Raw HID endpoint pair supplied by the platform layer.
///
/// On target this wraps the embassy-usb HID class; host tests use an
/// in-memory fake that records written reports and scripts LED state.
pub trait HidTransport {
    /// Send one input report (ID byte first). Returns `false` when the
    /// host is not accepting reports, in which case the caller retries.
    fn write_report(&mut self, report: &[u8]) -> bool;

    /// Pause between write retries. On target this blocks the poll
    /// loop; host-side fakes may ignore it.
    fn backoff_ms(&mut self, _ms: u32) {}

    /// Non-blocking poll for an output report (keyboard LEDs). Returns
    /// the number of bytes placed in `buf`, or `None` when nothing is
    /// pending.
    fn read_report(&mut self, buf: &mut [u8]) -> Option<usize>;
}

/// Millisecond delay supplied by the platform layer.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// Keyboard LED state as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedIndicators {
    bits: u8,
}

impl LedIndicators {
    const NUM_LOCK: u8 = 0x01;
    const CAPS_LOCK: u8 = 0x02;
    const SCROLL_LOCK: u8 = 0x04;

    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    pub const fn num_lock(self) -> bool {
        self.bits & Self::NUM_LOCK != 0
    }

    pub const fn caps_lock(self) -> bool {
        self.bits & Self::CAPS_LOCK != 0
    }

    pub const fn scroll_lock(self) -> bool {
        self.bits & Self::SCROLL_LOCK != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn led_bits_decode() {
        let leds = LedIndicators::from_bits(0b101);
        assert!(leds.num_lock());
        assert!(!leds.caps_lock());
        assert!(leds.scroll_lock());
        assert_eq!(LedIndicators::default(), LedIndicators::from_bits(0));
    }
}
