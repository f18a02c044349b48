//! Consumer device HID report - media keys, launchers, browser controls.
//!
//! Layout (3 bytes, report ID included):
//! ```text
//! Byte 0: Report ID ('C')
//! Byte 1: Usage bits 0-7
//! Byte 2: Usage bits 8-11 (low nibble; high nibble zero)
//! ```
//!
//! Twelve usage bits cover the whole range this device can record.

use super::REPORT_ID_CONSUMER;

/// Consumer report size in bytes, report ID included.
pub const CONSUMER_REPORT_SIZE: usize = 3;

/// One consumer device report carrying a single 12-bit usage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    /// Active usage, 0 when released.
    pub usage: u16,
}

impl ConsumerReport {
    pub const fn release() -> Self {
        Self { usage: 0 }
    }

    pub const fn pressed(usage: u16) -> Self {
        Self {
            usage: usage & 0x0FFF,
        }
    }

    /// Serialise for transmission. Returns the bytes written (always 3).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < CONSUMER_REPORT_SIZE {
            return 0;
        }
        buf[0] = REPORT_ID_CONSUMER;
        buf[1] = (self.usage & 0xFF) as u8;
        buf[2] = (self.usage >> 8) as u8 & 0x0F;
        CONSUMER_REPORT_SIZE
    }
}

/// HID report descriptor fragment for the consumer report.
pub const CONSUMER_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x0C, // Usage Page (Consumer)
    0x09, 0x01, // Usage (Consumer Control)
    0xA1, 0x01, // Collection (Application)
    0x85, REPORT_ID_CONSUMER, //   Report ID ('C')
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x0F, //   Logical Maximum (4095)
    0x19, 0x00, //   Usage Minimum (0)
    0x2A, 0xFF, 0x0F, //   Usage Maximum (4095)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    0xC0, // End Collection
];
