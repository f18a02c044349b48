//! System control HID report - power, sleep, and host menu navigation.
//!
//! Layout (2 bytes, report ID included):
//! ```text
//! Byte 0: Report ID ('S')
//! Byte 1: Usage offset from System Power Down minus one
//!         (1 = Power Down .. 14 = Warm Restart, 0 = released)
//! ```

use super::REPORT_ID_SYSTEM;

/// System control report size in bytes, report ID included.
pub const SYSTEM_REPORT_SIZE: usize = 2;

/// One system control report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemControlReport {
    /// Active usage, 0 when released.
    pub usage: u8,
}

impl SystemControlReport {
    pub const fn release() -> Self {
        Self { usage: 0 }
    }

    pub const fn pressed(usage: u8) -> Self {
        Self { usage }
    }

    /// Serialise for transmission. Returns the bytes written (always 2).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < SYSTEM_REPORT_SIZE {
            return 0;
        }
        buf[0] = REPORT_ID_SYSTEM;
        buf[1] = self.usage;
        SYSTEM_REPORT_SIZE
    }
}

/// HID report descriptor fragment for the system control report.
///
/// Usages are declared relative to System Power Down (0x81), so a
/// report value of 1 selects Power Down and 14 selects Warm Restart.
pub const SYSTEM_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x80, // Usage (System Control)
    0xA1, 0x01, // Collection (Application)
    0x85, REPORT_ID_SYSTEM, //   Report ID ('S')
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x0E, //   Logical Maximum (14)
    0x19, 0x80, //   Usage Minimum (System Power Down - 1)
    0x29, 0x8F, //   Usage Maximum (System Warm Restart)
    0x75, 0x08, //   Report Size (8)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array)
    0xC0, // End Collection
];
