//! Application-wide constants and compile-time configuration.
//!
//! All capacities, storage addresses, timing parameters, and protocol
//! constants live here so they can be tuned in one place.

// Action script

/// Maximum number of recorded actions. 127 two-byte actions plus the
/// two-byte header exactly fill a 256-byte EEPROM.
pub const MAX_ACTIONS: usize = 127;

/// Size of the interpreter's flat byte memory.
pub const MEMORY_SIZE: usize = 256;

// Persistent store layout

/// Byte address of the saved focus cursor.
pub const STORE_CURSOR_ADDR: u16 = 0;

/// Byte address of the saved action count.
pub const STORE_COUNT_ADDR: u16 = 1;

/// Byte address of the first action word (big-endian, two bytes each).
pub const STORE_ACTIONS_ADDR: u16 = 2;

/// Total bytes the store may touch: header plus 127 action words.
pub const STORE_LEN: usize = 2 + 2 * MAX_ACTIONS;

// Timing

/// Foreground tick rate (Hz). The interrupt-driven tick counter advances
/// at roughly this rate; long-press and inactivity timeouts are measured
/// in these ticks.
pub const TICKS_PER_SECOND: u16 = 23;

/// Ticks the knob must stay pressed to register a long press.
pub const LONG_PRESS_TICKS: u16 = TICKS_PER_SECOND;

/// Ticks of silence in usage-selection mode before focus falls back to
/// the page selector.
pub const INACTIVITY_TICKS: u16 = 8 * TICKS_PER_SECOND;

/// Poll granularity of an interruptible seconds-wait (ms).
pub const WAIT_TICK_MS: u32 = 5;

/// Number of wait ticks per second of `WAIT_SEC`.
pub const WAIT_TICKS_PER_SECOND: u16 = 200;

/// Knob switch debounce time (ms).
pub const BUTTON_DEBOUNCE_MS: u32 = 5;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "pub-button";
pub const USB_PRODUCT: &str = "Programmable USB Button";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 1;

/// First pause after a refused report write (ms). Doubles on every
/// further refusal.
pub const USB_WRITE_BACKOFF_MS: u32 = 1;

/// Back-off ceiling while the host is not accepting reports (ms).
pub const USB_WRITE_BACKOFF_MAX_MS: u32 = 100;

// Host editor layout
//
// The programming menu is rendered into a host text editor. These line
// numbers match the banner written by the menu redraw.

/// Line carrying the per-mode help text.
pub const INFO_LINE: u8 = 2;

/// Line carrying the current selection (page or pending action).
pub const SELECTION_LINE: u8 = 3;

/// First line of the recorded action listing.
pub const FIRST_ACTION_LINE: u8 = 6;

/// Firmware version shown in the programming banner.
pub const VERSION: &str = "0.1.0";
