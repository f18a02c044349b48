//! Display names for pages, usages and instructions.
//!
//! Everything the editor shows on the host is assembled from these
//! tables. Keyboard key names are dense arrays indexed by usage code;
//! the consumer page is almost entirely unassigned, so its names live
//! in a sorted sparse table instead. An empty name means the usage is
//! unassigned and the selection knob skips over it.

use crate::action::{cond, LocalFn, Opcode};

#[rustfmt::skip]
const UNSHIFTED_KEY_NAMES: [&str; 0x87] = [
    /* 00 */ "No Op", "",          "",         "",        "a",          "b",    "c",      "d",       "e",        "f",        "g",         "h",           "i",       "j",     "k",        "l",
    /* 10 */ "m",     "n",         "o",        "p",       "q",          "r",    "s",      "t",       "u",        "v",        "w",         "x",           "y",       "z",     "1",        "2",
    /* 20 */ "3",     "4",         "5",        "6",       "7",          "8",    "9",      "0",       "Enter",    "Esc",      "Backspace", "Tab",         "Space",   "-",     "=",        "[",
    /* 30 */ "]",     "\\",        "#",        ";",       "'",          "`",    ",",      ".",       "/",        "CapsLock", "F1",        "F2",          "F3",      "F4",    "F5",       "F6",
    /* 40 */ "F7",    "F8",        "F9",       "F10",     "F11",        "F12",  "PrtScr", "ScrLock", "Pause",    "Ins",      "Home",      "PageUp",      "Delete",  "End",   "PageDown", "Right",
    /* 50 */ "Left",  "Down",      "Up",       "NumLock", "KP /",       "KP *", "KP -",   "KP +",    "KP Enter", "KP 1",     "KP 2",      "KP 3",        "KP 4",    "KP 5",  "KP 6",     "KP 7",
    /* 60 */ "KP 8",  "KP 9",      "KP 0",     "KP .",    "\\",         "Appl", "Power",  "KP =",    "F13",      "F14",      "F15",       "F16",         "F17",     "F18",   "F19",      "F20",
    /* 70 */ "F21",   "F22",       "F23",      "F24",     "Exec",       "Help", "Menu",   "Select",  "Stop",     "Again",    "Undo",      "Cut",         "Copy",    "Paste", "Find",     "Mute",
    /* 80 */ "Vol+",  "Vol-",      "LockCaps", "LockNum", "LockScroll", "KP ,", "KP =",
];

#[rustfmt::skip]
const SHIFTED_KEY_NAMES: [&str; 0x65] = [
    /* 00 */ "",      "",          "",         "",        "A",          "B",    "C",      "D",       "E",        "F",        "G",         "H",           "I",       "J",     "K",        "L",
    /* 10 */ "M",     "N",         "O",        "P",       "Q",          "R",    "S",      "T",       "U",        "V",        "W",         "X",           "Y",       "Z",     "!",        "@",
    /* 20 */ "#",     "$",         "%",        "^",       "&",          "*",    "(",      ")",       "",         "",         "",          "",            "",        "_",     "+",        "{",
    /* 30 */ "}",     "|",         "~",        ":",       "\"",         "~",    "<",      ">",       "?",        "",         "",          "",            "",        "",      "",         "",
    /* 40 */ "",      "",          "",         "",        "",           "",     "",       "",        "",         "",         "",          "",            "",        "",      "",         "",
    /* 50 */ "",      "",          "",         "Clear",   "",           "",     "",       "",        "",         "KP End",   "KP Down",   "KP PageDown", "KP Left", "",      "KP Right", "KP Home",
    /* 60 */ "KP Up", "KP PageUp", "KP Ins",   "KP Del",  "|",
];

/// System control usages, indexed by report value (1 = Power Down).
const SYSTEM_CONTROL_NAMES: [&str; 15] = [
    "",
    "Power Down",
    "Sleep",
    "Wake Up",
    "Context Menu",
    "App Menu",
    "Menu Help",
    "Menu Exit",
    "Menu Select",
    "Menu Right",
    "Menu Left",
    "Menu Up",
    "Menu Down",
    "Cold Restart",
    "Warm Restart",
];

/// Named consumer device usages, sorted by usage code.
#[rustfmt::skip]
const CONSUMER_DEVICE_NAMES: &[(u16, &str)] = &[
    (0x09D, "Ch+"),
    (0x09E, "Ch-"),
    (0x0B0, "Play"),
    (0x0B1, "Pause"),
    (0x0B2, "Record"),
    (0x0B3, "FF"),
    (0x0B4, "Rew"),
    (0x0B5, "Next Track"),
    (0x0B6, "Prev Track"),
    (0x0B7, "Stop"),
    (0x0B8, "Eject"),
    (0x0B9, "Random"),
    (0x0BC, "Repeat"),
    (0x0CC, "Stop/Eject"),
    (0x0CD, "Play/Pause"),
    (0x0E2, "Mute"),
    (0x0E5, "Bass Boost"),
    (0x0E6, "Surround"),
    (0x0E7, "Loudness"),
    (0x0E8, "MPX"),
    (0x0E9, "Vol+"),
    (0x0EA, "Vol-"),
    (0x0F5, "Slow"),
    (0x184, "Word Processor"),
    (0x185, "Text Editor"),
    (0x186, "Spreadsheet"),
    (0x187, "Graphics Editor"),
    (0x188, "Presentation"),
    (0x189, "Database"),
    (0x18A, "Email"),
    (0x18B, "News"),
    (0x18C, "Voicemail"),
    (0x18D, "Contacts"),
    (0x18E, "Calendar"),
    (0x18F, "Project Manager"),
    (0x192, "Calculator"),
    (0x196, "Web Browser"),
    (0x19A, "Telephony"),
    (0x19B, "Logon"),
    (0x19C, "Logoff"),
    (0x19E, "Terminal Lock"),
    (0x19F, "Control Panel"),
    (0x1A0, "Command Line"),
    (0x1A1, "Task Manager"),
    (0x1AA, "Desktop"),
    (0x1B3, "Clock"),
    (0x1B4, "File Browser"),
    (0x1B6, "Image Browser"),
    (0x1B7, "Audio Browser"),
    (0x1B8, "Movie Browser"),
    (0x1BB, "Messaging"),
    (0x1C6, "Audio Player"),
    (0x201, "New"),
    (0x202, "Open"),
    (0x203, "Close"),
    (0x204, "Exit"),
    (0x205, "Maximise"),
    (0x206, "Minimise"),
    (0x207, "Save"),
    (0x208, "Print"),
    (0x21A, "Undo"),
    (0x21B, "Copy"),
    (0x21C, "Cut"),
    (0x21D, "Paste"),
    (0x21E, "Select All"),
    (0x21F, "Find"),
    (0x220, "Replace"),
    (0x221, "Search"),
    (0x222, "Go To"),
    (0x223, "Home"),
    (0x224, "Back"),
    (0x225, "Forward"),
    (0x226, "Stop"),
    (0x227, "Refresh"),
    (0x228, "Prev Link"),
    (0x229, "Next Link"),
    (0x22A, "Bookmarks"),
    (0x22B, "History"),
    (0x22D, "Zoom In"),
    (0x22E, "Zoom Out"),
    (0x230, "Full Screen"),
    (0x231, "Normal View"),
    (0x232, "Toggle View"),
    (0x233, "Scroll Up"),
    (0x234, "Scroll Down"),
    (0x239, "New Window"),
    (0x23A, "Tile Horz"),
    (0x23B, "Tile Vert"),
];

/// First named usage offered when a page is entered.
pub const FIRST_CONSUMER_USAGE: u16 = CONSUMER_DEVICE_NAMES[0].0;
pub const FIRST_SYSTEM_USAGE: u8 = 1;
pub const LAST_SYSTEM_USAGE: u8 = 14;

/// Key name for a keyboard usage. Falls back to the unshifted name when
/// the shifted table has no entry for a shifted key.
pub fn key_name(key: u8, shifted: bool) -> &'static str {
    if shifted {
        if let Some(name) = SHIFTED_KEY_NAMES.get(key as usize) {
            if !name.is_empty() {
                return name;
            }
        }
    }
    UNSHIFTED_KEY_NAMES.get(key as usize).copied().unwrap_or("")
}

pub fn system_name(usage: u8) -> &'static str {
    SYSTEM_CONTROL_NAMES.get(usage as usize).copied().unwrap_or("")
}

pub fn consumer_name(usage: u16) -> &'static str {
    match CONSUMER_DEVICE_NAMES.binary_search_by_key(&usage, |&(u, _)| u) {
        Ok(i) => CONSUMER_DEVICE_NAMES[i].1,
        Err(_) => "",
    }
}

/// Next named consumer usage after `usage`, wrapping past the end.
pub fn next_named_consumer(usage: u16) -> u16 {
    match CONSUMER_DEVICE_NAMES.iter().find(|&&(u, _)| u > usage) {
        Some(&(u, _)) => u,
        None => CONSUMER_DEVICE_NAMES[0].0,
    }
}

/// Previous named consumer usage before `usage`, wrapping past the start.
pub fn prev_named_consumer(usage: u16) -> u16 {
    match CONSUMER_DEVICE_NAMES.iter().rev().find(|&&(u, _)| u < usage) {
        Some(&(u, _)) => u,
        None => CONSUMER_DEVICE_NAMES[CONSUMER_DEVICE_NAMES.len() - 1].0,
    }
}

/// Next system control usage, wrapping within the named range.
pub fn next_named_system(usage: u8) -> u8 {
    if usage >= LAST_SYSTEM_USAGE {
        FIRST_SYSTEM_USAGE
    } else {
        usage + 1
    }
}

pub fn prev_named_system(usage: u8) -> u8 {
    if usage <= FIRST_SYSTEM_USAGE {
        LAST_SYSTEM_USAGE
    } else {
        usage - 1
    }
}

/// Pages the selection knob cycles through, in rotation order.
pub const NAMED_PAGES: [u8; 6] = [0x0, 0x1, 0x2, 0xD, 0xE, 0xF];

pub fn page_name(page: u8) -> &'static str {
    match page {
        0x0 => "Set Keystroke",
        0x1 => "Set Consumer Device Command",
        0x2 => "Set System Control Command",
        0xD => "Do Local Function",
        0xE => "Execute Instruction",
        0xF => "Jump On Condition",
        _ => "",
    }
}

/// Next named page after `page`, wrapping.
pub fn next_page(page: u8) -> u8 {
    match NAMED_PAGES.iter().position(|&p| p == page) {
        Some(i) => NAMED_PAGES[(i + 1) % NAMED_PAGES.len()],
        None => NAMED_PAGES[0],
    }
}

pub fn prev_page(page: u8) -> u8 {
    match NAMED_PAGES.iter().position(|&p| p == page) {
        Some(0) => NAMED_PAGES[NAMED_PAGES.len() - 1],
        Some(i) => NAMED_PAGES[i - 1],
        None => NAMED_PAGES[0],
    }
}

/// Name of a local function. Legacy functions the editor no longer
/// offers have no name.
pub fn local_fn_name(f: LocalFn) -> &'static str {
    match f {
        LocalFn::Delete => "Delete action",
        LocalFn::Redisplay => "Redisplay",
        LocalFn::Load => "Load from EEPROM",
        LocalFn::Save => "Save to EEPROM",
        LocalFn::Goto | LocalFn::WaitMs | LocalFn::WaitSec => "",
    }
}

/// Leading description of an interpreter instruction. The operand
/// rendering that follows depends on the opcode.
pub fn opcode_name(op: Opcode) -> &'static str {
    match op {
        Opcode::Set => "Let W = ",
        Opcode::Get => "Get W from R",
        Opcode::Put => "Put W in R",
        Opcode::CompareImm => "Compare W to ",
        Opcode::Compare => "Compare W to R",
        Opcode::Say => "Say R",
        Opcode::Format => "Say in ",
        Opcode::AddImm => "Let W = W + ",
        Opcode::SubImm => "Let W = W - ",
        Opcode::Clear => "Clear memory to ",
        Opcode::Add => "Let W = W + R",
        Opcode::Sub => "Let W = W - R",
        Opcode::Mul => "Let W = W x R",
        Opcode::Div => "Let W = W / R",
        Opcode::WaitMs => "Wait ",
        Opcode::WaitSec => "Wait ",
    }
}

/// Description of a jump condition mask.
pub fn jump_name(mask: u8) -> &'static str {
    match mask & 0x0F {
        cond::RELATIVE => "Jump Relative",
        0b0001 => "Jump if Carry",
        0b0010 => "Jump if High",
        0b0011 => "Jump if High or Carry",
        0b0100 => "Jump if Low",
        0b0101 => "Jump if Low or Carry",
        0b0110 => "Jump if Not Zero or Carry",
        0b0111 => "Jump if Not Zero",
        0b1000 => "Jump if Zero",
        0b1001 => "Jump if Zero or Carry",
        0b1010 => "Jump if Not Low or Carry",
        0b1011 => "Jump if Not Low",
        0b1100 => "Jump if Zero or Low",
        0b1101 => "Jump if Not High",
        0b1110 => "Jump if Not Carry",
        _ => "Jump",
    }
}
