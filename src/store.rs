//! Persistent storage for the recorded action list.
//!
//! The platform layer supplies raw byte read/write primitives (on
//! target, EEPROM-style access to internal flash); this module owns the
//! layout:
//!
//! ```text
//! addr 0      focus cursor
//! addr 1      action count
//! addr 2..    one big-endian 16-bit word per action
//! ```
//!
//! The only integrity check on load is the header: a count or cursor
//! that cannot fit the list capacity marks the store as absent/corrupt
//! and yields an empty list. Individual action words are never
//! validated - any 16-bit pattern is a legal action.

use crate::action::{Action, ActionList};
use crate::config::{
    MAX_ACTIONS, STORE_ACTIONS_ADDR, STORE_COUNT_ADDR, STORE_CURSOR_ADDR, STORE_LEN,
};

/// Raw byte-addressed persistence primitives supplied by the board layer.
pub trait ByteStore {
    fn read_byte(&self, addr: u16) -> u8;
    fn write_byte(&mut self, addr: u16, value: u8);
}

/// Persist a script: cursor byte, count byte, then each action word
/// high byte first. No partial-write atomicity is provided; a power
/// loss mid-save can leave a torn write for the header check to catch.
pub fn save(store: &mut impl ByteStore, cursor: u8, actions: &[Action]) {
    store.write_byte(STORE_CURSOR_ADDR, cursor);
    store.write_byte(STORE_COUNT_ADDR, actions.len() as u8);
    let mut addr = STORE_ACTIONS_ADDR;
    for action in actions {
        let word = action.encode();
        store.write_byte(addr, (word >> 8) as u8);
        store.write_byte(addr + 1, (word & 0xFF) as u8);
        addr += 2;
    }
}

/// Persist a whole list including its focus cursor.
pub fn save_list(store: &mut impl ByteStore, list: &ActionList) {
    save(store, list.focus(), list.as_slice());
}

/// Read the script back. A header that cannot fit the capacity (count
/// above 127, or cursor past the count) discards the store and returns
/// an empty list.
pub fn load(store: &impl ByteStore) -> ActionList {
    let cursor = store.read_byte(STORE_CURSOR_ADDR);
    let count = store.read_byte(STORE_COUNT_ADDR);

    let mut list = ActionList::new();
    if count as usize > MAX_ACTIONS || cursor > count {
        return list;
    }

    let mut addr = STORE_ACTIONS_ADDR;
    for _ in 0..count {
        let hi = store.read_byte(addr);
        let lo = store.read_byte(addr + 1);
        addr += 2;
        let word = (hi as u16) << 8 | lo as u16;
        // Cannot fail: count was checked against capacity above.
        let _ = list.push(Action::decode(word));
    }
    list.set_focus(cursor);
    list
}

/// In-memory byte store used by host tests and the examples.
#[derive(Clone)]
pub struct MemStore {
    bytes: [u8; STORE_LEN],
}

impl MemStore {
    pub const fn new() -> Self {
        Self {
            bytes: [0; STORE_LEN],
        }
    }

    /// Raw view of the backing bytes, for corruption tests.
    pub fn bytes_mut(&mut self) -> &mut [u8; STORE_LEN] {
        &mut self.bytes
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStore for MemStore {
    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }
}
