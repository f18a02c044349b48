//! The packed 16-bit action record and the recorded action list.
//!
//! Every recorded step is one 16-bit word whose top nibble (the "page")
//! selects how the remaining 12 bits are read:
//!
//! ```text
//! 0x0muu  Keyboard        m = modifier mask, uu = key usage code
//! 0x1uuu  ConsumerDevice  uuu = 12-bit consumer usage code
//! 0x2_uu  SystemControl   uu = 8-bit system usage code (middle nibble unused)
//! 0xDfoo  Do              f = local function, oo = operand
//! 0xEcoo  Execute         c = opcode, oo = operand
//! 0xFmaa  Jump            m = condition mask, aa = address/offset
//! ```
//!
//! Any 16-bit pattern is a legal action; words under an unassigned page
//! decode to [`Action::Reserved`] and carry their raw bits unchanged.

use crate::config::MAX_ACTIONS;
use crate::error::Error;
use heapless::Vec;

/// Page discriminants (top nibble of the action word).
pub mod page {
    pub const KEYBOARD: u8 = 0x0;
    pub const CONSUMER_DEVICE: u8 = 0x1;
    pub const SYSTEM_CONTROL: u8 = 0x2;
    pub const DO: u8 = 0xD;
    pub const EXECUTE: u8 = 0xE;
    pub const JUMP: u8 = 0xF;
}

/// Keyboard modifier mask (low nibble of a Keyboard action).
///
/// Matches the low four bits of the USB boot-protocol modifier byte,
/// so the nibble can be sent on the wire unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(0b0001);
    pub const CTL: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const GUI: Modifiers = Modifiers(0b1000);

    /// Build from a raw nibble; high bits are discarded.
    pub const fn from_nibble(bits: u8) -> Self {
        Modifiers(bits & 0x0F)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn with(self, other: Modifiers) -> Self {
        Modifiers(self.0 | other.0)
    }
}

/// Interpreter opcode (4 bits, total over the nibble).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// W = operand
    Set = 0x0,
    /// W = memory[operand]
    Get = 0x1,
    /// memory[operand] = W
    Put = 0x2,
    /// CC = cmp(W, operand)
    CompareImm = 0x3,
    /// CC = cmp(W, memory[operand])
    Compare = 0x4,
    /// Emit memory[operand] as keystrokes in the current format
    Say = 0x5,
    /// Set the Say format (char/decimal/hex)
    Format = 0x6,
    /// W = W + operand
    AddImm = 0x7,
    /// W = W - operand
    SubImm = 0x8,
    /// Fill all memory cells with operand
    Clear = 0x9,
    /// W = W + memory[operand]
    Add = 0xA,
    /// W = W - memory[operand]
    Sub = 0xB,
    /// W = W * memory[operand]
    Mul = 0xC,
    /// W = W / memory[operand]
    Div = 0xD,
    /// Delay operand milliseconds (not interruptible)
    WaitMs = 0xE,
    /// Delay operand seconds (interruptible by a button press)
    WaitSec = 0xF,
}

impl Opcode {
    /// All sixteen nibble values map to an opcode.
    pub const fn from_nibble(n: u8) -> Self {
        match n & 0x0F {
            0x0 => Opcode::Set,
            0x1 => Opcode::Get,
            0x2 => Opcode::Put,
            0x3 => Opcode::CompareImm,
            0x4 => Opcode::Compare,
            0x5 => Opcode::Say,
            0x6 => Opcode::Format,
            0x7 => Opcode::AddImm,
            0x8 => Opcode::SubImm,
            0x9 => Opcode::Clear,
            0xA => Opcode::Add,
            0xB => Opcode::Sub,
            0xC => Opcode::Mul,
            0xD => Opcode::Div,
            0xE => Opcode::WaitMs,
            _ => Opcode::WaitSec,
        }
    }

    pub const fn nibble(self) -> u8 {
        self as u8
    }
}

/// Local function id (4 bits) of a `Do` action.
///
/// `Goto`, `WaitMs` and `WaitSec` are legacy functions from an earlier
/// firmware generation; the interpreter still honours them but the
/// editor never offers them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LocalFn {
    Delete = 0x0,
    Redisplay = 0x1,
    Goto = 0x2,
    WaitMs = 0x3,
    WaitSec = 0x4,
    Load = 0xE,
    Save = 0xF,
}

impl LocalFn {
    pub const fn from_nibble(n: u8) -> Option<Self> {
        match n & 0x0F {
            0x0 => Some(LocalFn::Delete),
            0x1 => Some(LocalFn::Redisplay),
            0x2 => Some(LocalFn::Goto),
            0x3 => Some(LocalFn::WaitMs),
            0x4 => Some(LocalFn::WaitSec),
            0xE => Some(LocalFn::Load),
            0xF => Some(LocalFn::Save),
            _ => None,
        }
    }

    pub const fn nibble(self) -> u8 {
        self as u8
    }
}

/// Condition-code bits tested by a `Jump` action's mask.
pub mod cond {
    pub const ZERO: u8 = 0b1000;
    pub const MINUS: u8 = 0b0100;
    pub const PLUS: u8 = 0b0010;
    /// Historical Carry/Overflow bit. No instruction ever sets it, so a
    /// mask selecting only this bit never fires.
    pub const CARRY: u8 = 0b0001;

    /// Mask 0b0000: unconditional jump relative by the signed address byte.
    pub const RELATIVE: u8 = 0b0000;
    /// Mask 0b1111: unconditional jump to the absolute address.
    pub const ALWAYS: u8 = 0b1111;
}

/// One step of the recorded script, decoded from its 16-bit word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Press (and release) one key with a modifier mask.
    Keyboard { mods: Modifiers, key: u8 },
    /// Emit a 12-bit consumer-device usage.
    ConsumerDevice(u16),
    /// Emit an 8-bit system-control usage.
    SystemControl(u8),
    /// Invoke a local function with an 8-bit operand.
    Do(LocalFn, u8),
    /// Execute one interpreter instruction.
    Execute(Opcode, u8),
    /// Conditional or unconditional transfer of control.
    Jump { mask: u8, addr: u8 },
    /// A word under an unassigned page, kept bit-for-bit.
    Reserved(u16),
}

impl Action {
    /// Decode a raw 16-bit word. Total: every pattern yields an action.
    pub const fn decode(word: u16) -> Action {
        let pg = (word >> 12) as u8;
        let nibble = ((word >> 8) & 0x0F) as u8;
        let low = (word & 0x00FF) as u8;
        match pg {
            page::KEYBOARD => Action::Keyboard {
                mods: Modifiers::from_nibble(nibble),
                key: low,
            },
            page::CONSUMER_DEVICE => Action::ConsumerDevice(word & 0x0FFF),
            page::SYSTEM_CONTROL => Action::SystemControl(low),
            page::DO => match LocalFn::from_nibble(nibble) {
                Some(f) => Action::Do(f, low),
                None => Action::Reserved(word),
            },
            page::EXECUTE => Action::Execute(Opcode::from_nibble(nibble), low),
            page::JUMP => Action::Jump { mask: nibble, addr: low },
            _ => Action::Reserved(word),
        }
    }

    /// Encode back to the packed 16-bit word.
    pub const fn encode(self) -> u16 {
        match self {
            Action::Keyboard { mods, key } => {
                (page::KEYBOARD as u16) << 12 | (mods.bits() as u16) << 8 | key as u16
            }
            Action::ConsumerDevice(usage) => {
                (page::CONSUMER_DEVICE as u16) << 12 | (usage & 0x0FFF)
            }
            Action::SystemControl(usage) => (page::SYSTEM_CONTROL as u16) << 12 | usage as u16,
            Action::Do(f, operand) => {
                (page::DO as u16) << 12 | (f.nibble() as u16) << 8 | operand as u16
            }
            Action::Execute(op, operand) => {
                (page::EXECUTE as u16) << 12 | (op.nibble() as u16) << 8 | operand as u16
            }
            Action::Jump { mask, addr } => {
                (page::JUMP as u16) << 12 | ((mask & 0x0F) as u16) << 8 | addr as u16
            }
            Action::Reserved(word) => word,
        }
    }

    /// The page discriminant of this action.
    pub const fn page(self) -> u8 {
        (self.encode() >> 12) as u8
    }
}

/// The recorded script: up to 127 actions plus a focus cursor.
///
/// The cursor points at the slot being edited and may equal `len()`
/// (the append position). Mutated only by the programming-mode
/// controller; the interpreter reads it as a slice.
#[derive(Clone, Debug, Default)]
pub struct ActionList {
    actions: Vec<Action, MAX_ACTIONS>,
    focus: u8,
}

impl ActionList {
    pub const fn new() -> Self {
        Self {
            actions: Vec::new(),
            focus: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.actions.is_full()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.actions
    }

    pub fn get(&self, index: usize) -> Option<Action> {
        self.actions.get(index).copied()
    }

    /// Append an action; silently refused when at capacity.
    pub fn push(&mut self, action: Action) -> Result<(), Error> {
        self.actions.push(action).map_err(|_| Error::CapacityExceeded)
    }

    /// Overwrite the action at `index`. Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, action: Action) {
        if let Some(slot) = self.actions.get_mut(index) {
            *slot = action;
        }
    }

    /// Remove the action at `index`, shifting all later entries left.
    pub fn remove(&mut self, index: usize) {
        if index < self.actions.len() {
            self.actions.remove(index);
        }
        self.clamp_focus();
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.focus = 0;
    }

    /// The focus cursor, always in `0..=len()`.
    pub fn focus(&self) -> u8 {
        self.focus
    }

    /// Move the focus cursor, clamped to `0..=len()`.
    pub fn set_focus(&mut self, focus: u8) {
        self.focus = focus.min(self.actions.len() as u8);
    }

    fn clamp_focus(&mut self) {
        self.focus = self.focus.min(self.actions.len() as u8);
    }
}
