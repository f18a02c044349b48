//! Script playback: the tiny accumulator machine and the player loop.
//!
//! `Execute` actions operate on a single 8-bit working register W, a
//! flat 256-byte memory, and a condition code set from the signed value
//! of each arithmetic or comparison result. `Jump` actions test the
//! condition code against a 4-bit mask. Everything else in a script
//! turns into HID reports on the way through [`HostLink`].

use crate::action::{cond, Action, ActionList, LocalFn, Opcode};
use crate::config::{MEMORY_SIZE, WAIT_TICKS_PER_SECOND, WAIT_TICK_MS};
use crate::hid::{Delay, HidTransport};
use crate::host::HostLink;
use crate::input::InputRegisters;
use crate::store::{self, ByteStore};

/// Rendering applied by the `Say` instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SayFormat {
    #[default]
    Hex = 0,
    Dec = 1,
    Char = 2,
}

impl SayFormat {
    /// Operand values outside the known formats render as hex.
    pub const fn from_operand(v: u8) -> Self {
        match v {
            1 => SayFormat::Dec,
            2 => SayFormat::Char,
            _ => SayFormat::Hex,
        }
    }
}

/// Condition-code state, one bit per outcome.
///
/// Exactly one of Zero/Minus/Plus is set after any instruction that
/// updates the code. The Carry bit exists in the mask domain only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CondCode(u8);

impl CondCode {
    pub const ZERO: CondCode = CondCode(cond::ZERO);
    pub const MINUS: CondCode = CondCode(cond::MINUS);
    pub const PLUS: CondCode = CondCode(cond::PLUS);

    /// Classify a signed result.
    pub const fn from_signed(n: i8) -> Self {
        if n == 0 {
            Self::ZERO
        } else if n > 0 {
            Self::PLUS
        } else {
            Self::MINUS
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True when any bit selected by `mask` is set.
    pub const fn matches(self, mask: u8) -> bool {
        self.0 & mask != 0
    }
}

/// Interpreter state for one playback.
///
/// W, memory, the condition code and the say format all start from
/// zero on every button press; a script computes from its inputs, not
/// from what the previous run left behind.
pub struct Machine {
    pub w: u8,
    pub cc: CondCode,
    pub format: SayFormat,
    memory: [u8; MEMORY_SIZE],
}

impl Machine {
    pub const fn new() -> Self {
        Self {
            w: 0,
            cc: CondCode::ZERO,
            format: SayFormat::Hex,
            memory: [0; MEMORY_SIZE],
        }
    }

    pub fn memory(&self, addr: u8) -> u8 {
        self.memory[addr as usize]
    }

    pub fn set_memory(&mut self, addr: u8, value: u8) {
        self.memory[addr as usize] = value;
    }

    /// Back to the power-up state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn set_cc_from(&mut self, value: u8) {
        self.cc = CondCode::from_signed(value as i8);
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Play the recorded script from the top on a fresh machine.
///
/// The cancel flag in `inputs` is armed on entry and polled before
/// every action and during every tick of an interruptible wait; a
/// button press therefore stops playback within one step. Whatever
/// happens, a zeroed keyboard report goes out last so the host never
/// sees a stuck key.
pub fn play<T, D, S>(
    list: &ActionList,
    machine: &mut Machine,
    link: &mut HostLink<T>,
    delay: &mut D,
    store: &mut S,
    inputs: &InputRegisters,
) where
    T: HidTransport,
    D: Delay,
    S: ByteStore,
{
    inputs.clear_cancel();
    machine.reset();
    link.poll_leds();
    run(list, machine, link, delay, store, inputs);
    link.release_keys();
}

fn run<T, D, S>(
    list: &ActionList,
    machine: &mut Machine,
    link: &mut HostLink<T>,
    delay: &mut D,
    store: &mut S,
    inputs: &InputRegisters,
) where
    T: HidTransport,
    D: Delay,
    S: ByteStore,
{
    let len = list.len();
    let mut pc: usize = 0;
    while pc < len {
        if inputs.cancel_requested() {
            break;
        }
        let action = match list.get(pc) {
            Some(a) => a,
            None => break,
        };
        let mut next = pc + 1;
        match action {
            Action::Keyboard { mods, key } => link.keystroke(mods, key),
            Action::ConsumerDevice(usage) => link.consumer_tap(usage),
            Action::SystemControl(usage) => link.system_tap(usage),
            Action::Execute(op, operand) => execute(machine, link, delay, inputs, op, operand),
            Action::Jump { mask, addr } => {
                if let Some(target) = jump_target(mask, addr, pc, len, machine.cc) {
                    next = target;
                }
            }
            Action::Do(f, operand) => match f {
                LocalFn::Save => {
                    // Persist what has been played so far; the save
                    // command itself is not part of the saved script.
                    let prefix = &list.as_slice()[..pc];
                    let cursor = list.focus().min(prefix.len() as u8);
                    store::save(store, cursor, prefix);
                }
                LocalFn::Goto => {
                    if (operand as usize) < len {
                        next = operand as usize;
                    }
                }
                LocalFn::WaitMs => delay.delay_ms(operand as u32),
                LocalFn::WaitSec => wait_interruptible(link, delay, inputs, operand),
                // Editor-side functions have no playback meaning.
                LocalFn::Delete | LocalFn::Redisplay | LocalFn::Load => {}
            },
            Action::Reserved(_) => {}
        }
        pc = next;
    }
}

/// Resolve a jump. `None` means fall through to the next action, which
/// is also the fate of any in-condition jump whose target lies outside
/// the script.
fn jump_target(mask: u8, addr: u8, pc: usize, len: usize, cc: CondCode) -> Option<usize> {
    if mask == cond::RELATIVE {
        let target = (pc as u8).wrapping_add(addr) as usize;
        return (target < len).then_some(target);
    }
    if mask == cond::ALWAYS || cc.matches(mask) {
        let target = addr as usize;
        return (target < len).then_some(target);
    }
    None
}

fn execute<T, D>(
    machine: &mut Machine,
    link: &mut HostLink<T>,
    delay: &mut D,
    inputs: &InputRegisters,
    op: Opcode,
    operand: u8,
) where
    T: HidTransport,
    D: Delay,
{
    match op {
        Opcode::Set => machine.w = operand,
        Opcode::Get => machine.w = machine.memory(operand),
        Opcode::Put => machine.set_memory(operand, machine.w),
        Opcode::CompareImm => {
            let diff = machine.w.wrapping_sub(operand);
            machine.cc = CondCode::from_signed(diff as i8);
        }
        Opcode::Compare => {
            let diff = machine.w.wrapping_sub(machine.memory(operand));
            machine.cc = CondCode::from_signed(diff as i8);
        }
        Opcode::Say => {
            let value = machine.memory(operand);
            match machine.format {
                SayFormat::Char => link.say_char(value),
                SayFormat::Dec => link.say_dec(value),
                SayFormat::Hex => link.say_hex(value),
            }
        }
        Opcode::Format => machine.format = SayFormat::from_operand(operand),
        Opcode::AddImm => {
            machine.w = machine.w.wrapping_add(operand);
            machine.set_cc_from(machine.w);
        }
        Opcode::SubImm => {
            machine.w = machine.w.wrapping_sub(operand);
            machine.set_cc_from(machine.w);
        }
        Opcode::Clear => {
            machine.memory = [operand; MEMORY_SIZE];
        }
        Opcode::Add => {
            machine.w = machine.w.wrapping_add(machine.memory(operand));
            machine.set_cc_from(machine.w);
        }
        Opcode::Sub => {
            machine.w = machine.w.wrapping_sub(machine.memory(operand));
            machine.set_cc_from(machine.w);
        }
        Opcode::Mul => {
            machine.w = machine.w.wrapping_mul(machine.memory(operand));
            machine.set_cc_from(machine.w);
        }
        Opcode::Div => {
            let divisor = machine.memory(operand);
            machine.w = if divisor == 0 {
                0xFF
            } else {
                machine.w / divisor
            };
            machine.set_cc_from(machine.w);
        }
        Opcode::WaitMs => delay.delay_ms(operand as u32),
        Opcode::WaitSec => wait_interruptible(link, delay, inputs, operand),
    }
}

/// Wait up to `seconds`, polling for cancellation every few ms. Keys
/// are released first so the host does not auto-repeat through a long
/// pause.
fn wait_interruptible<T, D>(
    link: &mut HostLink<T>,
    delay: &mut D,
    inputs: &InputRegisters,
    seconds: u8,
) where
    T: HidTransport,
    D: Delay,
{
    link.release_keys();
    let ticks = WAIT_TICKS_PER_SECOND as u32 * seconds as u32;
    for _ in 0..ticks {
        if inputs.cancel_requested() {
            break;
        }
        delay.delay_ms(WAIT_TICK_MS);
    }
}
