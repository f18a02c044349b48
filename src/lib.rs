//! Core logic for pub-button, a programmable USB button.
//!
//! A single rotary knob with a push switch records a script of packed
//! 16-bit actions and replays it as USB HID traffic: keystrokes,
//! consumer device commands, system control commands, plus a tiny
//! interpreter with an accumulator, 256 bytes of memory and conditional
//! jumps. The device has no display; all feedback is typed into a text
//! editor on the host.
//!
//! Everything in this library is pure and host-testable
//! (`cargo test`). The embedded binary (`src/main.rs`, behind the
//! `embedded` feature) wires these modules to Embassy on an nRF52840:
//! GPIOTE for the knob, `embassy-usb` for the HID transport, internal
//! flash for the persistent store.

#![cfg_attr(not(test), no_std)]

pub mod action;
pub mod config;
pub mod device;
pub mod encoder;
pub mod error;
pub mod hid;
pub mod host;
pub mod input;
pub mod interp;
pub mod program;
pub mod store;
pub mod tables;

pub use action::{Action, ActionList, Modifiers};
pub use device::{Device, Mode};
pub use encoder::{Direction, QuadratureDecoder};
pub use error::Error;
pub use hid::{Delay, HidTransport, LedIndicators};
pub use host::HostLink;
pub use input::InputRegisters;
pub use interp::Machine;
pub use store::{ByteStore, MemStore};
