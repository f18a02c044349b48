//! Top-level device behavior: run mode and the switch into programming.
//!
//! In run mode a short press replays the script and a long press opens
//! the programming menu. The platform layer calls [`Device::poll`] from
//! its main loop; everything else (edge detection, countdowns, event
//! dispatch) happens here so the embedded binary stays a thin shell.

use crate::action::ActionList;
use crate::config::LONG_PRESS_TICKS;
use crate::hid::{Delay, HidTransport};
use crate::host::HostLink;
use crate::input::InputRegisters;
use crate::interp::{self, Machine};
use crate::program::{Controller, Event, Status};
use crate::store::{self, ByteStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Run,
    Program,
}

/// The whole device: script, interpreter, editor and transport.
pub struct Device<T: HidTransport, D: Delay, S: ByteStore> {
    mode: Mode,
    list: ActionList,
    machine: Machine,
    controller: Controller,
    link: HostLink<T>,
    delay: D,
    store: S,
    pressed: bool,
    long_press_left: u16,
    /// The release ending the press that opened the menu is not an
    /// editor gesture.
    swallow_release: bool,
}

impl<T: HidTransport, D: Delay, S: ByteStore> Device<T, D, S> {
    /// Bring the device up, reloading the saved script.
    pub fn new(transport: T, delay: D, store: S) -> Self {
        let list = store::load(&store);
        Self {
            mode: Mode::Run,
            list,
            machine: Machine::new(),
            controller: Controller::new(),
            link: HostLink::new(transport),
            delay,
            store,
            pressed: false,
            long_press_left: 0,
            swallow_release: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn list(&self) -> &ActionList {
        &self.list
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn link_mut(&mut self) -> &mut HostLink<T> {
        &mut self.link
    }

    /// Platform access to the byte store, e.g. for deferred flash flushes.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// One iteration of the foreground loop: drain the input registers
    /// and advance whichever mode is active.
    pub fn poll(&mut self, inputs: &InputRegisters) {
        self.link.poll_leds();

        let rotation = inputs.take_rotation();
        let ticks = inputs.take_ticks();
        let now_pressed = inputs.is_pressed();
        let press_edge = now_pressed && !self.pressed;
        let release_edge = !now_pressed && self.pressed;
        self.pressed = now_pressed;

        match self.mode {
            Mode::Run => self.poll_run(inputs, press_edge, release_edge, ticks),
            Mode::Program => self.poll_program(rotation, press_edge, release_edge, ticks),
        }
    }

    fn poll_run(
        &mut self,
        inputs: &InputRegisters,
        press_edge: bool,
        release_edge: bool,
        ticks: u8,
    ) {
        if press_edge {
            self.long_press_left = LONG_PRESS_TICKS;
        }
        if self.pressed {
            self.long_press_left = self.long_press_left.saturating_sub(ticks as u16);
            if self.long_press_left == 0 {
                // Held for a second: open the programming menu. The
                // eventual release belongs to this press, not the editor.
                self.mode = Mode::Program;
                self.swallow_release = true;
                self.controller.enter(&self.list, &mut self.link);
            }
        } else if release_edge {
            if self.swallow_release {
                self.swallow_release = false;
            } else {
                interp::play(
                    &self.list,
                    &mut self.machine,
                    &mut self.link,
                    &mut self.delay,
                    &mut self.store,
                    inputs,
                );
            }
        }
    }

    fn poll_program(&mut self, rotation: i8, press_edge: bool, release_edge: bool, ticks: u8) {
        if press_edge {
            self.swallow_release = false;
            self.feed(Event::Pressed);
        }
        if rotation != 0 {
            self.feed(Event::Turned(rotation));
        }
        if release_edge {
            if self.swallow_release {
                self.swallow_release = false;
            } else {
                self.feed(Event::Released);
            }
        }
        for _ in 0..ticks {
            if self.mode == Mode::Run {
                break;
            }
            self.feed(Event::Tick);
        }
    }

    fn feed(&mut self, event: Event) {
        let status = self
            .controller
            .step(event, &mut self.list, &mut self.link, &mut self.store);
        if status == Status::Exited {
            self.mode = Mode::Run;
            // If the exit gesture is still held, its release must not
            // start a playback.
            if self.pressed {
                self.swallow_release = true;
            }
        }
    }
}
