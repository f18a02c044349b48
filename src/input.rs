//! Shared state between the interrupt context and the foreground loop.
//!
//! Each field has exactly one writer side and one reader side:
//!
//! - `rotation` - accumulated by the pin-change interrupt (one count per
//!   detent), drained by the foreground loop.
//! - `pressed` - knob switch level, written by the interrupt, read by
//!   the foreground loop.
//! - `cancel` - raised by the interrupt on any press, cleared by the
//!   interpreter when playback starts and polled once per instruction
//!   and once per wait tick.
//! - `ticks` - elapsed timer ticks, incremented by the timer interrupt,
//!   drained by the foreground loop for long-press and inactivity
//!   countdowns.
//!
//! Plain relaxed atomics are sufficient: there is no true concurrency
//! beyond this single-producer/single-consumer relationship.

use crate::encoder::Direction;
use core::sync::atomic::{AtomicBool, AtomicI8, AtomicU8, Ordering};

/// Interrupt-to-foreground event registers.
#[derive(Debug, Default)]
pub struct InputRegisters {
    rotation: AtomicI8,
    pressed: AtomicBool,
    cancel: AtomicBool,
    ticks: AtomicU8,
}

impl InputRegisters {
    pub const fn new() -> Self {
        Self {
            rotation: AtomicI8::new(0),
            pressed: AtomicBool::new(false),
            cancel: AtomicBool::new(false),
            ticks: AtomicU8::new(0),
        }
    }

    /// Interrupt side: record one completed detent. Saturates so a
    /// stalled foreground loop cannot wrap the counter.
    pub fn record_detent(&self, dir: Direction) {
        let delta: i8 = match dir {
            Direction::Clockwise => 1,
            Direction::Anticlockwise => -1,
        };
        let _ = self
            .rotation
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_add(delta))
            });
    }

    /// Foreground side: take and clear the pending rotation. Non-zero
    /// means "one or more detents in that direction".
    pub fn take_rotation(&self) -> i8 {
        self.rotation.swap(0, Ordering::Relaxed)
    }

    /// Interrupt side: record the knob switch level. A press also
    /// raises the playback cancellation flag.
    pub fn set_pressed(&self, pressed: bool) {
        self.pressed.store(pressed, Ordering::Relaxed);
        if pressed {
            self.cancel.store(true, Ordering::Relaxed);
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Relaxed)
    }

    /// Foreground side: arm a fresh playback.
    pub fn clear_cancel(&self) {
        self.cancel.store(false, Ordering::Relaxed);
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Interrupt side: one timer tick elapsed.
    pub fn record_tick(&self) {
        let _ = self
            .ticks
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_add(1))
            });
    }

    /// Foreground side: take the elapsed tick count since the last drain.
    pub fn take_ticks(&self) -> u8 {
        self.ticks.swap(0, Ordering::Relaxed)
    }
}
