//! Debounced quadrature decoder for the rotary knob.
//!
//! The two encoder pins are sampled on every change interrupt and fed
//! through a seven-state transition table. A detent is reported only
//! after the full Begin -> 1 -> 2 -> 3 -> Begin sequence is traversed in
//! one direction; any out-of-sequence sample falls back toward Begin.
//! Contact bounce and partial detents therefore cancel out without any
//! software delay loops.

/// One completed detent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Clockwise,
    Anticlockwise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Begin,
    Cw1,
    Cw2,
    Cw3,
    Ac1,
    Ac2,
    Ac3,
}

use State::*;

/// Next state indexed by `[current state][BA sample]`.
///
/// Sample index is `b << 1 | a`. The table is the classic Buxton
/// full-step decode: three intermediate states per direction, with the
/// detent emitted on the final 11 sample.
const TRANSITIONS: [[State; 4]; 7] = [
    //            00     01     10     11
    /* Begin */ [Begin, Ac1, Cw1, Begin],
    /* Cw1   */ [Cw2, Begin, Cw1, Begin],
    /* Cw2   */ [Cw2, Cw3, Cw2, Begin],
    /* Cw3   */ [Cw2, Cw3, Begin, Begin], // 11 completes a CW detent
    /* Ac1   */ [Ac2, Ac1, Begin, Begin],
    /* Ac2   */ [Ac2, Ac1, Ac3, Begin],
    /* Ac3   */ [Ac2, Begin, Ac3, Begin], // 11 completes an AC detent
];

/// Quadrature state machine. One per encoder; updated from the pin
/// change interrupt, never read anywhere else.
#[derive(Debug)]
pub struct QuadratureDecoder {
    state: State,
}

impl QuadratureDecoder {
    pub const fn new() -> Self {
        Self { state: State::Begin }
    }

    /// Feed one (A, B) pin sample. Returns a direction only when this
    /// sample completes a full detent.
    pub fn sample(&mut self, a: bool, b: bool) -> Option<Direction> {
        let ab = (b as usize) << 1 | a as usize;
        let completed = match (self.state, ab) {
            (Cw3, 0b11) => Some(Direction::Clockwise),
            (Ac3, 0b11) => Some(Direction::Anticlockwise),
            _ => None,
        };
        self.state = TRANSITIONS[self.state as usize][ab];
        completed
    }
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(dec: &mut QuadratureDecoder, samples: &[(bool, bool)]) -> i32 {
        let mut net = 0;
        for &(a, b) in samples {
            match dec.sample(a, b) {
                Some(Direction::Clockwise) => net += 1,
                Some(Direction::Anticlockwise) => net -= 1,
                None => {}
            }
        }
        net
    }

    // Resting position between detents is 11 (both pins pulled up).
    const CW_DETENT: [(bool, bool); 4] =
        [(false, true), (false, false), (true, false), (true, true)];
    const AC_DETENT: [(bool, bool); 4] =
        [(true, false), (false, false), (false, true), (true, true)];

    #[test]
    fn clockwise_detent_counts_once() {
        let mut dec = QuadratureDecoder::new();
        assert_eq!(feed(&mut dec, &CW_DETENT), 1);
    }

    #[test]
    fn anticlockwise_detent_counts_once() {
        let mut dec = QuadratureDecoder::new();
        assert_eq!(feed(&mut dec, &AC_DETENT), -1);
    }

    #[test]
    fn repeated_detents_accumulate() {
        let mut dec = QuadratureDecoder::new();
        let mut net = 0;
        for _ in 0..5 {
            net += feed(&mut dec, &CW_DETENT);
        }
        assert_eq!(net, 5);
    }

    #[test]
    fn bounce_on_one_pin_is_rejected() {
        let mut dec = QuadratureDecoder::new();
        // A chattering pin repeats the same intermediate sample.
        let noisy = [
            (false, true),
            (false, true),
            (false, false),
            (false, false),
            (true, false),
            (true, false),
            (true, true),
        ];
        assert_eq!(feed(&mut dec, &noisy), 1);
    }

    #[test]
    fn partial_detent_then_return_produces_nothing() {
        let mut dec = QuadratureDecoder::new();
        // Half a clockwise turn, then back to rest.
        let partial = [(false, true), (false, false), (false, true), (true, true)];
        assert_eq!(feed(&mut dec, &partial), 0);
    }

    #[test]
    fn out_of_sequence_samples_produce_no_event() {
        let mut dec = QuadratureDecoder::new();
        // Jumping between opposite phases never completes a sequence.
        let garbage = [
            (true, true),
            (false, false),
            (true, true),
            (false, false),
            (true, false),
            (false, true),
            (true, true),
        ];
        assert_eq!(feed(&mut dec, &garbage), 0);
    }

    #[test]
    fn direction_reversal_mid_detent_cancels() {
        let mut dec = QuadratureDecoder::new();
        let reversed = [
            (false, true),  // CW start
            (false, false), // CW second
            (true, true),   // back to rest, sequence abandoned
            (true, false),  // AC start
            (false, false), // AC second
            (true, true),   // back to rest again
        ];
        assert_eq!(feed(&mut dec, &reversed), 0);
    }
}
