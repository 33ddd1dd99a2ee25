//! Interrupt-safe encoder state
//!
//! The decoder is mutated from the phase-edge handler and drained by the
//! setpoint task. Every access goes through a short critical section, so
//! the handler never observes a half-updated decoder and a read-and-clear
//! can never lose a detent committed concurrently.

use core::cell::RefCell;

use critical_section::Mutex;

use super::decoder::{PhaseOutcome, QuadratureDecoder};
use super::table::PhaseState;
use crate::events::{EventFlags, Flags};
use crate::Millis;

struct Inner {
    decoder: QuadratureDecoder,
    /// Physical A/B are exchanged before decoding
    swapped: bool,
}

impl Inner {
    fn phase(&self, a: bool, b: bool) -> PhaseState {
        if self.swapped {
            PhaseState::from_levels(b, a)
        } else {
            PhaseState::from_levels(a, b)
        }
    }
}

/// Encoder shared between edge handler and consumer
pub struct SharedEncoder<'a> {
    inner: Mutex<RefCell<Inner>>,
    flags: &'a EventFlags,
}

impl<'a> SharedEncoder<'a> {
    /// Create an encoder that raises [`Flags::ROTATION_UPDATE`] on `flags`
    pub const fn new(flags: &'a EventFlags) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                decoder: QuadratureDecoder::new(PhaseState::ZERO),
                swapped: false,
            })),
            flags,
        }
    }

    /// Seed from the current phase levels and apply tuning
    ///
    /// Must run before the edge handler is enabled so the first edge is
    /// compared against the real resting state.
    pub fn init(&self, a: bool, b: bool, reversed: bool, bounce_window_ms: Millis) {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            inner.swapped = reversed;
            let phase = inner.phase(a, b);
            inner.decoder = QuadratureDecoder::new(phase).with_bounce_window(bounce_window_ms);
        });
    }

    /// Handle one phase edge (called from interrupt context)
    pub fn on_edge(&self, a: bool, b: bool, now_ms: Millis) -> PhaseOutcome {
        let outcome = critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            let phase = inner.phase(a, b);
            inner.decoder.on_phase(phase, now_ms)
        });

        if let PhaseOutcome::Detent(_) = outcome {
            self.flags.set(Flags::ROTATION_UPDATE);
        }
        outcome
    }

    /// Return committed detents since the previous read, and clear them
    pub fn read(&self) -> i32 {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).decoder.take_count())
    }

    /// Committed detents without clearing
    pub fn peek(&self) -> i32 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).decoder.count())
    }

    /// Flip the logical rotation direction
    ///
    /// Swaps the roles of the physical phase inputs and clears all decode
    /// state, including unread detents. Returns the new orientation.
    pub fn reverse_direction(&self, a: bool, b: bool) -> bool {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            inner.swapped = !inner.swapped;
            let phase = inner.phase(a, b);
            inner.decoder.reset(phase);
            inner.swapped
        })
    }

    /// True if the phase inputs are currently swapped
    pub fn is_reversed(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow_ref(cs).swapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Physical (a, b) levels for one clockwise detent from rest
    const CW_LEVELS: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];

    fn turn(enc: &SharedEncoder<'_>, levels: &[(bool, bool)], t0: Millis) {
        for (i, &(a, b)) in levels.iter().enumerate() {
            enc.on_edge(a, b, t0 + i as Millis * 2);
        }
    }

    #[test]
    fn test_detent_raises_rotation_flag() {
        let flags = EventFlags::new();
        let enc = SharedEncoder::new(&flags);
        enc.init(false, false, false, 5);

        turn(&enc, &CW_LEVELS[..3], 0);
        assert!(flags.peek().is_empty());

        enc.on_edge(false, false, 10);
        assert!(flags.peek().contains(Flags::ROTATION_UPDATE));
        assert_eq!(enc.peek(), 1);
    }

    #[test]
    fn test_read_is_read_and_clear() {
        let flags = EventFlags::new();
        let enc = SharedEncoder::new(&flags);
        enc.init(false, false, false, 5);

        turn(&enc, &CW_LEVELS, 0);
        turn(&enc, &CW_LEVELS, 100);
        assert_eq!(enc.read(), 2);
        assert_eq!(enc.read(), 0);
    }

    #[test]
    fn test_reverse_direction_flips_sign() {
        let flags = EventFlags::new();
        let enc = SharedEncoder::new(&flags);
        enc.init(false, false, false, 5);

        turn(&enc, &CW_LEVELS, 0);
        assert_eq!(enc.peek(), 1);

        assert!(enc.reverse_direction(false, false));
        // Unread detents are discarded with the rest of the state
        assert_eq!(enc.peek(), 0);

        turn(&enc, &CW_LEVELS, 100);
        assert_eq!(enc.read(), -1);
    }

    #[test]
    fn test_init_reversed() {
        let flags = EventFlags::new();
        let enc = SharedEncoder::new(&flags);
        enc.init(false, false, true, 5);
        assert!(enc.is_reversed());

        turn(&enc, &CW_LEVELS, 0);
        assert_eq!(enc.read(), -1);
    }

    #[test]
    fn test_reverse_twice_restores() {
        let flags = EventFlags::new();
        let enc = SharedEncoder::new(&flags);
        enc.init(false, false, false, 5);
        enc.reverse_direction(false, false);
        assert!(!enc.reverse_direction(false, false));

        turn(&enc, &CW_LEVELS, 0);
        assert_eq!(enc.read(), 1);
    }
}
