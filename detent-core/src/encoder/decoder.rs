//! Detent-aggregating quadrature decoder
//!
//! Each phase edge is looked up in [`TRANSITION_TABLE`]. Four consistent
//! single steps make one mechanical detent, which moves the count by
//! exactly one regardless of how much the contacts bounced in between.
//!
//! [`TRANSITION_TABLE`]: super::table::TRANSITION_TABLE

use super::table::{transition_delta, PhaseState};
use crate::Millis;

/// Gray-code steps per mechanical detent
pub const STEPS_PER_DETENT: u8 = 4;

/// Window after a detent in which an opposite-direction step is bounce
pub const BOUNCE_WINDOW_MS: Millis = 5;

/// What a single phase edge did to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseOutcome {
    /// Same phase state as before (duplicate interrupt)
    Duplicate,
    /// No-op or illegal double-step transition
    Illegal,
    /// Opposite-direction step right after a detent, discarded
    Bounce,
    /// Valid step accumulated toward a detent
    Partial,
    /// A full detent was committed in this direction (+1 / -1)
    Detent(i8),
}

/// Decoder state
///
/// Pure state machine; the caller provides sampled phase levels and a
/// timestamp. See [`SharedEncoder`](super::SharedEncoder) for the
/// interrupt-safe wrapper.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    /// Phase state seen on the previous edge
    last_phase: PhaseState,
    /// Consistent single steps accumulated toward the current detent
    step_sequence: u8,
    /// Direction of the in-progress detent (0 = none yet)
    step_direction: i8,
    /// Committed detents not yet read by the consumer
    count: i32,
    /// Direction of the last committed detent (0 = none yet)
    last_direction: i8,
    /// When the last detent was committed
    last_commit_ms: Millis,
    /// Window for the anti-bounce rule
    bounce_window_ms: Millis,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new(PhaseState::ZERO)
    }
}

impl QuadratureDecoder {
    /// Create a decoder seeded with the current phase state
    pub const fn new(initial: PhaseState) -> Self {
        Self {
            last_phase: initial,
            step_sequence: 0,
            step_direction: 0,
            count: 0,
            last_direction: 0,
            last_commit_ms: 0,
            bounce_window_ms: BOUNCE_WINDOW_MS,
        }
    }

    /// Override the anti-bounce window
    pub const fn with_bounce_window(mut self, window_ms: Millis) -> Self {
        self.bounce_window_ms = window_ms;
        self
    }

    /// Clear all decode state and re-seed the phase
    pub fn reset(&mut self, phase: PhaseState) {
        let window = self.bounce_window_ms;
        *self = Self::new(phase).with_bounce_window(window);
    }

    /// Feed one sampled phase state
    pub fn on_phase(&mut self, current: PhaseState, now_ms: Millis) -> PhaseOutcome {
        if current == self.last_phase {
            return PhaseOutcome::Duplicate;
        }

        let delta = transition_delta(self.last_phase, current);
        self.last_phase = current;

        if delta == 0 {
            return PhaseOutcome::Illegal;
        }

        // Opposite step shortly after a committed detent is contact bounce
        if self.last_direction != 0
            && delta != self.last_direction
            && now_ms.saturating_sub(self.last_commit_ms) < self.bounce_window_ms
        {
            return PhaseOutcome::Bounce;
        }

        // Direction reversed mid-detent: start counting again
        if self.step_direction != 0 && delta != self.step_direction {
            self.step_sequence = 0;
        }
        self.step_direction = delta;
        self.step_sequence += 1;

        if self.step_sequence >= STEPS_PER_DETENT {
            self.count = self.count.saturating_add(delta as i32);
            self.step_sequence = 0;
            self.last_direction = delta;
            self.last_commit_ms = now_ms;
            return PhaseOutcome::Detent(delta);
        }

        PhaseOutcome::Partial
    }

    /// Return the committed count and clear it
    pub fn take_count(&mut self) -> i32 {
        core::mem::take(&mut self.count)
    }

    /// Committed count without clearing
    pub fn count(&self) -> i32 {
        self.count
    }

    /// Phase state seen on the previous edge
    pub fn last_phase(&self) -> PhaseState {
        self.last_phase
    }

    /// Steps accumulated toward the in-progress detent
    pub fn step_sequence(&self) -> u8 {
        self.step_sequence
    }

    /// Direction of the in-progress detent
    pub fn step_direction(&self) -> i8 {
        self.step_direction
    }
}
