//! Gray-code transition table

/// Two-bit phase state, `(A << 1) | B`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseState(u8);

impl PhaseState {
    /// Both phases low
    pub const ZERO: PhaseState = PhaseState(0);

    /// Build from sampled phase levels
    pub const fn from_levels(a: bool, b: bool) -> Self {
        PhaseState(((a as u8) << 1) | (b as u8))
    }

    /// Build from raw bits; only the low two bits are kept
    pub const fn from_bits(bits: u8) -> Self {
        PhaseState(bits & 0b11)
    }

    /// Raw two-bit value
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Step direction for each `[from][to]` phase transition
///
/// `+1`/`-1` are the two legal single-step moves out of each state;
/// `0` marks a no-op or an illegal double step.
pub const TRANSITION_TABLE: [[i8; 4]; 4] = [
    [0, 1, -1, 0],
    [-1, 0, 0, 1],
    [1, 0, 0, -1],
    [0, -1, 1, 0],
];

/// Look up the step direction of a transition
pub const fn transition_delta(from: PhaseState, to: PhaseState) -> i8 {
    TRANSITION_TABLE[from.0 as usize][to.0 as usize]
}
