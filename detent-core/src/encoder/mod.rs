//! Quadrature rotary encoder decoding
//!
//! Phase edges are decoded with a 4x4 transition table, aggregated into
//! full mechanical detents and accumulated in a counter that a consumer
//! drains with read-and-clear semantics.

pub mod decoder;
pub mod shared;
pub mod table;

pub use decoder::{PhaseOutcome, QuadratureDecoder, BOUNCE_WINDOW_MS, STEPS_PER_DETENT};
pub use shared::SharedEncoder;
pub use table::{transition_delta, PhaseState, TRANSITION_TABLE};
