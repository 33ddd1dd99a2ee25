//! Debounced momentary buttons
//!
//! The edge handler only classifies the raw level into a [`ButtonEdge`]
//! and queues it. A consumer task feeds queued edges to a
//! [`ButtonDebouncer`], which turns them into at most one logical press
//! and one logical release per physical actuation.

pub mod debounce;
pub mod role;

pub use debounce::{ButtonDebouncer, ButtonEdge, ButtonEvent, DebounceConfig};
pub use role::ButtonRole;
