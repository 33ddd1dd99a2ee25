//! Board-agnostic core logic for the Detent front panel
//!
//! This crate turns raw, interrupt-driven panel signals into a trustworthy
//! setpoint and a power state. Nothing here touches hardware directly:
//!
//! - Quadrature decoding with sub-step aggregation and anti-bounce
//! - Debounced press/release detection for momentary buttons
//! - Setpoint editing with confirm, timeout and rollback
//! - Active/sleep power state machine with wake-artifact handling
//! - Level-triggered notification flags for the presentation layer
//! - Panel configuration types and parser
//!
//! Time is passed in explicitly as milliseconds since boot, so every
//! state machine here is deterministic and host-testable.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod encoder;
pub mod events;
pub mod input;
pub mod power;
pub mod setpoint;
pub mod traits;

/// Milliseconds since boot
pub type Millis = u64;
