//! RP2040-specific HAL for the front panel
//!
//! This crate provides RP2040 implementations of the `detent-hal`
//! traits:
//!
//! - Config-driven GPIO allocation by pin number
//! - Edge-awaitable panel inputs (implements `detent_hal::InputPin`)
//! - Level-triggered GPIO wake and WFI suspend
//!   (implements `detent_hal::SleepControl`)

#![no_std]

pub mod input;
pub mod pins;
pub mod sleep;

pub use input::PanelInput;
pub use pins::{PinBank, PinError};
pub use sleep::Rp2040Sleep;
