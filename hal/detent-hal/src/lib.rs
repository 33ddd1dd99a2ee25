//! Detent Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the front-panel core needs from
//! a chip-specific HAL. The core only ever samples pin levels and asks the
//! platform to sleep, so the surface is deliberately small.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  detent-firmware (embassy tasks)        │
//! └─────────────────────────────────────────┘
//!            │                    │
//!            ▼                    ▼
//! ┌───────────────────┐  ┌───────────────────┐
//! │   detent-core     │  │ detent-hal-rp2040 │
//! └───────────────────┘  └───────────────────┘
//!            │                    │
//!            └─────────┬──────────┘
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │  detent-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital input sampling
//! - [`power::SleepControl`] - Wake source arming and processor suspend

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod power;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLevel, InputPin};
pub use power::SleepControl;
