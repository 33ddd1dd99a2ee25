//! Confirmable setpoint with step modes and timeout rollback
//!
//! The setpoint moves between two states:
//!
//! ```text
//!             rotation                 rotation
//! Confirmed ───────────────► Pending ◄──────────┐
//!     ▲                         │ │             │
//!     │   confirm / timeout     │ └─────────────┘
//!     └─────────────────────────┘
//! ```
//!
//! The first rotation after a confirm captures the value to roll back
//! to. A periodic check restores it if no confirm arrives in time.

pub mod config;
pub mod controller;

pub use config::SetpointConfig;
pub use controller::{SetpointController, SetpointSnapshot, ANOMALY_THRESHOLD};
