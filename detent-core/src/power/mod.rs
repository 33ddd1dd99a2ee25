//! Active/sleep power management
//!
//! The power button's release puts the panel to sleep; the same pin
//! wakes it. The state table is pure; [`PowerController`] performs the
//! side effects in the required order.

pub mod controller;
pub mod machine;

pub use controller::{PowerConfig, PowerController};
pub use machine::{PowerEvent, PowerState};
