//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! `channels`.

pub mod acquisition;
pub mod button;
pub mod cadence;
pub mod encoder;
pub mod panel;
pub mod power;
pub mod setpoint;

pub use acquisition::acquisition_gate_task;
pub use button::button_task;
pub use encoder::encoder_task;
pub use panel::panel_task;
pub use power::{power_task, PanelPower};
pub use setpoint::setpoint_task;
