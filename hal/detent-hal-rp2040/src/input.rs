//! Panel inputs
//!
//! A GPIO input with the pull chosen from its active level: pull-down for
//! active-high buttons, pull-up for active-low ones.

use detent_core::config::PinConfig;
use detent_hal::{ActiveLevel, InputPin};
use embassy_rp::gpio::{Input, Pull};

use crate::pins::{PinBank, PinError};

/// Edge-awaitable front-panel input
pub struct PanelInput<'d> {
    input: Input<'d>,
    pin: u8,
    active: ActiveLevel,
}

impl PanelInput<'static> {
    /// Take the configured pin from the bank and set it up as an input
    pub fn from_config(bank: &mut PinBank, cfg: &PinConfig) -> Result<Self, PinError> {
        let pin = bank.take(cfg.pin)?;
        let active = cfg.active_level();
        let pull = match active {
            ActiveLevel::High => Pull::Down,
            ActiveLevel::Low => Pull::Up,
        };
        Ok(Self {
            input: Input::new(pin, pull),
            pin: cfg.pin,
            active,
        })
    }
}

impl PanelInput<'_> {
    /// GPIO number
    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn active_level(&self) -> ActiveLevel {
        self.active
    }

    /// Wait for the next rising or falling edge
    pub async fn wait_for_any_edge(&mut self) {
        self.input.wait_for_any_edge().await
    }
}

impl InputPin for PanelInput<'_> {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}
