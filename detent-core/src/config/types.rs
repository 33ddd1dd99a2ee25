//! Configuration types

use detent_hal::ActiveLevel;
use heapless::Vec;

use super::error::ConfigError;
use crate::encoder::BOUNCE_WINDOW_MS;
use crate::input::DebounceConfig;

pub use crate::power::PowerConfig;
pub use crate::setpoint::SetpointConfig;

/// Most inputs a panel can configure (2 phases + 3 buttons)
pub const MAX_INPUTS: usize = 5;

/// GPIO pin configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (pull-up wiring)
    pub inverted: bool,
}

impl PinConfig {
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }

    /// Level at which this input counts as asserted
    pub const fn active_level(&self) -> ActiveLevel {
        ActiveLevel::from_inverted(self.inverted)
    }
}

/// Rotary encoder wiring and tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    pub pin_a: PinConfig,
    pub pin_b: PinConfig,
    /// Swap phases at boot
    pub reverse: bool,
    /// Opposite-direction steps this soon after a detent are bounce
    pub bounce_window_ms: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            pin_a: PinConfig::new(16),
            pin_b: PinConfig::new(17),
            reverse: false,
            bounce_window_ms: BOUNCE_WINDOW_MS as u32,
        }
    }
}

/// Button wiring and debounce timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonsConfig {
    /// Confirm button (optional)
    pub confirm: Option<PinConfig>,
    /// Fine/coarse step button (optional)
    pub step: Option<PinConfig>,
    /// Power button, also the wake source
    pub power: PinConfig,
    pub debounce_ms: u32,
    pub resample_delay_us: u32,
    pub stuck_release_ms: u32,
    /// Cadence of the stuck-press check
    pub consistency_period_ms: u32,
}

impl Default for ButtonsConfig {
    fn default() -> Self {
        let debounce = DebounceConfig::default();
        Self {
            confirm: Some(PinConfig::new(21)),
            step: Some(PinConfig::new(20)),
            power: PinConfig::new(19),
            debounce_ms: debounce.debounce_ms,
            resample_delay_us: debounce.resample_delay_us,
            stuck_release_ms: debounce.stuck_release_ms,
            consistency_period_ms: 500,
        }
    }
}

impl ButtonsConfig {
    /// Debounce timing shared by all buttons
    pub fn debounce(&self) -> DebounceConfig {
        DebounceConfig {
            debounce_ms: self.debounce_ms,
            resample_delay_us: self.resample_delay_us,
            stuck_release_ms: self.stuck_release_ms,
        }
    }
}

/// Complete front-panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    pub encoder: EncoderConfig,
    pub buttons: ButtonsConfig,
    pub setpoint: SetpointConfig,
    pub power: PowerConfig,
}

impl PanelConfig {
    /// Check the whole configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.setpoint.validate()?;

        if self.encoder.pin_a.pin == self.encoder.pin_b.pin {
            return Err(ConfigError::SamePhasePins);
        }

        let mut seen: Vec<u8, MAX_INPUTS> = Vec::new();
        for pin in self.input_pins() {
            if seen.contains(&pin.pin) {
                return Err(ConfigError::DuplicatePin(pin.pin));
            }
            // Capacity equals the number of inputs
            let _ = seen.push(pin.pin);
        }

        let b = &self.buttons;
        if b.debounce_ms == 0 || b.consistency_period_ms == 0 || b.stuck_release_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.power.run_flag_timeout_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }

        Ok(())
    }

    /// Every configured input pin
    pub fn input_pins(&self) -> impl Iterator<Item = PinConfig> {
        [
            Some(self.encoder.pin_a),
            Some(self.encoder.pin_b),
            self.buttons.confirm,
            self.buttons.step,
            Some(self.buttons.power),
        ]
        .into_iter()
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(PanelConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_factory_pins() {
        let cfg = PanelConfig::default();
        let pins: std::vec::Vec<u8> = cfg.input_pins().map(|p| p.pin).collect();
        assert_eq!(pins, [16, 17, 21, 20, 19]);
    }

    #[test]
    fn test_same_phase_pins_rejected() {
        let mut cfg = PanelConfig::default();
        cfg.encoder.pin_b = cfg.encoder.pin_a;
        assert_eq!(cfg.validate(), Err(ConfigError::SamePhasePins));
    }

    #[test]
    fn test_duplicate_button_pin_rejected() {
        let mut cfg = PanelConfig::default();
        cfg.buttons.step = Some(PinConfig::inverted(19));
        assert_eq!(cfg.validate(), Err(ConfigError::DuplicatePin(19)));
    }

    #[test]
    fn test_optional_buttons_skipped() {
        let mut cfg = PanelConfig::default();
        cfg.buttons.confirm = None;
        cfg.buttons.step = None;
        assert_eq!(cfg.input_pins().count(), 3);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_setpoint_errors_propagate() {
        let mut cfg = PanelConfig::default();
        cfg.setpoint.coarse_step = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidStep));
    }

    #[test]
    fn test_zero_debounce_rejected() {
        let mut cfg = PanelConfig::default();
        cfg.buttons.debounce_ms = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPeriod));
    }

    #[test]
    fn test_active_level() {
        assert_eq!(PinConfig::new(3).active_level(), ActiveLevel::High);
        assert_eq!(PinConfig::inverted(3).active_level(), ActiveLevel::Low);
    }
}
