//! Setpoint range and step configuration

use crate::config::ConfigError;

/// Setpoint configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetpointConfig {
    /// Value at power-on
    pub initial: f32,
    /// Lower clamp bound
    pub min: f32,
    /// Upper clamp bound
    pub max: f32,
    /// Step per detent in fine mode
    pub fine_step: f32,
    /// Step per detent in coarse mode
    pub coarse_step: f32,
    /// Inactivity before a pending edit is rolled back
    pub confirm_timeout_ms: u32,
    /// Start in fine-step mode
    pub start_fine: bool,
}

impl Default for SetpointConfig {
    fn default() -> Self {
        Self {
            initial: 5.0,
            min: 2.0,
            max: 15.0,
            fine_step: 0.1,
            coarse_step: 1.0,
            confirm_timeout_ms: 5000,
            start_fine: true,
        }
    }
}

impl SetpointConfig {
    /// Check range and step sanity
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min < self.max) {
            return Err(ConfigError::InvalidRange);
        }
        if !(self.min <= self.initial && self.initial <= self.max) {
            return Err(ConfigError::InitialOutOfRange);
        }
        if !(self.fine_step > 0.0 && self.coarse_step > 0.0) {
            return Err(ConfigError::InvalidStep);
        }
        if self.confirm_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }
}
