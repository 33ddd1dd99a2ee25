//! What each front-panel button does

use super::debounce::ButtonEvent;
use crate::events::Flags;

/// Front-panel button roles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonRole {
    /// Confirm the pending setpoint (acts on press)
    Confirm,
    /// Switch between fine and coarse steps (acts on release)
    StepToggle,
    /// Sleep/wake (acts on release, handled by the power controller)
    Power,
}

impl ButtonRole {
    /// Notification flag raised for a debounced event, if any
    pub fn request_for(self, event: ButtonEvent) -> Option<Flags> {
        match (self, event) {
            (ButtonRole::Confirm, ButtonEvent::Pressed) => Some(Flags::CONFIRM_REQUESTED),
            (ButtonRole::StepToggle, ButtonEvent::Released) => Some(Flags::STEP_TOGGLE_REQUESTED),
            _ => None,
        }
    }

    /// Task-pool name for logging
    pub fn name(self) -> &'static str {
        match self {
            ButtonRole::Confirm => "confirm",
            ButtonRole::StepToggle => "step",
            ButtonRole::Power => "power",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_fires_on_press() {
        assert_eq!(
            ButtonRole::Confirm.request_for(ButtonEvent::Pressed),
            Some(Flags::CONFIRM_REQUESTED)
        );
        assert_eq!(ButtonRole::Confirm.request_for(ButtonEvent::Released), None);
    }

    #[test]
    fn test_step_fires_on_release() {
        assert_eq!(ButtonRole::StepToggle.request_for(ButtonEvent::Pressed), None);
        assert_eq!(
            ButtonRole::StepToggle.request_for(ButtonEvent::Released),
            Some(Flags::STEP_TOGGLE_REQUESTED)
        );
    }

    #[test]
    fn test_power_raises_nothing() {
        assert_eq!(ButtonRole::Power.request_for(ButtonEvent::Pressed), None);
        assert_eq!(ButtonRole::Power.request_for(ButtonEvent::Released), None);
    }
}
