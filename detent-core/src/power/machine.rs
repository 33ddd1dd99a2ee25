//! Power state table

/// Process-wide power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Panel running, acquisition enabled
    #[default]
    Active,
    /// Processor suspended, waiting on the power pin
    Sleeping,
}

/// Events that drive power transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerEvent {
    /// Debounced user release of the power button (not a wake artifact)
    ButtonReleased,
    /// Execution resumed from the wake source
    WakeInterrupt,
}

impl PowerState {
    pub fn is_active(self) -> bool {
        self == PowerState::Active
    }

    /// Next state for an event; unlisted pairs keep the current state
    pub fn transition(self, event: PowerEvent) -> Self {
        use PowerEvent::*;
        use PowerState::*;

        match (self, event) {
            (Active, ButtonReleased) => Sleeping,
            (Sleeping, WakeInterrupt) => Active,
            (state, _) => state,
        }
    }
}
