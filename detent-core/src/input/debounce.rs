//! Double-read button debouncer

use detent_hal::{ActiveLevel, InputPin};
use embedded_hal::delay::DelayNs;

use crate::Millis;

/// Raw edge classification queued by the edge handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEdge {
    /// Pin moved to its asserted level
    Pressed,
    /// Pin moved to its released level
    Released,
}

impl ButtonEdge {
    /// Classify an edge from the level sampled in the handler
    pub const fn classify(level_high: bool, active: ActiveLevel) -> Self {
        if active.is_asserted(level_high) {
            ButtonEdge::Pressed
        } else {
            ButtonEdge::Released
        }
    }
}

/// Debounced logical button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    Pressed,
    Released,
}

/// Debounce timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    /// Minimum time between accepted transitions
    pub debounce_ms: u32,
    /// Delay before the confirming second read
    pub resample_delay_us: u32,
    /// How long a released pin may contradict a recorded press
    pub stuck_release_ms: u32,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 30,
            resample_delay_us: 1000,
            stuck_release_ms: 1000,
        }
    }
}

/// Debounce state for one physical button
///
/// `pressed` and `release_handled` are never both true. Idle state is
/// "not pressed, release handled".
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonDebouncer {
    pressed: bool,
    release_handled: bool,
    /// Last time a transition passed the debounce window
    last_transition_ms: Option<Millis>,
    config: DebounceConfig,
    active: ActiveLevel,
}

impl ButtonDebouncer {
    pub const fn new(config: DebounceConfig, active: ActiveLevel) -> Self {
        Self {
            pressed: false,
            release_handled: true,
            last_transition_ms: None,
            config,
            active,
        }
    }

    /// Electrical level that counts as pressed
    pub fn active_level(&self) -> ActiveLevel {
        self.active
    }

    /// Debounced press state
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Process one queued edge
    ///
    /// Edges that contradict the recorded state are dropped, as are edges
    /// inside the debounce window. An accepted edge is confirmed by two
    /// pin reads separated by the re-sample delay.
    pub fn handle<P, D>(
        &mut self,
        edge: ButtonEdge,
        now_ms: Millis,
        pin: &P,
        delay: &mut D,
    ) -> Option<ButtonEvent>
    where
        P: InputPin + ?Sized,
        D: DelayNs,
    {
        let want_pressed = match edge {
            ButtonEdge::Pressed if !self.pressed => true,
            ButtonEdge::Released if self.pressed && !self.release_handled => false,
            _ => return None,
        };

        if !self.window_elapsed(now_ms) {
            return None;
        }
        // The window restarts even if the level check below fails
        self.last_transition_ms = Some(now_ms);

        if self.active.sample(pin) != want_pressed {
            return None;
        }
        delay.delay_us(self.config.resample_delay_us);
        if self.active.sample(pin) != want_pressed {
            return None;
        }

        self.pressed = want_pressed;
        self.release_handled = !want_pressed;
        Some(if want_pressed {
            ButtonEvent::Pressed
        } else {
            ButtonEvent::Released
        })
    }

    /// Repair a press whose release edge was lost
    ///
    /// Returns true if the recorded state was reset.
    pub fn check_consistency<P: InputPin + ?Sized>(&mut self, now_ms: Millis, pin: &P) -> bool {
        if !self.pressed || self.active.sample(pin) {
            return false;
        }
        let since = self
            .last_transition_ms
            .map_or(Millis::MAX, |t| now_ms.saturating_sub(t));
        if since <= self.config.stuck_release_ms as Millis {
            return false;
        }
        self.reset();
        true
    }

    /// Return to idle
    pub fn reset(&mut self) {
        self.pressed = false;
        self.release_handled = true;
    }

    /// Record a press that was observed outside the edge path (wake-up)
    pub fn force_pressed(&mut self) {
        self.pressed = true;
        self.release_handled = false;
    }

    fn window_elapsed(&self, now_ms: Millis) -> bool {
        match self.last_transition_ms {
            None => true,
            Some(t) => now_ms.saturating_sub(t) > self.config.debounce_ms as Millis,
        }
    }
}
