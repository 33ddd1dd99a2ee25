//! Setpoint controller

use super::config::SetpointConfig;
use crate::events::{EventFlags, Flags};
use crate::traits::SetpointObserver;
use crate::Millis;

/// Rotation reads larger than this many detents are treated as noise
///
/// Such a read is reduced to a single detent in the same direction.
/// The value is a heuristic and may be tuned per encoder.
pub const ANOMALY_THRESHOLD: u32 = 3;

/// What the presentation layer shows
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SetpointSnapshot {
    pub value: f32,
    pub confirmed: bool,
    pub fine_step: bool,
}

/// Bounded, confirmable setpoint
///
/// Every method is meant to be called with the whole controller locked,
/// so all fields change together. `value` stays within
/// `[config.min, config.max]` after every mutation.
pub struct SetpointController<'a, O: SetpointObserver> {
    value: f32,
    /// Value to restore on rollback; meaningful only while pending
    original: f32,
    confirmed: bool,
    use_fine_step: bool,
    config: SetpointConfig,
    last_adjustment_ms: Millis,
    observer: O,
    flags: &'a EventFlags,
}

impl<'a, O: SetpointObserver> SetpointController<'a, O> {
    /// Create a confirmed controller at `config.initial`
    ///
    /// The initial value is clamped into range. An unvalidated config
    /// with `min > max` is treated as the range `[max, min]`; run
    /// [`SetpointConfig::validate`] first to reject it instead.
    pub fn new(config: SetpointConfig, observer: O, flags: &'a EventFlags) -> Self {
        let value = bound(&config, config.initial);
        Self {
            value,
            original: value,
            confirmed: true,
            use_fine_step: config.start_fine,
            config,
            last_adjustment_ms: 0,
            observer,
            flags,
        }
    }

    /// Apply detents read from the encoder
    ///
    /// The first non-zero rotation after a confirm enters the pending
    /// state and captures the rollback value. Returns true if anything
    /// visible changed.
    pub fn apply_rotation(&mut self, detents: i32, now_ms: Millis) -> bool {
        if detents == 0 {
            return false;
        }
        let detents = if detents.unsigned_abs() > ANOMALY_THRESHOLD {
            detents.signum()
        } else {
            detents
        };

        let was_confirmed = self.confirmed;
        if self.confirmed {
            self.original = self.value;
            self.confirmed = false;
        }

        let old = self.value;
        self.value = bound(&self.config, self.value + detents as f32 * self.step_size());
        self.last_adjustment_ms = now_ms;

        let changed = was_confirmed || self.value != old;
        if changed {
            self.notify();
        }
        changed
    }

    /// Accept the pending value
    ///
    /// No-op (and no notification) when already confirmed.
    pub fn confirm(&mut self) -> bool {
        if self.confirmed {
            return false;
        }
        self.confirmed = true;
        self.notify();
        true
    }

    /// Discard the pending value
    pub fn cancel(&mut self) -> bool {
        if self.confirmed {
            return false;
        }
        self.rollback();
        true
    }

    /// Flip between fine and coarse steps; returns true if now fine
    pub fn toggle_step_size(&mut self) -> bool {
        self.use_fine_step = !self.use_fine_step;
        self.notify();
        self.use_fine_step
    }

    /// Roll back a pending edit that has been idle too long
    ///
    /// Level-based: safe to call at any cadence and in any order relative
    /// to rotation updates. Returns true if a rollback happened.
    pub fn check_timeout(&mut self, now_ms: Millis) -> bool {
        if self.confirmed {
            return false;
        }
        let idle = now_ms.saturating_sub(self.last_adjustment_ms);
        if idle <= self.config.confirm_timeout_ms as Millis {
            return false;
        }
        self.rollback();
        true
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn is_fine_step(&self) -> bool {
        self.use_fine_step
    }

    /// Step applied per detent in the current mode
    pub fn step_size(&self) -> f32 {
        if self.use_fine_step {
            self.config.fine_step
        } else {
            self.config.coarse_step
        }
    }

    pub fn snapshot(&self) -> SetpointSnapshot {
        SetpointSnapshot {
            value: self.value,
            confirmed: self.confirmed,
            fine_step: self.use_fine_step,
        }
    }

    pub fn config(&self) -> &SetpointConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn rollback(&mut self) {
        self.value = self.original;
        self.confirmed = true;
        self.notify();
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.observer.setpoint_changed(snapshot);
        self.flags.set(Flags::UI_REFRESH_REQUESTED);
    }
}

/// Clamp into the configured range without panicking on swapped or NaN
/// bounds
fn bound(config: &SetpointConfig, value: f32) -> f32 {
    let (lo, hi) = if config.min <= config.max {
        (config.min, config.max)
    } else {
        (config.max, config.min)
    };
    value.max(lo).min(hi)
}
