//! Presentation-layer callbacks

use crate::power::PowerState;
use crate::setpoint::SetpointSnapshot;

/// Receives every change of the displayed setpoint
///
/// Called synchronously from inside the mutation path while the setpoint
/// is locked. Implementations must not call back into the controller;
/// they typically copy the snapshot into a signal and return.
pub trait SetpointObserver {
    /// Value, confirmation or step mode changed
    fn setpoint_changed(&mut self, snapshot: SetpointSnapshot);
}

/// Receives power state changes
///
/// Notified before the processor sleeps (so the last frame can be drawn)
/// and again after it wakes.
pub trait PowerObserver {
    fn power_changed(&mut self, state: PowerState);
}

impl SetpointObserver for () {
    fn setpoint_changed(&mut self, _snapshot: SetpointSnapshot) {}
}

impl PowerObserver for () {
    fn power_changed(&mut self, _state: PowerState) {}
}
