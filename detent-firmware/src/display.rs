//! Bridge to the presentation layer
//!
//! Observer callbacks run inside the setpoint lock or the power sequence,
//! so they only hand the latest state to a signal and return.

use detent_core::power::PowerState;
use detent_core::setpoint::SetpointSnapshot;
use detent_core::traits::{PowerObserver, SetpointObserver};

use crate::channels::{POWER_DISPLAY, SETPOINT_DISPLAY};

pub struct DisplayBridge;

impl SetpointObserver for DisplayBridge {
    fn setpoint_changed(&mut self, snapshot: SetpointSnapshot) {
        SETPOINT_DISPLAY.signal(snapshot);
    }
}

impl PowerObserver for DisplayBridge {
    fn power_changed(&mut self, state: PowerState) {
        POWER_DISPLAY.signal(state);
    }
}
