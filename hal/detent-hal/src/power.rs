//! Low-power sleep abstractions
//!
//! The power button both requests sleep and, in the same physical pin,
//! wakes the processor again. The platform provides three primitives:
//! arm the pin as a level wake source, disarm every wake source, and
//! suspend until woken.

use crate::gpio::InputPin;

/// Platform sleep control
///
/// `suspend` returns only once the processor has resumed. Execution
/// continues directly after the call, so callers treat its return as the
/// wake interrupt.
pub trait SleepControl {
    /// Configure the wake pin so its asserted level resumes the processor
    fn arm_wake(&mut self);

    /// Disable all wake sources
    fn disarm_wake(&mut self);

    /// Suspend the processor until the wake pin is asserted
    ///
    /// `wake_pin` is the same pin armed by [`arm_wake`](Self::arm_wake);
    /// implementations may use it to re-check the level after spurious
    /// wake-ups.
    fn suspend<P: InputPin>(&mut self, wake_pin: &P);
}
