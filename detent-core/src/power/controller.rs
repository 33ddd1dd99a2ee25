//! Power controller

use detent_hal::{InputPin, SleepControl};
use embedded_hal::delay::DelayNs;

use super::machine::{PowerEvent, PowerState};
use crate::events::{EventFlags, Flags};
use crate::input::{ButtonDebouncer, ButtonEdge, ButtonEvent};
use crate::traits::{PowerObserver, RunFlag};
use crate::Millis;

/// Power timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerConfig {
    /// Pause between notifying the observer and suspending
    pub sleep_grace_ms: u32,
    /// Longest wait for the run-flag lock in the acquisition gate
    ///
    /// The power path never waits: a contended write is skipped and
    /// retried by `reconcile`.
    pub run_flag_timeout_ms: u32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            sleep_grace_ms: 50,
            run_flag_timeout_ms: 100,
        }
    }
}

/// Power button handling and sleep sequencing
///
/// Owns the power button's debouncer so that the wake path can mark the
/// button pressed directly. A run-flag write that loses the lock is
/// remembered and retried by [`reconcile`](Self::reconcile).
pub struct PowerController<'a, S, R, O>
where
    S: SleepControl,
    R: RunFlag,
    O: PowerObserver,
{
    state: PowerState,
    debouncer: ButtonDebouncer,
    sleep: S,
    run_flag: R,
    observer: O,
    flags: &'a EventFlags,
    /// The next release belongs to the press that woke us
    wake_artifact_pending: bool,
    /// Run-flag value whose write was skipped
    pending_run_flag: Option<bool>,
    sleep_grace_ms: u32,
}

impl<'a, S, R, O> PowerController<'a, S, R, O>
where
    S: SleepControl,
    R: RunFlag,
    O: PowerObserver,
{
    pub fn new(
        debouncer: ButtonDebouncer,
        sleep: S,
        run_flag: R,
        observer: O,
        flags: &'a EventFlags,
        config: PowerConfig,
    ) -> Self {
        Self {
            state: PowerState::Active,
            debouncer,
            sleep,
            run_flag,
            observer,
            flags,
            wake_artifact_pending: false,
            pending_run_flag: None,
            sleep_grace_ms: config.sleep_grace_ms,
        }
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    /// True while the release of the waking press is still expected
    pub fn wake_artifact_pending(&self) -> bool {
        self.wake_artifact_pending
    }

    /// True if a run-flag write is waiting for a retry
    pub fn run_flag_out_of_sync(&self) -> bool {
        self.pending_run_flag.is_some()
    }

    pub fn debouncer(&self) -> &ButtonDebouncer {
        &self.debouncer
    }

    pub fn run_flag(&self) -> &R {
        &self.run_flag
    }

    pub fn sleep_control(&self) -> &S {
        &self.sleep
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Process a queued power-button edge
    ///
    /// A release while active prepares for sleep and leaves the
    /// controller in [`PowerState::Sleeping`]; the caller then waits
    /// [`sleep_grace_ms`](Self::sleep_grace_ms) and calls
    /// [`finish_sleep`](Self::finish_sleep). The release that follows a
    /// wake just re-asserts the run flag.
    pub fn handle_edge<P, D>(
        &mut self,
        edge: ButtonEdge,
        now_ms: Millis,
        pin: &P,
        delay: &mut D,
    ) -> Option<ButtonEvent>
    where
        P: InputPin,
        D: DelayNs,
    {
        let event = self.debouncer.handle(edge, now_ms, pin, delay)?;
        if event == ButtonEvent::Released {
            if self.wake_artifact_pending {
                self.wake_artifact_pending = false;
                self.write_run_flag(true);
                self.flags.set(Flags::DATA_READY);
            } else if self.state.is_active() {
                self.prepare_sleep();
            }
        }
        Some(event)
    }

    /// Drive the state programmatically
    ///
    /// Going to sleep only prepares, exactly like a button release.
    pub fn set_state(&mut self, target: PowerState) {
        match (self.state, target) {
            (PowerState::Active, PowerState::Sleeping) => self.prepare_sleep(),
            (PowerState::Sleeping, PowerState::Active) => self.resume(),
            _ => {}
        }
    }

    /// Pause the presentation layer gets between the sleep notification
    /// and the suspend
    pub fn sleep_grace_ms(&self) -> u32 {
        self.sleep_grace_ms
    }

    /// Arm the wake pin and suspend; returns once awake again
    ///
    /// Does nothing unless a sleep was prepared.
    pub fn finish_sleep<P: InputPin>(&mut self, pin: &P) {
        if self.state.is_active() {
            return;
        }
        self.sleep.arm_wake();
        self.sleep.suspend(pin);
        self.on_wake();
    }

    /// Resume after the wake source fired
    ///
    /// The waking press is recorded as pressed with its release still
    /// outstanding, and the run flag is set without waiting for the
    /// debounce path.
    pub fn on_wake(&mut self) {
        self.debouncer.force_pressed();
        self.wake_artifact_pending = true;
        self.resume();
    }

    /// Button consistency check; also drops a stale wake artifact
    pub fn check_consistency<P: InputPin>(&mut self, now_ms: Millis, pin: &P) -> bool {
        let reset = self.debouncer.check_consistency(now_ms, pin);
        if reset {
            self.wake_artifact_pending = false;
        }
        reset
    }

    /// Re-assert the run flag to match the power state
    ///
    /// Returns true if the flag is now in sync.
    pub fn reconcile(&mut self) -> bool {
        self.write_run_flag(self.state.is_active())
    }

    /// Everything up to the grace period: stop acquisition and tell the
    /// presentation layer so it can draw its last frame
    fn prepare_sleep(&mut self) {
        self.state = self.state.transition(PowerEvent::ButtonReleased);
        self.write_run_flag(false);
        self.observer.power_changed(self.state);
        self.flags.set(Flags::UI_REFRESH_REQUESTED);
    }

    fn resume(&mut self) {
        self.state = self.state.transition(PowerEvent::WakeInterrupt);
        self.sleep.disarm_wake();
        self.write_run_flag(true);
        self.flags.set(Flags::DATA_READY | Flags::UI_REFRESH_REQUESTED);
        self.observer.power_changed(self.state);
    }

    fn write_run_flag(&mut self, running: bool) -> bool {
        match self.run_flag.try_set(running) {
            Ok(()) => {
                self.pending_run_flag = None;
                true
            }
            Err(_) => {
                self.pending_run_flag = Some(running);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::debounce::tests::{MockDelay, MockPin};
    use crate::input::DebounceConfig;
    use crate::traits::RunFlagBusy;
    use detent_hal::ActiveLevel;

    struct MockSleep<'p> {
        /// Pin the "user" presses while we are suspended
        pin: &'p MockPin,
        log: Vec<&'static str>,
    }

    impl SleepControl for MockSleep<'_> {
        fn arm_wake(&mut self) {
            self.log.push("arm");
        }

        fn disarm_wake(&mut self) {
            self.log.push("disarm");
        }

        fn suspend<P: InputPin>(&mut self, wake_pin: &P) {
            self.log.push("suspend");
            self.pin.high.set(true);
            assert!(wake_pin.is_high());
        }
    }

    #[derive(Default)]
    struct MockRunFlag {
        busy: bool,
        value: Option<bool>,
        writes: Vec<bool>,
    }

    impl RunFlag for MockRunFlag {
        fn try_set(&mut self, running: bool) -> Result<(), RunFlagBusy> {
            if self.busy {
                return Err(RunFlagBusy);
            }
            self.value = Some(running);
            self.writes.push(running);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<PowerState>);

    impl PowerObserver for Recorder {
        fn power_changed(&mut self, state: PowerState) {
            self.0.push(state);
        }
    }

    type Controller<'a, 'p> = PowerController<'a, MockSleep<'p>, MockRunFlag, Recorder>;

    fn controller<'a, 'p>(flags: &'a EventFlags, pin: &'p MockPin) -> Controller<'a, 'p> {
        PowerController::new(
            ButtonDebouncer::new(DebounceConfig::default(), ActiveLevel::High),
            MockSleep {
                pin,
                log: Vec::new(),
            },
            MockRunFlag::default(),
            Recorder::default(),
            flags,
            PowerConfig::default(),
        )
    }

    /// Press then release the power button
    fn click(ctl: &mut Controller<'_, '_>, pin: &MockPin, delay: &mut MockDelay, t: Millis) {
        pin.high.set(true);
        ctl.handle_edge(ButtonEdge::Pressed, t, pin, delay);
        pin.high.set(false);
        ctl.handle_edge(ButtonEdge::Released, t + 200, pin, delay);
    }

    /// Click, then sleep until the (mock) wake press
    fn click_and_sleep(ctl: &mut Controller<'_, '_>, pin: &MockPin, delay: &mut MockDelay, t: Millis) {
        click(ctl, pin, delay, t);
        ctl.finish_sleep(pin);
    }

    #[test]
    fn test_release_notifies_before_suspending() {
        let flags = EventFlags::new();
        let pin = MockPin::new(false);
        let mut delay = MockDelay::default();
        let mut ctl = controller(&flags, &pin);

        click(&mut ctl, &pin, &mut delay, 100);

        // Observer told and acquisition stopped, wake source not armed yet
        assert_eq!(ctl.state(), PowerState::Sleeping);
        assert_eq!(ctl.observer().0, vec![PowerState::Sleeping]);
        assert_eq!(ctl.run_flag().value, Some(false));
        assert!(ctl.sleep_control().log.is_empty());
        assert!(flags.peek().contains(Flags::UI_REFRESH_REQUESTED));
        assert_eq!(ctl.sleep_grace_ms(), 50);
        // Only the two re-sample waits; the grace period belongs to the caller
        assert_eq!(delay.total_ns, 2_000_000);

        ctl.finish_sleep(&pin);
        assert_eq!(ctl.sleep_control().log, vec!["arm", "suspend", "disarm"]);
    }

    #[test]
    fn test_release_sleeps_and_wake_restores() {
        let flags = EventFlags::new();
        let pin = MockPin::new(false);
        let mut delay = MockDelay::default();
        let mut ctl = controller(&flags, &pin);

        click_and_sleep(&mut ctl, &pin, &mut delay, 100);

        // Returned from suspend: active again without a second release
        assert_eq!(ctl.state(), PowerState::Active);
        assert_eq!(ctl.run_flag().value, Some(true));
        assert_eq!(ctl.run_flag().writes, vec![false, true]);
        assert_eq!(ctl.sleep_control().log, vec!["arm", "suspend", "disarm"]);
        assert_eq!(
            ctl.observer().0,
            vec![PowerState::Sleeping, PowerState::Active]
        );
        assert!(ctl.wake_artifact_pending());
        assert!(ctl.debouncer().is_pressed());
        assert!(flags.peek().contains(Flags::DATA_READY | Flags::UI_REFRESH_REQUESTED));
    }

    #[test]
    fn test_finish_sleep_without_prepare_is_noop() {
        let flags = EventFlags::new();
        let pin = MockPin::new(false);
        let mut ctl = controller(&flags, &pin);

        ctl.finish_sleep(&pin);
        assert_eq!(ctl.state(), PowerState::Active);
        assert!(ctl.sleep_control().log.is_empty());
        assert!(ctl.observer().0.is_empty());
    }

    #[test]
    fn test_wake_release_does_not_toggle() {
        let flags = EventFlags::new();
        let pin = MockPin::new(false);
        let mut delay = MockDelay::default();
        let mut ctl = controller(&flags, &pin);

        click_and_sleep(&mut ctl, &pin, &mut delay, 100);
        flags.take(Flags::ALL);

        // The press edge that woke us is already accounted for
        assert_eq!(ctl.handle_edge(ButtonEdge::Pressed, 1000, &pin, &mut delay), None);

        pin.high.set(false);
        assert_eq!(
            ctl.handle_edge(ButtonEdge::Released, 1500, &pin, &mut delay),
            Some(ButtonEvent::Released)
        );
        assert_eq!(ctl.state(), PowerState::Active);
        assert!(!ctl.wake_artifact_pending());
        assert_eq!(ctl.run_flag().writes, vec![false, true, true]);
        assert_eq!(flags.peek(), Flags::DATA_READY);
        assert_eq!(ctl.sleep_control().log.len(), 3);

        // The next real click sleeps again
        click_and_sleep(&mut ctl, &pin, &mut delay, 3000);
        assert_eq!(ctl.sleep_control().log.len(), 6);
    }

    #[test]
    fn test_press_alone_does_nothing() {
        let flags = EventFlags::new();
        let pin = MockPin::new(true);
        let mut delay = MockDelay::default();
        let mut ctl = controller(&flags, &pin);

        ctl.handle_edge(ButtonEdge::Pressed, 100, &pin, &mut delay);
        assert_eq!(ctl.state(), PowerState::Active);
        assert!(ctl.sleep_control().log.is_empty());
        assert!(ctl.run_flag().writes.is_empty());
    }

    #[test]
    fn test_busy_run_flag_retried_by_reconcile() {
        let flags = EventFlags::new();
        let pin = MockPin::new(false);
        let mut delay = MockDelay::default();
        let mut ctl = controller(&flags, &pin);

        ctl.run_flag.busy = true;
        click_and_sleep(&mut ctl, &pin, &mut delay, 100);

        // Transition completed even though both writes were skipped
        assert_eq!(ctl.state(), PowerState::Active);
        assert!(ctl.run_flag().writes.is_empty());
        assert!(ctl.run_flag_out_of_sync());

        assert!(!ctl.reconcile());
        ctl.run_flag.busy = false;
        assert!(ctl.reconcile());
        assert_eq!(ctl.run_flag().value, Some(true));
        assert!(!ctl.run_flag_out_of_sync());
    }

    #[test]
    fn test_consistency_clears_wake_artifact() {
        let flags = EventFlags::new();
        let pin = MockPin::new(false);
        let mut delay = MockDelay::default();
        let mut ctl = controller(&flags, &pin);

        click_and_sleep(&mut ctl, &pin, &mut delay, 100);
        // Release edge after wake was lost
        pin.high.set(false);
        assert!(ctl.check_consistency(5000, &pin));
        assert!(!ctl.wake_artifact_pending());
        assert!(!ctl.debouncer().is_pressed());
    }

    #[test]
    fn test_set_state_sleep() {
        let flags = EventFlags::new();
        let pin = MockPin::new(false);
        let mut ctl = controller(&flags, &pin);

        ctl.set_state(PowerState::Active);
        assert!(ctl.sleep_control().log.is_empty());

        ctl.set_state(PowerState::Sleeping);
        assert_eq!(ctl.state(), PowerState::Sleeping);
        assert!(ctl.sleep_control().log.is_empty());

        ctl.finish_sleep(&pin);
        assert_eq!(ctl.state(), PowerState::Active);
        assert_eq!(ctl.sleep_control().log, vec!["arm", "suspend", "disarm"]);
    }

    #[test]
    fn test_set_state_wake_without_suspend() {
        let flags = EventFlags::new();
        let pin = MockPin::new(false);
        let mut ctl = controller(&flags, &pin);

        ctl.set_state(PowerState::Sleeping);
        ctl.set_state(PowerState::Active);
        assert_eq!(ctl.state(), PowerState::Active);
        assert_eq!(ctl.run_flag().writes, vec![false, true]);
        assert_eq!(ctl.sleep_control().log, vec!["disarm"]);
        assert!(!ctl.wake_artifact_pending());
    }
}
