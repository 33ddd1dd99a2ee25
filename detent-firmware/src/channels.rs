//! Shared state and inter-task channels
//!
//! Everything the edge handlers and tasks share lives here as a static,
//! so each resource has exactly one owner established at boot.

use detent_core::encoder::SharedEncoder;
use detent_core::events::EventFlags;
use detent_core::input::ButtonEdge;
use detent_core::power::PowerState;
use detent_core::setpoint::{SetpointController, SetpointSnapshot};
use detent_core::traits::{RunFlag, RunFlagBusy};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use crate::display::DisplayBridge;

/// Queued edges per button (sized for contact-bounce bursts)
pub const EDGE_QUEUE_SIZE: usize = 16;

/// Raw button edges waiting for the debouncer
pub type EdgeQueue = Channel<CriticalSectionRawMutex, ButtonEdge, EDGE_QUEUE_SIZE>;

/// The setpoint, locked as a unit
pub type SharedSetpoint = Mutex<CriticalSectionRawMutex, SetpointController<'static, DisplayBridge>>;

/// Notification flags polled by the panel task
pub static EVENT_FLAGS: EventFlags = EventFlags::new();

/// Quadrature decoder fed by the encoder edge handler
pub static ENCODER: SharedEncoder<'static> = SharedEncoder::new(&EVENT_FLAGS);

/// Wakes the setpoint task when a detent is committed
pub static ROTATION_DOORBELL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

pub static CONFIRM_EDGES: EdgeQueue = Channel::new();
pub static STEP_EDGES: EdgeQueue = Channel::new();
pub static POWER_EDGES: EdgeQueue = Channel::new();

/// Acquisition run flag
pub static RUN_FLAG: Mutex<CriticalSectionRawMutex, bool> = Mutex::new(true);

/// Latest setpoint snapshot for the presentation layer
pub static SETPOINT_DISPLAY: Signal<CriticalSectionRawMutex, SetpointSnapshot> = Signal::new();

/// Latest power state for the presentation layer
pub static POWER_DISPLAY: Signal<CriticalSectionRawMutex, PowerState> = Signal::new();

/// [`RUN_FLAG`] as seen by the power controller
///
/// Never waits: a contended lock is reported and the write is retried by
/// the power task's reconcile tick.
pub struct SharedRunFlag;

impl RunFlag for SharedRunFlag {
    fn try_set(&mut self, running: bool) -> Result<(), RunFlagBusy> {
        let mut flag = RUN_FLAG.try_lock().map_err(|_| RunFlagBusy)?;
        *flag = running;
        Ok(())
    }
}
