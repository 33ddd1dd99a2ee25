//! Presentation task
//!
//! Polls the notification flags at frame rate, performs confirm and
//! step-toggle requests, and hands the latest state to the renderer.
//! Rendering itself lives outside this firmware; here it is logged.

use defmt::*;
use detent_core::events::Flags;
use embassy_time::{with_timeout, Duration};

use super::cadence::Cadence;
use crate::channels::{SharedSetpoint, EVENT_FLAGS, POWER_DISPLAY, SETPOINT_DISPLAY};

/// Frame period (~30 fps)
const FRAME_PERIOD: Duration = Duration::from_millis(33);

const CONFIRM_LOCK_TIMEOUT: Duration = Duration::from_millis(100);
const TOGGLE_LOCK_TIMEOUT: Duration = Duration::from_millis(500);

/// Flags this task consumes
const PANEL_FLAGS: Flags = Flags::from_bits_truncate(
    Flags::CONFIRM_REQUESTED.bits()
        | Flags::STEP_TOGGLE_REQUESTED.bits()
        | Flags::UI_REFRESH_REQUESTED.bits()
        | Flags::DATA_READY.bits(),
);

#[embassy_executor::task]
pub async fn panel_task(setpoint: &'static SharedSetpoint) {
    info!("Panel task started");

    let mut cadence = Cadence::every(FRAME_PERIOD);

    loop {
        cadence.next().await;

        let pending = EVENT_FLAGS.take(PANEL_FLAGS);

        if pending.contains(Flags::CONFIRM_REQUESTED) {
            match with_timeout(CONFIRM_LOCK_TIMEOUT, setpoint.lock()).await {
                Ok(mut sp) => {
                    if sp.confirm() {
                        info!("Setpoint confirmed at {}", sp.value());
                    }
                }
                Err(_) => warn!("Setpoint busy, confirm skipped"),
            }
        }

        if pending.contains(Flags::STEP_TOGGLE_REQUESTED) {
            match with_timeout(TOGGLE_LOCK_TIMEOUT, setpoint.lock()).await {
                Ok(mut sp) => {
                    let fine = sp.toggle_step_size();
                    info!(
                        "Step size {} ({})",
                        if fine { "fine" } else { "coarse" },
                        sp.step_size()
                    );
                }
                Err(_) => warn!("Setpoint busy, step toggle skipped"),
            }
        }

        if let Some(power) = POWER_DISPLAY.try_take() {
            info!("Render power state {:?}", power);
        }

        if let Some(snapshot) = SETPOINT_DISPLAY.try_take() {
            debug!(
                "Render setpoint {} confirmed={} fine={}",
                snapshot.value, snapshot.confirmed, snapshot.fine_step
            );
        } else if pending.contains(Flags::UI_REFRESH_REQUESTED) {
            trace!("UI refresh");
        }

        if pending.contains(Flags::DATA_READY) {
            trace!("Measurements ready");
        }
    }
}
