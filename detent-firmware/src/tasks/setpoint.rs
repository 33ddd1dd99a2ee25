//! Setpoint maintenance task
//!
//! Applies committed detents to the setpoint and runs the rollback check.
//! The rotation path takes the lock with a short bound and defers on
//! contention; the rollback path waits for the lock, since it runs at a
//! low cadence and must not be skipped.

use defmt::*;
use detent_core::events::Flags;
use embassy_time::{with_timeout, Duration, Instant};

use crate::channels::{SharedSetpoint, ENCODER, EVENT_FLAGS, ROTATION_DOORBELL};

/// Longest idle wait between rollback checks
const MAINTENANCE_PERIOD: Duration = Duration::from_millis(500);

/// Bound on the setpoint lock for rotation updates
const ROTATION_LOCK_TIMEOUT: Duration = Duration::from_millis(50);

#[embassy_executor::task]
pub async fn setpoint_task(setpoint: &'static SharedSetpoint) {
    info!("Setpoint task started");

    loop {
        // Either a detent arrived or it is time for maintenance
        let _ = with_timeout(MAINTENANCE_PERIOD, ROTATION_DOORBELL.wait()).await;

        if EVENT_FLAGS
            .take(Flags::ROTATION_UPDATE)
            .contains(Flags::ROTATION_UPDATE)
        {
            apply_rotation(setpoint).await;
        }

        let mut sp = setpoint.lock().await;
        if sp.check_timeout(Instant::now().as_millis()) {
            info!("Setpoint not confirmed in time, rolled back to {}", sp.value());
        }
    }
}

async fn apply_rotation(setpoint: &'static SharedSetpoint) {
    match with_timeout(ROTATION_LOCK_TIMEOUT, setpoint.lock()).await {
        Ok(mut sp) => {
            // Drain the decoder only once the setpoint is ours
            let detents = ENCODER.read();
            if detents != 0 && sp.apply_rotation(detents, Instant::now().as_millis()) {
                debug!(
                    "Rotation {} -> {} (confirmed={})",
                    detents,
                    sp.value(),
                    sp.is_confirmed()
                );
            }
        }
        Err(_) => {
            warn!("Setpoint busy, rotation deferred");
            EVENT_FLAGS.set(Flags::ROTATION_UPDATE);
            ROTATION_DOORBELL.signal(());
        }
    }
}
