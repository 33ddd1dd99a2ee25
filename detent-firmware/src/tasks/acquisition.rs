//! Acquisition gate
//!
//! The sampling itself belongs to the analog front-end; this task only
//! honours the run flag and announces each sampling period.

use defmt::*;
use detent_core::events::Flags;
use embassy_time::{with_timeout, Duration};

use super::cadence::Cadence;
use crate::channels::{EVENT_FLAGS, RUN_FLAG};

const SAMPLE_PERIOD: Duration = Duration::from_millis(500);

#[embassy_executor::task]
pub async fn acquisition_gate_task(run_flag_timeout_ms: u32) {
    info!("Acquisition gate task started");

    let timeout = Duration::from_millis(run_flag_timeout_ms as u64);
    let mut cadence = Cadence::every(SAMPLE_PERIOD);

    loop {
        cadence.next().await;

        match with_timeout(timeout, RUN_FLAG.lock()).await {
            Ok(running) => {
                if *running {
                    EVENT_FLAGS.set(Flags::DATA_READY);
                }
            }
            Err(_) => warn!("Run flag busy, sampling period skipped"),
        }
    }
}
