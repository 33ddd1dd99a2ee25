//! Encoder edge task
//!
//! Stands in for the phase-pin interrupt: wakes on any edge of either
//! phase, samples both levels and feeds the shared decoder. Does no
//! other work so it is back to waiting within microseconds.

use defmt::*;
use detent_core::encoder::PhaseOutcome;
use detent_hal::InputPin;
use detent_hal_rp2040::PanelInput;
use embassy_futures::select::select;
use embassy_time::Instant;

use crate::channels::{ENCODER, ROTATION_DOORBELL};

#[embassy_executor::task]
pub async fn encoder_task(mut phase_a: PanelInput<'static>, mut phase_b: PanelInput<'static>) {
    info!(
        "Encoder task started (A=gpio{}, B=gpio{})",
        phase_a.pin(),
        phase_b.pin()
    );

    loop {
        select(phase_a.wait_for_any_edge(), phase_b.wait_for_any_edge()).await;

        let now_ms = Instant::now().as_millis();
        match ENCODER.on_edge(phase_a.is_high(), phase_b.is_high(), now_ms) {
            PhaseOutcome::Detent(direction) => {
                trace!("Detent {}", direction);
                ROTATION_DOORBELL.signal(());
            }
            PhaseOutcome::Bounce => trace!("Encoder bounce dropped"),
            PhaseOutcome::Illegal => trace!("Encoder illegal transition"),
            PhaseOutcome::Duplicate | PhaseOutcome::Partial => {}
        }
    }
}
