//! Power button task
//!
//! Like the other button tasks, but debounced edges drive the power
//! controller. A release while active prepares for sleep; the task then
//! yields for the grace period so the panel task can draw its last frame,
//! and suspends. It resumes right there once the wake pin fires.

use defmt::*;
use detent_core::input::ButtonEdge;
use detent_core::power::{PowerController, PowerState};
use detent_hal::InputPin;
use detent_hal_rp2040::{PanelInput, Rp2040Sleep};
use embassy_futures::select::{select3, Either3};
use embassy_time::{Delay, Duration, Instant, Timer};

use super::cadence::Cadence;
use crate::channels::{EdgeQueue, SharedRunFlag};
use crate::display::DisplayBridge;

pub type PanelPower = PowerController<'static, Rp2040Sleep, SharedRunFlag, DisplayBridge>;

#[embassy_executor::task]
pub async fn power_task(
    mut input: PanelInput<'static>,
    queue: &'static EdgeQueue,
    mut power: PanelPower,
    consistency_period_ms: u32,
) {
    info!("Power task started (gpio{})", input.pin());

    let mut cadence = Cadence::every(Duration::from_millis(consistency_period_ms as u64));
    let mut delay = Delay;

    loop {
        match select3(input.wait_for_any_edge(), queue.receive(), cadence.next()).await {
            Either3::First(()) => {
                let edge = ButtonEdge::classify(input.is_high(), input.active_level());
                if queue.try_send(edge).is_err() {
                    trace!("power edge queue full");
                }
            }
            Either3::Second(edge) => {
                let awaiting_release = power.wake_artifact_pending();
                let now_ms = Instant::now().as_millis();
                let Some(event) = power.handle_edge(edge, now_ms, &input, &mut delay) else {
                    continue;
                };
                debug!("power {:?}", event);

                if power.state() == PowerState::Sleeping {
                    info!("Going to sleep");
                    Timer::after_millis(power.sleep_grace_ms() as u64).await;
                    power.finish_sleep(&input);
                    info!("Woke from sleep, power {:?}", power.state());
                    // Edges queued before the suspend are stale
                    queue.clear();
                } else if awaiting_release && !power.wake_artifact_pending() {
                    debug!("Wake press released");
                }
            }
            Either3::Third(()) => {
                let now_ms = Instant::now().as_millis();
                if power.check_consistency(now_ms, &input) {
                    warn!("power button state inconsistent, reset");
                }
                if power.run_flag_out_of_sync() && !power.reconcile() {
                    warn!("Run flag busy, retrying next tick");
                }
            }
        }
    }
}
