//! Confirm and step button tasks
//!
//! Each task owns one button. Edges are classified and queued straight
//! away; queued edges go through the debouncer; a ticker drives the
//! stuck-press consistency check.

use defmt::*;
use detent_core::config::ButtonsConfig;
use detent_core::input::{ButtonDebouncer, ButtonEdge, ButtonRole};
use detent_hal::InputPin;
use detent_hal_rp2040::PanelInput;
use embassy_futures::select::{select3, Either3};
use embassy_time::{Delay, Duration, Instant};

use super::cadence::Cadence;
use crate::channels::{EdgeQueue, EVENT_FLAGS};

#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(
    role: ButtonRole,
    mut input: PanelInput<'static>,
    queue: &'static EdgeQueue,
    config: ButtonsConfig,
) {
    info!("{} button task started (gpio{})", role.name(), input.pin());

    let mut debouncer = ButtonDebouncer::new(config.debounce(), input.active_level());
    let mut cadence = Cadence::every(Duration::from_millis(config.consistency_period_ms as u64));
    let mut delay = Delay;

    loop {
        match select3(input.wait_for_any_edge(), queue.receive(), cadence.next()).await {
            Either3::First(()) => {
                let edge = ButtonEdge::classify(input.is_high(), input.active_level());
                if queue.try_send(edge).is_err() {
                    trace!("{} edge queue full", role.name());
                }
            }
            Either3::Second(edge) => {
                let now_ms = Instant::now().as_millis();
                if let Some(event) = debouncer.handle(edge, now_ms, &input, &mut delay) {
                    debug!("{} {:?}", role.name(), event);
                    if let Some(request) = role.request_for(event) {
                        EVENT_FLAGS.set(request);
                    }
                }
            }
            Either3::Third(()) => {
                let now_ms = Instant::now().as_millis();
                if debouncer.check_consistency(now_ms, &input) {
                    warn!("{} button state inconsistent, reset", role.name());
                }
            }
        }
    }
}
