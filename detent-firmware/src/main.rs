//! Detent - Instrument Front-Panel Firmware
//!
//! Turns a quadrature encoder and three buttons into setpoint edits,
//! confirm/rollback, fine/coarse stepping and a sleep/wake power cycle.
//! Pin assignments and timing come from `panel.toml`, embedded at build
//! time and validated by `build.rs`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use detent_core::config::{parse_config, PanelConfig};
use detent_core::events::Flags;
use detent_core::input::{ButtonDebouncer, ButtonRole};
use detent_core::power::PowerController;
use detent_core::setpoint::SetpointController;
use detent_hal::InputPin;
use detent_hal_rp2040::pins::GPIO_COUNT;
use detent_hal_rp2040::{PanelInput, PinBank, Rp2040Sleep};
use embassy_sync::mutex::Mutex;

use crate::channels::{
    SharedRunFlag, SharedSetpoint, CONFIRM_EDGES, ENCODER, EVENT_FLAGS, POWER_EDGES, STEP_EDGES,
};
use crate::display::DisplayBridge;

/// Embedded panel configuration (compiled into firmware)
/// Edit panel.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../panel.toml");

mod channels;
mod display;
mod tasks;

// The setpoint is shared by the setpoint and panel tasks
static SETPOINT: StaticCell<SharedSetpoint> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Detent firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    let mut bank = PinBank::from_peripherals(p);

    // Inputs
    let phase_a = unwrap!(PanelInput::from_config(&mut bank, &config.encoder.pin_a));
    let phase_b = unwrap!(PanelInput::from_config(&mut bank, &config.encoder.pin_b));
    let power_input = unwrap!(PanelInput::from_config(&mut bank, &config.buttons.power));
    let confirm_input = config
        .buttons
        .confirm
        .map(|cfg| unwrap!(PanelInput::from_config(&mut bank, &cfg)));
    let step_input = config
        .buttons
        .step
        .map(|cfg| unwrap!(PanelInput::from_config(&mut bank, &cfg)));
    info!("Inputs initialized");

    // Seed the decoder with the resting phase
    ENCODER.init(
        phase_a.is_high(),
        phase_b.is_high(),
        config.encoder.reverse,
        config.encoder.bounce_window_ms as u64,
    );

    let setpoint = SETPOINT.init(Mutex::new(SetpointController::new(
        config.setpoint,
        DisplayBridge,
        &EVENT_FLAGS,
    )));
    info!(
        "Setpoint {} in [{}, {}]",
        config.setpoint.initial, config.setpoint.min, config.setpoint.max
    );

    let power_pin = config.buttons.power;
    let power = PowerController::new(
        ButtonDebouncer::new(config.buttons.debounce(), power_pin.active_level()),
        Rp2040Sleep::new(power_pin.pin, power_pin.active_level()),
        SharedRunFlag,
        DisplayBridge,
        &EVENT_FLAGS,
        config.power,
    );

    // First frame
    EVENT_FLAGS.set(Flags::UI_REFRESH_REQUESTED | Flags::DATA_READY);

    // Spawn tasks
    spawner.spawn(tasks::encoder_task(phase_a, phase_b)).unwrap();
    spawner.spawn(tasks::setpoint_task(setpoint)).unwrap();
    spawner.spawn(tasks::panel_task(setpoint)).unwrap();
    spawner
        .spawn(tasks::acquisition_gate_task(config.power.run_flag_timeout_ms))
        .unwrap();
    spawner
        .spawn(tasks::power_task(
            power_input,
            &POWER_EDGES,
            power,
            config.buttons.consistency_period_ms,
        ))
        .unwrap();

    if let Some(input) = confirm_input {
        spawner
            .spawn(tasks::button_task(
                ButtonRole::Confirm,
                input,
                &CONFIRM_EDGES,
                config.buttons,
            ))
            .unwrap();
    } else {
        info!("No confirm button configured");
    }

    if let Some(input) = step_input {
        spawner
            .spawn(tasks::button_task(
                ButtonRole::StepToggle,
                input,
                &STEP_EDGES,
                config.buttons,
            ))
            .unwrap();
    } else {
        info!("No step button configured");
    }

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse and check the embedded configuration
///
/// `build.rs` rejects a broken `panel.toml`, so the fallback only matters
/// for configs that slip past it. Factory defaults keep the panel usable.
fn load_config() -> PanelConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse panel config at line {}: {:?}", e.line(), e);
            error!("Using factory defaults");
            return PanelConfig::default();
        }
    };

    if let Err(e) = config.validate() {
        error!("Invalid panel config: {:?}", e);
        error!("Using factory defaults");
        return PanelConfig::default();
    }

    if let Some(pin) = config.input_pins().find(|p| p.pin as usize >= GPIO_COUNT) {
        error!("gpio{} does not exist on this chip", pin.pin);
        error!("Using factory defaults");
        return PanelConfig::default();
    }

    info!("Parsed embedded configuration successfully");
    config
}
