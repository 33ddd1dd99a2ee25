//! GPIO-wake sleep
//!
//! The power pin is armed as a level interrupt on core 0 and the core
//! waits in WFI. The GPIO bank interrupt handler in embassy-rp masks a
//! pin's interrupt again once it fires, so the wait loop re-arms before
//! every WFI. Other interrupts (timer alarms) also end a WFI; the loop
//! only exits once the pin reads asserted.

use detent_hal::{ActiveLevel, InputPin, SleepControl};
use embassy_rp::pac;

/// Sleep control for one wake pin
pub struct Rp2040Sleep {
    pin: u8,
    active: ActiveLevel,
}

impl Rp2040Sleep {
    pub fn new(pin: u8, active: ActiveLevel) -> Self {
        Self { pin, active }
    }

    fn set_level_irq(&self, enabled: bool) {
        let group = (self.pin / 8) as usize;
        let bit = (self.pin % 8) as usize;
        let active = self.active;
        critical_section::with(|_| {
            pac::IO_BANK0
                .int_proc(0)
                .inte(group)
                .modify(|w| match active {
                    ActiveLevel::High => w.set_level_high(bit, enabled),
                    ActiveLevel::Low => w.set_level_low(bit, enabled),
                });
        });
    }
}

impl SleepControl for Rp2040Sleep {
    fn arm_wake(&mut self) {
        self.set_level_irq(true);
    }

    fn disarm_wake(&mut self) {
        self.set_level_irq(false);
    }

    fn suspend<P: InputPin>(&mut self, wake_pin: &P) {
        while !self.active.sample(wake_pin) {
            self.arm_wake();
            cortex_m::asm::wfi();
        }
    }
}
