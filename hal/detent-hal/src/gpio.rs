//! GPIO pin abstractions
//!
//! Provides the digital input trait that chip-specific HALs implement,
//! plus the notion of which electrical level means "asserted".

/// Digital input pin
///
/// Implementations should read the hardware input register directly.
/// Sampling must be cheap and non-blocking; it is called from edge
/// handlers and from the debounce re-sample path.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl<T: InputPin + ?Sized> InputPin for &T {
    fn is_high(&self) -> bool {
        (**self).is_high()
    }
}

/// Electrical level at which a button counts as pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pressed reads high (pull-down wiring)
    #[default]
    High,
    /// Pressed reads low (pull-up wiring)
    Low,
}

impl ActiveLevel {
    /// Build from an "inverted" flag as used in pin strings (`!gpio4`)
    pub const fn from_inverted(inverted: bool) -> Self {
        if inverted {
            ActiveLevel::Low
        } else {
            ActiveLevel::High
        }
    }

    /// Whether a raw level counts as asserted
    pub const fn is_asserted(self, high: bool) -> bool {
        match self {
            ActiveLevel::High => high,
            ActiveLevel::Low => !high,
        }
    }

    /// Sample a pin and report whether it is asserted
    pub fn sample<P: InputPin + ?Sized>(self, pin: &P) -> bool {
        self.is_asserted(pin.is_high())
    }
}
