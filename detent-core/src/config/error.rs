//! Configuration errors

/// Semantic validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Setpoint `min` is not below `max`
    InvalidRange,
    /// Setpoint `initial` outside `[min, max]`
    InitialOutOfRange,
    /// Step size not positive
    InvalidStep,
    /// Confirm timeout is zero
    InvalidTimeout,
    /// Encoder phases share a pin
    SamePhasePins,
    /// The same GPIO is assigned to two inputs
    DuplicatePin(u8),
    /// A period or window that must be non-zero is zero
    ZeroPeriod,
}

/// Syntax failure in the TOML subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header (1-based line)
    InvalidSection(usize),
    /// Key outside any section, or not known in its section
    UnknownKey(usize),
    /// Value has the wrong type or does not parse
    InvalidValue(usize),
    /// Pin string is not `gpioN` / `!gpioN`
    InvalidPin(usize),
    /// Line is neither a header nor `key = value`
    Syntax(usize),
}

impl ParseError {
    /// Line the error was found on
    pub fn line(&self) -> usize {
        match *self {
            ParseError::InvalidSection(l)
            | ParseError::UnknownKey(l)
            | ParseError::InvalidValue(l)
            | ParseError::InvalidPin(l)
            | ParseError::Syntax(l) => l,
        }
    }
}
