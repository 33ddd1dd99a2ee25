//! Panel configuration
//!
//! Board-agnostic configuration structures, their validation, and a
//! parser for the embedded `panel.toml`.

pub mod error;
pub mod parse;
pub mod types;

pub use error::{ConfigError, ParseError};
pub use parse::{parse_config, parse_pin_string};
pub use types::*;
