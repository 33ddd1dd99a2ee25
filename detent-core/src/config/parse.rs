//! Minimal TOML parser for the panel configuration
//!
//! Handles only the subset `panel.toml` uses; the full file is checked
//! with a real TOML parser at build time.
//!
//! Supported features:
//! - `[section]` headers (`encoder`, `buttons`, `setpoint`, `power`)
//! - `key = value` with strings, integers, floats and booleans
//! - Comments (`# ...`), including after a value
//!
//! Keys missing from the file keep their factory defaults. Unknown
//! sections and keys are errors.

use super::error::ParseError;
use super::types::{PanelConfig, PinConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Encoder,
    Buttons,
    Setpoint,
    Power,
}

/// Parse `panel.toml` on top of the factory defaults
///
/// Only syntax is checked here; call [`PanelConfig::validate`] on the
/// result.
pub fn parse_config(input: &str) -> Result<PanelConfig, ParseError> {
    let mut config = PanelConfig::default();
    let mut section = Section::Root;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ParseError::InvalidSection(line_no));
            }
            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ParseError::InvalidSection(line_no))?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::Syntax(line_no))?;
        apply_value(section, key, value, &mut config, line_no)?;
    }

    Ok(config)
}

/// Parse a pin string: `gpioN` (active-high) or `!gpioN` (active-low)
///
/// Surrounding quotes are accepted.
pub fn parse_pin_string(value: &str) -> Option<PinConfig> {
    let s = parse_string(value);
    let (inverted, s) = match s.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let pin = s.strip_prefix("gpio")?.parse().ok()?;
    Some(PinConfig { pin, inverted })
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "encoder" => Some(Section::Encoder),
        "buttons" => Some(Section::Buttons),
        "setpoint" => Some(Section::Setpoint),
        "power" => Some(Section::Power),
        _ => None,
    }
}

/// Drop a trailing comment unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_int<T: core::str::FromStr>(value: &str, line: usize) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue(line))
}

fn parse_float(value: &str, line: usize) -> Result<f32, ParseError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ParseError::InvalidValue(line))
}

fn parse_bool(value: &str, line: usize) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue(line)),
    }
}

fn parse_pin(value: &str, line: usize) -> Result<PinConfig, ParseError> {
    parse_pin_string(value).ok_or(ParseError::InvalidPin(line))
}

/// Optional pin; `"none"` disables the input
fn parse_optional_pin(value: &str, line: usize) -> Result<Option<PinConfig>, ParseError> {
    if parse_string(value) == "none" {
        Ok(None)
    } else {
        parse_pin(value, line).map(Some)
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut PanelConfig,
    line: usize,
) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::UnknownKey(line)),
        Section::Encoder => {
            let enc = &mut config.encoder;
            match key {
                "pin_a" => enc.pin_a = parse_pin(value, line)?,
                "pin_b" => enc.pin_b = parse_pin(value, line)?,
                "reverse" => enc.reverse = parse_bool(value, line)?,
                "bounce_window_ms" => enc.bounce_window_ms = parse_int(value, line)?,
                _ => return Err(ParseError::UnknownKey(line)),
            }
        }
        Section::Buttons => {
            let btn = &mut config.buttons;
            match key {
                "confirm" => btn.confirm = parse_optional_pin(value, line)?,
                "step" => btn.step = parse_optional_pin(value, line)?,
                "power" => btn.power = parse_pin(value, line)?,
                "debounce_ms" => btn.debounce_ms = parse_int(value, line)?,
                "resample_delay_us" => btn.resample_delay_us = parse_int(value, line)?,
                "stuck_release_ms" => btn.stuck_release_ms = parse_int(value, line)?,
                "consistency_period_ms" => btn.consistency_period_ms = parse_int(value, line)?,
                _ => return Err(ParseError::UnknownKey(line)),
            }
        }
        Section::Setpoint => {
            let sp = &mut config.setpoint;
            match key {
                "initial" => sp.initial = parse_float(value, line)?,
                "min" => sp.min = parse_float(value, line)?,
                "max" => sp.max = parse_float(value, line)?,
                "fine_step" => sp.fine_step = parse_float(value, line)?,
                "coarse_step" => sp.coarse_step = parse_float(value, line)?,
                "confirm_timeout_ms" => sp.confirm_timeout_ms = parse_int(value, line)?,
                "start_fine" => sp.start_fine = parse_bool(value, line)?,
                _ => return Err(ParseError::UnknownKey(line)),
            }
        }
        Section::Power => {
            let pwr = &mut config.power;
            match key {
                "sleep_grace_ms" => pwr.sleep_grace_ms = parse_int(value, line)?,
                "run_flag_timeout_ms" => pwr.run_flag_timeout_ms = parse_int(value, line)?,
                _ => return Err(ParseError::UnknownKey(line)),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: &str = r#"
# Front panel
[encoder]
pin_a = "gpio2"
pin_b = "gpio3"   # phase B
reverse = true
bounce_window_ms = 8

[buttons]
confirm = "!gpio4"
step = "none"
power = "gpio5"
debounce_ms = 25

[setpoint]
initial = 3.5
min = 0.5
max = 12
fine_step = 0.05
coarse_step = 0.5
confirm_timeout_ms = 3000
start_fine = false

[power]
sleep_grace_ms = 80
"#;

    #[test]
    fn test_parse_pin_string() {
        let pin = parse_pin_string("gpio11").unwrap();
        assert_eq!(pin.pin, 11);
        assert!(!pin.inverted);

        let pin = parse_pin_string("\"!gpio12\"").unwrap();
        assert_eq!(pin.pin, 12);
        assert!(pin.inverted);

        assert!(parse_pin_string("pin12").is_none());
        assert!(parse_pin_string("gpio").is_none());
        assert!(parse_pin_string("gpio300").is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let cfg = parse_config(PANEL).unwrap();

        assert_eq!(cfg.encoder.pin_a, PinConfig::new(2));
        assert_eq!(cfg.encoder.pin_b, PinConfig::new(3));
        assert!(cfg.encoder.reverse);
        assert_eq!(cfg.encoder.bounce_window_ms, 8);

        assert_eq!(cfg.buttons.confirm, Some(PinConfig::inverted(4)));
        assert_eq!(cfg.buttons.step, None);
        assert_eq!(cfg.buttons.power, PinConfig::new(5));
        assert_eq!(cfg.buttons.debounce_ms, 25);
        // Untouched key keeps its default
        assert_eq!(cfg.buttons.consistency_period_ms, 500);

        assert_eq!(cfg.setpoint.initial, 3.5);
        assert_eq!(cfg.setpoint.max, 12.0);
        assert_eq!(cfg.setpoint.confirm_timeout_ms, 3000);
        assert!(!cfg.setpoint.start_fine);

        assert_eq!(cfg.power.sleep_grace_ms, 80);
        assert_eq!(cfg.power.run_flag_timeout_ms, 100);

        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_empty_file_is_factory_config() {
        assert_eq!(parse_config("").unwrap(), PanelConfig::default());
    }

    #[test]
    fn test_missing_sections_keep_defaults() {
        let cfg = parse_config("[setpoint]\nmax = 20.0\n").unwrap();
        assert_eq!(cfg.encoder, PanelConfig::default().encoder);
        assert_eq!(cfg.buttons, PanelConfig::default().buttons);
        assert_eq!(cfg.setpoint.max, 20.0);
        assert_eq!(cfg.setpoint.min, 2.0);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_unknown_key_reports_line() {
        let err = parse_config("[encoder]\npin_c = \"gpio1\"\n").unwrap_err();
        assert_eq!(err, ParseError::UnknownKey(2));
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn test_key_before_section() {
        assert_eq!(
            parse_config("pin_a = \"gpio1\""),
            Err(ParseError::UnknownKey(1))
        );
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[display]\n"),
            Err(ParseError::InvalidSection(1))
        );
        assert_eq!(
            parse_config("[encoder\n"),
            Err(ParseError::InvalidSection(1))
        );
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse_config("[setpoint]\nmin = low\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[setpoint]\nmax = inf\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[encoder]\nreverse = yes\n"),
            Err(ParseError::InvalidValue(2))
        );
        assert_eq!(
            parse_config("[buttons]\npower = \"gpioX\"\n"),
            Err(ParseError::InvalidPin(2))
        );
        assert_eq!(
            parse_config("[power]\nsleep_grace_ms = -5\n"),
            Err(ParseError::InvalidValue(2))
        );
    }

    #[test]
    fn test_missing_equals() {
        assert_eq!(parse_config("[power]\nsleep_grace_ms\n"), Err(ParseError::Syntax(2)));
    }

    #[test]
    fn test_hash_inside_string_kept() {
        assert_eq!(strip_comment("a = \"x#y\" # note"), "a = \"x#y\" ");
    }
}
