//! Build script for detent-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// User GPIOs on the RP2040
const GPIO_COUNT: i64 = 30;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds panel.toml as its configuration.            ║\n\
            ║  Please create one in the detent-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_pins(&config, &mut errors);
    validate_setpoint(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in panel.toml                      ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=panel.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse "gpioN" / "!gpioN" into a pin number
fn parse_pin(value: &str) -> Option<i64> {
    let s = value.strip_prefix('!').unwrap_or(value);
    s.strip_prefix("gpio")?.parse().ok()
}

/// Check pin strings, falling back to the factory pin for keys left out
/// (as the firmware's parser does)
fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let entries = [
        ("encoder", "pin_a", "gpio16", false),
        ("encoder", "pin_b", "gpio17", false),
        ("buttons", "confirm", "gpio21", true),
        ("buttons", "step", "gpio20", true),
        ("buttons", "power", "gpio19", false),
    ];

    let mut used: Vec<(i64, String)> = Vec::new();
    for (section, key, default, optional) in entries {
        let value = match config.get(section).and_then(|s| s.get(key)) {
            None => default,
            Some(v) => match v.as_str() {
                Some(s) => s.trim(),
                None => {
                    errors.push(format!("[{}] {} must be a string", section, key));
                    continue;
                }
            },
        };
        if optional && value == "none" {
            continue;
        }

        match parse_pin(value) {
            Some(pin) if (0..GPIO_COUNT).contains(&pin) => {
                let name = format!("{}.{}", section, key);
                if let Some((_, other)) = used.iter().find(|(p, _)| *p == pin) {
                    errors.push(format!("gpio{} used by both {} and {}", pin, other, name));
                } else {
                    used.push((pin, name));
                }
            }
            Some(pin) => errors.push(format!("[{}] {}: gpio{} does not exist", section, key, pin)),
            None => errors.push(format!("[{}] {}: invalid pin '{}'", section, key, value)),
        }
    }
}

fn as_number(value: &toml::Value) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}

fn validate_setpoint(config: &toml::Value, errors: &mut Vec<String>) {
    let sp = config.get("setpoint");

    // Factory values for keys (or the whole section) left out
    let get = |key: &str, default: f64| {
        sp.and_then(|s| s.get(key))
            .and_then(as_number)
            .unwrap_or(default)
    };
    let min = get("min", 2.0);
    let max = get("max", 15.0);
    let initial = get("initial", 5.0);

    if min >= max {
        errors.push(format!("[setpoint] min ({}) must be below max ({})", min, max));
    }
    if initial < min || initial > max {
        errors.push(format!("[setpoint] initial ({}) outside {}..={}", initial, min, max));
    }
    for (key, default) in [("fine_step", 0.1), ("coarse_step", 1.0)] {
        if get(key, default) <= 0.0 {
            errors.push(format!("[setpoint] {} must be positive", key));
        }
    }
    if get("confirm_timeout_ms", 5000.0) <= 0.0 {
        errors.push("[setpoint] confirm_timeout_ms must be positive".to_string());
    }
}
