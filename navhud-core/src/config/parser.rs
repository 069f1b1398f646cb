//! Minimal TOML reader for `navhud.toml`
//!
//! Handles only the subset the configuration uses, without allocating:
//! - `[section]` headers
//! - `key = value` pairs (string, integer, boolean)
//! - Integers in decimal or `0x` hex, with optional `_` separators
//! - Comments (`# ...`)
//!
//! Unknown sections and keys are rejected so typos do not silently fall
//! back to defaults. Missing keys keep their defaults.

use heapless::String;
use navhud_protocol::BitmapOffset;

use super::types::{ConfigError, HudConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection { line: u16 },
    /// Key not valid in its section
    UnknownKey { line: u16 },
    /// Line is not `key = value`
    InvalidLine { line: u16 },
    /// Value has the wrong type or is out of range
    InvalidValue { line: u16 },
    /// Parsed, but failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Link,
    Display,
    Decoder,
}

/// Parse and validate a configuration file
pub fn parse_config(input: &str) -> Result<HudConfig, ParseError> {
    let mut config = HudConfig::new();
    let mut section = Section::Root;

    for (n, line) in input.lines().enumerate() {
        let line_no = (n + 1).min(u16::MAX as usize) as u16;
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header
                .strip_suffix(']')
                .ok_or(ParseError::InvalidSection { line: line_no })?;
            section = match header.trim() {
                "link" => Section::Link,
                "display" => Section::Display,
                "decoder" => Section::Decoder,
                _ => return Err(ParseError::InvalidSection { line: line_no }),
            };
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ParseError::InvalidLine { line: line_no })?;
        apply_value(&mut config, section, key, value, line_no)?;
    }

    config.validate()?;
    Ok(config)
}

fn apply_value(
    config: &mut HudConfig,
    section: Section,
    key: &str,
    value: &str,
    line: u16,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue { line };

    match (section, key) {
        (Section::Link, "device_name") => {
            let name = parse_string(value).ok_or(invalid)?;
            config.link.device_name = String::try_from(name).map_err(|_| invalid)?;
        }
        (Section::Link, "session_timeout_ms") => {
            config.link.session_timeout_ms = parse_int(value).ok_or(invalid)?;
        }
        (Section::Link, "tick_interval_ms") => {
            config.link.tick_interval_ms = parse_int(value).ok_or(invalid)?;
        }
        (Section::Display, "i2c_address") => {
            config.display.i2c_address = parse_int(value).ok_or(invalid)?;
        }
        (Section::Display, "contrast") => {
            config.display.contrast = parse_int(value).ok_or(invalid)?;
        }
        (Section::Display, "power_off_on_disconnect") => {
            config.display.power_off_on_disconnect = parse_bool(value).ok_or(invalid)?;
        }
        (Section::Decoder, "bitmap_offset") => {
            config.decoder.bitmap_offset = match parse_string(value).ok_or(invalid)? {
                "legacy" => BitmapOffset::Legacy,
                "trailing" => BitmapOffset::Trailing,
                _ => return Err(invalid),
            };
        }
        _ => return Err(ParseError::UnknownKey { line }),
    }

    Ok(())
}

/// Remove a trailing comment, ignoring `#` inside strings
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

/// Quoted string contents
fn parse_string(value: &str) -> Option<&str> {
    value.strip_prefix('"')?.strip_suffix('"')
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Unsigned integer, decimal or 0x-prefixed hex
fn parse_int<T: TryFrom<u32>>(value: &str) -> Option<T> {
    let (digits, radix) = match value.strip_prefix("0x") {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };

    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return None;
    }

    let mut result: u32 = 0;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix)?;
        result = result.checked_mul(radix)?.checked_add(digit)?;
    }

    T::try_from(result).ok()
}
