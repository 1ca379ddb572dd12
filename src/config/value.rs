//! Resolved values and coercion of raw override text.

use std::fmt;
use std::time::Duration;

use super::error::ConfigError;
use super::field::{FieldId, FieldKind};

/// The typed result of resolving one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    /// Text, paths and addresses.
    Text(String),
    /// Normalized duration.
    Duration(Duration),
    /// Ports and counts.
    Integer(u32),
    /// Switches.
    Boolean(bool),
}

impl ResolvedValue {
    /// Returns the text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the duration payload, if this is a duration value.
    #[must_use]
    pub const fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<u32> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean value.
    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Duration(d) => write!(f, "{}", format_minutes(*d)),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Coerces raw override text into the field's declared type.
///
/// # Errors
///
/// Returns a coercion error naming the field and the raw value when the text
/// cannot be interpreted as the field's kind.
pub fn coerce(field: FieldId, raw: &str) -> Result<ResolvedValue, ConfigError> {
    match field.kind() {
        FieldKind::Text => Ok(ResolvedValue::Text(raw.to_string())),
        FieldKind::Path => Ok(ResolvedValue::Text(normalize_path(raw))),
        FieldKind::Port => parse_port(raw)
            .map(|p| ResolvedValue::Integer(u32::from(p)))
            .map_err(|reason| ConfigError::InvalidPort {
                field,
                value: raw.to_string(),
                reason,
            }),
        FieldKind::Integer => raw
            .trim()
            .parse::<u32>()
            .map(ResolvedValue::Integer)
            .map_err(|e| ConfigError::InvalidInteger {
                field,
                value: raw.to_string(),
                reason: e.to_string(),
            }),
        FieldKind::Duration => parse_duration(raw)
            .map(ResolvedValue::Duration)
            .map_err(|reason| ConfigError::InvalidDuration {
                field,
                value: raw.to_string(),
                reason,
            }),
        FieldKind::Boolean => parse_bool(raw)
            .map(ResolvedValue::Boolean)
            .ok_or_else(|| ConfigError::InvalidBoolean {
                field,
                value: raw.to_string(),
            }),
    }
}

/// Normalizes a filesystem path for use inside a config document.
///
/// A leading `~` is expanded to the home directory and `\` separators become
/// `/` so the value is safe inside a double-quoted YAML scalar.
#[must_use]
pub fn normalize_path(raw: &str) -> String {
    let expanded = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => dirs::home_dir()
            .map_or_else(
                || raw.to_string(),
                |home| format!("{}{rest}", home.display()),
            ),
        _ => raw.to_string(),
    };

    expanded.replace('\\', "/")
}

/// Parses a TCP port.
///
/// # Errors
///
/// Returns the reason when the text is not an integer in `1..=65535`.
pub fn parse_port(raw: &str) -> Result<u16, String> {
    let port = raw.trim().parse::<u16>().map_err(|e| e.to_string())?;
    if port == 0 {
        return Err("port must be between 1 and 65535".to_string());
    }
    Ok(port)
}

/// Parses a duration.
///
/// A bare number (integer or decimal) is interpreted as minutes. Otherwise the
/// text is a sequence of decimal numbers each followed by a unit: `h`, `m`,
/// `s`, `ms`, `us`/`µs` or `ns`, e.g. `1h30m`, `1.5h` or `500ms`.
///
/// # Errors
///
/// Returns the reason when the text is empty, has an unknown unit, or
/// overflows.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    const NANOS_PER_MINUTE: u128 = 60_000_000_000;

    let text = raw.trim();
    if text.is_empty() {
        return Err("empty duration".to_string());
    }

    if text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return scaled_nanos(text, NANOS_PER_MINUTE)
            .ok_or_else(|| format!("invalid duration '{text}'"))
            .and_then(|nanos| nanos_to_duration(nanos, text));
    }

    let mut total: u128 = 0;
    let mut rest = text;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| format!("missing unit in duration '{text}'"))?;
        if number_len == 0 {
            return Err(format!("invalid duration '{text}'"));
        }
        let (number, tail) = rest.split_at(number_len);

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let nanos_per_unit: u128 = match unit {
            "h" => 60 * NANOS_PER_MINUTE,
            "m" => NANOS_PER_MINUTE,
            "s" => 1_000_000_000,
            "ms" => 1_000_000,
            "us" | "µs" => 1_000,
            "ns" => 1,
            other => return Err(format!("unknown unit '{other}' in duration '{text}'")),
        };

        let nanos = scaled_nanos(number, nanos_per_unit)
            .ok_or_else(|| format!("invalid number '{number}' in duration '{text}'"))?;
        total = total
            .checked_add(nanos)
            .ok_or_else(|| format!("duration '{text}' is too large"))?;
        rest = next;
    }

    nanos_to_duration(total, text)
}

/// Multiplies a decimal number such as `1.5` by `unit` using integer math.
fn scaled_nanos(number: &str, unit: u128) -> Option<u128> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }

    let whole_value: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut nanos = whole_value.checked_mul(unit)?;

    if !fraction.is_empty() {
        let digits = fraction.len().min(18);
        let fraction_value: u128 = fraction[..digits].parse().ok()?;
        let scale = 10u128.pow(u32::try_from(digits).ok()?);
        nanos = nanos.checked_add(fraction_value.checked_mul(unit)? / scale)?;
    }

    Some(nanos)
}

/// Longest accepted duration in nanoseconds (`i64::MAX`, about 292 years).
const MAX_DURATION_NANOS: u128 = 9_223_372_036_854_775_807;

fn nanos_to_duration(nanos: u128, text: &str) -> Result<Duration, String> {
    if nanos > MAX_DURATION_NANOS {
        return Err(format!("duration '{text}' is too large"));
    }
    let secs = u64::try_from(nanos / 1_000_000_000)
        .map_err(|_| format!("duration '{text}' is too large"))?;
    let subsec = u32::try_from(nanos % 1_000_000_000).unwrap_or(0);
    Ok(Duration::new(secs, subsec))
}

/// Parses a boolean switch.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Whole minutes in a duration, rounded to the nearest minute.
#[must_use]
pub const fn whole_minutes(duration: Duration) -> u64 {
    duration.as_secs().saturating_add(30) / 60
}

/// Formats a duration as whole minutes with an `m` suffix, e.g. `60m`.
#[must_use]
pub fn format_minutes(duration: Duration) -> String {
    format!("{}m", whole_minutes(duration))
}

/// Formats a duration as whole seconds with an `s` suffix, e.g. `30s`.
#[must_use]
pub fn format_seconds(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}

/// Formats a duration as whole milliseconds with an `ms` suffix, e.g. `5000ms`.
#[must_use]
pub fn format_millis(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}
