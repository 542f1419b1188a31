//! Scalar coercions for device-reported fields.
//!
//! Every function is total: bad input never panics, it maps to a value the
//! caller can tell apart from a real reading.

use crate::item::Reading;

/// Tokens that count as healthy, compared case-insensitively.
const HEALTHY_TOKENS: &[&str] = &["good", "ok", "normal"];

/// Parse a number that may carry a trailing unit, e.g. "650 W", "45", "12.5C".
///
/// Returns `None` when nothing numeric is left after the unit is stripped.
pub fn unit_number(raw: &str) -> Option<f64> {
    let number = raw
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%' || c.is_whitespace());

    if number.is_empty() {
        return None;
    }

    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Same as [`unit_number`], wrapped as a [`Reading`].
pub fn unit_reading(raw: &str) -> Reading {
    Reading::from(unit_number(raw))
}

/// Map a free-text status to a health code: 1 for a healthy token, else 0.
///
/// Fail-closed: empty or unknown vocabulary is unhealthy.
pub fn health_code(raw: &str) -> f64 {
    let status = raw.trim();
    if HEALTHY_TOKENS
        .iter()
        .any(|token| status.eq_ignore_ascii_case(token))
    {
        1.0
    } else {
        0.0
    }
}

/// Result of decoding a hex fan intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HexPercent {
    /// Whole percent, 0..=100
    Percent(f64),
    Invalid,
    OutOfRange,
}

impl HexPercent {
    pub fn value(&self) -> f64 {
        Reading::from(*self).value()
    }
}

impl From<HexPercent> for Reading {
    fn from(hex: HexPercent) -> Self {
        match hex {
            HexPercent::Percent(p) => Reading::Measured(p),
            HexPercent::Invalid => Reading::Invalid,
            HexPercent::OutOfRange => Reading::OutOfRange,
        }
    }
}

/// Convert a hex byte like "0x80" into a percentage of 0xFF.
///
/// The result is truncated to a whole percent.
pub fn hex_percent(raw: &str) -> HexPercent {
    let raw = raw.trim();
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);

    // from_str_radix would accept a leading sign
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return HexPercent::Invalid;
    }

    let value = match u64::from_str_radix(digits, 16) {
        Ok(v) => v,
        // only overflow is left at this point
        Err(_) => return HexPercent::OutOfRange,
    };

    if value > 255 {
        return HexPercent::OutOfRange;
    }

    HexPercent::Percent((value as f64 / 255.0 * 100.0).trunc())
}
