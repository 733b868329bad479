//! Input validation applied before any chain interaction.

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::{Address, U256};
use thiserror::Error;

pub const DEFAULT_AMOUNT_MIN: f64 = 0.0;
pub const DEFAULT_INTEGER_MIN: f64 = 1.0;
pub const DEFAULT_MAX: f64 = 1_000_000_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: 주소 형식 오류")]
    InvalidAddress { field: &'static str },
    #[error("{field}: 수량 오류")]
    InvalidAmount { field: &'static str },
    #[error("{field}: 1분 이상의 정수여야 합니다")]
    InvalidMinutes { field: &'static str },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidAddress { field }
            | ValidationError::InvalidAmount { field }
            | ValidationError::InvalidMinutes { field } => field,
        }
    }
}

/// `0x` followed by exactly 40 hex digits, any case. No checksum check.
pub fn is_valid_address(s: &str) -> bool {
    s.len() == 42
        && s.starts_with("0x")
        && s.as_bytes()[2..].iter().all(|b| b.is_ascii_hexdigit())
}

pub fn is_valid_amount(s: &str, min: f64, max: f64) -> bool {
    match parse_finite(s) {
        Some(v) => v >= min && v <= max,
        None => false,
    }
}

pub fn is_valid_integer(s: &str, min: f64, max: f64) -> bool {
    match parse_finite(s) {
        Some(v) => v.fract() == 0.0 && v >= min && v <= max,
        None => false,
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn require_address(field: &'static str, raw: &str) -> Result<Address, ValidationError> {
    let raw = raw.trim();
    if !is_valid_address(raw) {
        return Err(ValidationError::InvalidAddress { field });
    }
    raw.parse()
        .map_err(|_| ValidationError::InvalidAddress { field })
}

/// Validates an amount in `[min, DEFAULT_MAX]` and converts it to 18-decimal base units.
pub fn require_amount(field: &'static str, raw: &str, min: f64) -> Result<U256, ValidationError> {
    if !is_valid_amount(raw, min, DEFAULT_MAX) {
        return Err(ValidationError::InvalidAmount { field });
    }
    to_base_units(raw).ok_or(ValidationError::InvalidAmount { field })
}

pub fn require_minutes(field: &'static str, raw: &str) -> Result<U256, ValidationError> {
    if !is_valid_integer(raw, DEFAULT_INTEGER_MIN, DEFAULT_MAX) {
        return Err(ValidationError::InvalidMinutes { field });
    }
    // Bounded to [1, 1e9] and integral, so the cast is exact ("60.0" is 60 minutes).
    parse_finite(raw)
        .map(|v| U256::from(v as u64))
        .ok_or(ValidationError::InvalidMinutes { field })
}

/// Human decimal string to 18-decimal fixed point. `None` for anything `parse_ether`
/// rejects (exponent notation, more than 18 fractional digits, ...).
pub fn to_base_units(raw: &str) -> Option<U256> {
    parse_ether(raw.trim()).ok()
}

pub fn format_base_units(value: U256) -> String {
    let formatted = format_ether(value);
    match formatted.split_once('.') {
        Some((whole, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{frac}")
            }
        }
        None => formatted,
    }
}

/// Fixed number of fractional digits, truncating.
pub fn format_base_units_fixed(value: U256, digits: usize) -> String {
    let formatted = format_ether(value);
    let (whole, frac) = formatted.split_once('.').unwrap_or((formatted.as_str(), ""));
    if digits == 0 {
        return whole.to_owned();
    }
    let mut frac: String = frac.chars().take(digits).collect();
    while frac.len() < digits {
        frac.push('0');
    }
    format!("{whole}.{frac}")
}
