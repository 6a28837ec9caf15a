//! Fixed-point unit conversion between human decimal strings and raw
//! on-chain integer amounts.

use alloy::primitives::U256;

use crate::kandel::errors::{KandelError, KandelResult};

/// Parse a decimal string into a raw integer amount with `decimals` places.
///
/// Exact: "0.1" at 18 decimals yields precisely 10^17. Digits beyond
/// `decimals` places are rejected rather than silently truncated.
pub fn parse_units(value: &str, decimals: u32) -> KandelResult<U256> {
    let value = value.trim();
    if value.is_empty() || value.starts_with('-') {
        return Err(KandelError::InvalidInput(format!(
            "cannot parse '{value}' as a token amount"
        )));
    }

    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, f),
        None => (value, ""),
    };

    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
        || (int_part.is_empty() && frac_part.is_empty())
    {
        return Err(KandelError::InvalidInput(format!(
            "cannot parse '{value}' as a token amount"
        )));
    }

    if frac_part.len() > decimals as usize {
        return Err(KandelError::InvalidInput(format!(
            "'{value}' has more than {decimals} fractional digits"
        )));
    }

    let scale = U256::from(10u8).pow(U256::from(decimals));
    let int_units = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10)
            .map_err(|e| KandelError::InvalidInput(format!("'{value}': {e}")))?
    };

    let mut frac_digits = frac_part.to_string();
    while frac_digits.len() < decimals as usize {
        frac_digits.push('0');
    }
    let frac_units = if frac_digits.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&frac_digits, 10)
            .map_err(|e| KandelError::InvalidInput(format!("'{value}': {e}")))?
    };

    int_units
        .checked_mul(scale)
        .and_then(|scaled| scaled.checked_add(frac_units))
        .ok_or_else(|| KandelError::InvalidInput(format!("'{value}' overflows U256")))
}

/// Format a raw integer amount as a decimal string with `decimals` places.
///
/// Trailing fractional zeros are trimmed; whole amounts render without a
/// fractional part.
pub fn format_units(value: U256, decimals: u32) -> String {
    if decimals == 0 {
        return value.to_string();
    }

    let scale = U256::from(10u8).pow(U256::from(decimals));
    let int_part = value / scale;
    let frac_part = value % scale;

    if frac_part.is_zero() {
        return int_part.to_string();
    }

    let mut frac_digits = frac_part.to_string();
    while frac_digits.len() < decimals as usize {
        frac_digits.insert(0, '0');
    }
    let trimmed = frac_digits.trim_end_matches('0');
    format!("{int_part}.{trimmed}")
}

/// Lossy conversion of a raw amount to f64, for valuation and display.
pub fn units_to_f64(value: U256, decimals: u32) -> f64 {
    format_units(value, decimals).parse::<f64>().unwrap_or(0.0)
}

/// Convert a non-negative f64 amount to raw units, rounding to `decimals`
/// places first.
pub fn f64_to_units(value: f64, decimals: u32) -> KandelResult<U256> {
    if !value.is_finite() || value < 0.0 {
        return Err(KandelError::InvalidInput(format!(
            "cannot convert {value} to token units"
        )));
    }
    let rendered = format!("{:.*}", decimals as usize, value);
    parse_units(&rendered, decimals)
}
