//! Price/tick codec
//!
//! The exchange records prices as discrete logarithmic ticks over the raw
//! integer token amounts: `adjusted_price = TICK_BASE^tick`, where
//! `adjusted_price = price * 10^(base_decimals - quote_decimals)`.
//!
//! Bids live on the inverse market (quote sold for base), whose ticks carry
//! the opposite sign for the same human price. Which convention applies is
//! expressed ONLY through the explicit `invert` flag; tick sign is never
//! inspected, since the two on-chain entry points disagree about it.

use crate::consts::TICK_BASE;
use crate::kandel::errors::{KandelError, KandelResult};
use crate::kandel::types::MarketSpec;

/// Convert a human price (quote per base) to the nearest tick.
///
/// Rounds to nearest rather than floor/ceil to minimize price drift; callers
/// that need one-directional rounding must post-adjust.
pub fn price_to_tick(price: f64, market: MarketSpec, invert: bool) -> KandelResult<i64> {
    if !price.is_finite() || price <= 0.0 {
        return Err(KandelError::InvalidInput(format!(
            "price must be positive and finite, got {price}"
        )));
    }

    let adjusted = price * 10f64.powi(market.decimal_shift());
    let tick = (adjusted.ln() / TICK_BASE.ln()).round() as i64;

    Ok(if invert { -tick } else { tick })
}

/// Convert a tick back to a human price (quote per base).
///
/// Total for any integer tick; extreme ticks produce astronomically large or
/// small prices, which callers must range-check themselves.
pub fn tick_to_price(tick: i64, market: MarketSpec, invert: bool) -> f64 {
    let t = if invert { -tick } else { tick };
    let adjusted = TICK_BASE.powf(t as f64);
    adjusted * 10f64.powi(-market.decimal_shift())
}
