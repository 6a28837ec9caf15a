//! Dust filter
//!
//! Offers below a minimum size are not economically executable once taker
//! gas is accounted for. The minimum is the larger of a fixed USD notional
//! and an absolute base-unit floor.

use alloy::primitives::U256;

use crate::consts::{MIN_BASE_VOLUME, MIN_NOTIONAL_USD};
use crate::helpers::{f64_to_units, units_to_f64};
use crate::kandel::errors::{KandelError, KandelResult};
use crate::kandel::types::MarketSpec;

/// Minimum base-asset volume for an offer resting at `price`, scaled to
/// `base_decimals`.
pub fn minimum_volume(price: f64, base_decimals: u32) -> KandelResult<U256> {
    if !price.is_finite() || price <= 0.0 {
        return Err(KandelError::InvalidInput(format!(
            "price must be positive and finite, got {price}"
        )));
    }

    let notional_floor = MIN_NOTIONAL_USD / price;
    let amount = notional_floor.max(MIN_BASE_VOLUME);
    f64_to_units(amount, base_decimals)
}

/// The same minimum expressed in quote units at that exact price.
///
/// Bids give quote, so their dust check must convert the base-denominated
/// minimum using the bid's own price, not a global midpoint.
pub fn minimum_quote_volume(price: f64, market: MarketSpec) -> KandelResult<U256> {
    let min_base = minimum_volume(price, market.base_decimals)?;
    let min_base_human = units_to_f64(min_base, market.base_decimals);
    f64_to_units(min_base_human * price, market.quote_decimals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::parse_units;

    #[test]
    fn test_notional_floor_dominates_at_low_prices() {
        // $10 at $3800 is ~0.00263 base units, above the absolute floor
        let min = minimum_volume(3800.0, 18).unwrap();
        let human = units_to_f64(min, 18);
        assert!((human - 10.0 / 3800.0).abs() < 1e-9);
    }

    #[test]
    fn test_absolute_floor_dominates_at_high_prices() {
        // $10 at $100000 would be 0.0001, below the 0.001 floor
        let min = minimum_volume(100_000.0, 18).unwrap();
        assert_eq!(min, parse_units("0.001", 18).unwrap());
    }

    #[test]
    fn test_crossover_price() {
        // The two floors meet at exactly $10000
        let min = minimum_volume(10_000.0, 18).unwrap();
        assert_eq!(min, parse_units("0.001", 18).unwrap());
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert!(minimum_volume(0.0, 18).is_err());
        assert!(minimum_volume(-5.0, 18).is_err());
        assert!(minimum_volume(f64::NAN, 18).is_err());
    }

    #[test]
    fn test_quote_minimum_is_notional() {
        // Below the floor crossover, min_base * price is always $10
        let market = MarketSpec::weth_usdc();
        for price in [500.0, 1200.0, 3800.0, 9000.0] {
            let min_quote = minimum_quote_volume(price, market).unwrap();
            let human = units_to_f64(min_quote, market.quote_decimals);
            assert!(
                (human - MIN_NOTIONAL_USD).abs() < 0.01,
                "quote minimum {human} at price {price}"
            );
        }

        // Above the crossover the absolute floor takes over and the quote
        // minimum grows with price
        let min_quote = minimum_quote_volume(50_000.0, market).unwrap();
        let human = units_to_f64(min_quote, market.quote_decimals);
        assert!((human - 50.0).abs() < 0.01);
    }
}
