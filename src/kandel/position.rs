//! Position model and pure single-grid reconciliation
//!
//! `summarize` folds one grid's on-chain reads (book offers on both sides,
//! token balances, escrowed provision) into a displayable `Position`. It is
//! a pure function: calling it twice with identical inputs yields identical
//! output, and it never touches chain or persisted state.

use alloy::primitives::{Address, U256};
use log::warn;

use crate::consts::{MIN_PROVISION_WEI, PRICE_SANITY_LIMIT};
use crate::kandel::provision::position_value_usd;
use crate::kandel::tick::tick_to_price;
use crate::kandel::types::{MarketSpec, RawOffer, TokenBalances};

/// Reconciled view of one deployed grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub address: Address,
    pub base_balance: U256,
    pub quote_balance: U256,
    /// Base committed inside resting asks
    pub locked_base: U256,
    /// Quote committed inside resting bids
    pub locked_quote: U256,
    /// Lowest observed offer price; 0 when no offers are live
    pub min_price: f64,
    /// Highest observed offer price; 0 when no offers are live
    pub max_price: f64,
    pub price_points: u32,
    pub active_offers: u32,
    pub provision_wei: U256,
    pub total_value_usd: f64,
    pub is_active: bool,
}

impl Position {
    /// Base balance not committed to resting offers.
    pub fn available_base(&self) -> U256 {
        self.base_balance.saturating_sub(self.locked_base)
    }

    /// Quote balance not committed to resting offers.
    pub fn available_quote(&self) -> U256 {
        self.quote_balance.saturating_sub(self.locked_quote)
    }

    /// True when the grid has been fully withdrawn: nothing left to show.
    ///
    /// A display policy, not a deletion; the contract itself is untouched.
    pub fn is_negligible(&self) -> bool {
        self.base_balance.is_zero()
            && self.quote_balance.is_zero()
            && self.provision_wei < U256::from(MIN_PROVISION_WEI)
            && self.active_offers == 0
    }
}

/// Build a `Position` from raw on-chain reads for one grid contract.
///
/// Offers made by other makers on the shared book are discarded. Ask prices
/// decode with the direct tick convention, bid prices with the explicit
/// inverse flag; tick sign is never inspected.
#[allow(clippy::too_many_arguments)]
pub fn summarize(
    grid: Address,
    book_asks: &[RawOffer],
    book_bids: &[RawOffer],
    balances: TokenBalances,
    provision_wei: U256,
    price_points: u32,
    eth_price_usd: f64,
    market: MarketSpec,
) -> Position {
    let own_asks: Vec<&RawOffer> = book_asks.iter().filter(|o| o.maker == grid).collect();
    let own_bids: Vec<&RawOffer> = book_bids.iter().filter(|o| o.maker == grid).collect();

    let locked_base = own_asks
        .iter()
        .fold(U256::ZERO, |sum, offer| sum + offer.gives);
    let locked_quote = own_bids
        .iter()
        .fold(U256::ZERO, |sum, offer| sum + offer.gives);

    let mut prices: Vec<f64> = Vec::with_capacity(own_asks.len() + own_bids.len());
    for offer in &own_asks {
        push_sane_price(&mut prices, tick_to_price(offer.tick, market, false), grid);
    }
    for offer in &own_bids {
        push_sane_price(&mut prices, tick_to_price(offer.tick, market, true), grid);
    }

    // No live offers means the range is undefined, not an error; report the
    // zero sentinel instead of fabricating a synthetic range.
    let (min_price, max_price) = if prices.is_empty() {
        (0.0, 0.0)
    } else {
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    };

    let active_offers = (own_asks.len() + own_bids.len()) as u32;

    let available_base = balances.base.saturating_sub(locked_base);
    let available_quote = balances.quote.saturating_sub(locked_quote);
    let total_value_usd = position_value_usd(
        available_base,
        available_quote,
        provision_wei,
        eth_price_usd,
        market,
    );

    Position {
        address: grid,
        base_balance: balances.base,
        quote_balance: balances.quote,
        locked_base,
        locked_quote,
        min_price,
        max_price,
        price_points,
        active_offers,
        provision_wei,
        total_value_usd,
        is_active: active_offers > 0,
    }
}

fn push_sane_price(prices: &mut Vec<f64>, price: f64, grid: Address) {
    if price > 0.0 && price < PRICE_SANITY_LIMIT {
        prices.push(price);
    } else {
        warn!("discarding implausible decoded price {price} for grid {grid}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::parse_units;
    use crate::kandel::tick::price_to_tick;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn ask(tick: i64, gives: U256, maker: Address) -> RawOffer {
        RawOffer {
            id: 1,
            tick,
            gives,
            maker,
        }
    }

    fn sample_inputs(grid: Address) -> (Vec<RawOffer>, Vec<RawOffer>, TokenBalances) {
        let market = MarketSpec::weth_usdc();
        let ask_tick = price_to_tick(4000.0, market, false).unwrap();
        let bid_tick = price_to_tick(3500.0, market, true).unwrap();

        let asks = vec![ask(ask_tick, parse_units("0.1", 18).unwrap(), grid)];
        let bids = vec![ask(bid_tick, parse_units("250", 6).unwrap(), grid)];
        let balances = TokenBalances {
            base: parse_units("0.6", 18).unwrap(),
            quote: parse_units("1250", 6).unwrap(),
        };
        (asks, bids, balances)
    }

    #[test]
    fn test_partitions_by_maker() {
        let grid = addr(0x11);
        let stranger = addr(0x22);
        let market = MarketSpec::weth_usdc();
        let tick = price_to_tick(4000.0, market, false).unwrap();

        let asks = vec![
            ask(tick, parse_units("0.1", 18).unwrap(), grid),
            ask(tick + 50, parse_units("5", 18).unwrap(), stranger),
        ];
        let position = summarize(
            grid,
            &asks,
            &[],
            TokenBalances::default(),
            U256::ZERO,
            10,
            3800.0,
            market,
        );

        assert_eq!(position.active_offers, 1);
        assert_eq!(position.locked_base, parse_units("0.1", 18).unwrap());
    }

    #[test]
    fn test_locked_and_available_balances() {
        let grid = addr(0x11);
        let (asks, bids, balances) = sample_inputs(grid);
        let position = summarize(
            grid,
            &asks,
            &bids,
            balances,
            U256::ZERO,
            10,
            3800.0,
            MarketSpec::weth_usdc(),
        );

        assert_eq!(position.locked_base, parse_units("0.1", 18).unwrap());
        assert_eq!(position.locked_quote, parse_units("250", 6).unwrap());
        assert_eq!(position.available_base(), parse_units("0.5", 18).unwrap());
        assert_eq!(position.available_quote(), parse_units("1000", 6).unwrap());
    }

    #[test]
    fn test_price_range_spans_both_sides() {
        let grid = addr(0x11);
        let (asks, bids, balances) = sample_inputs(grid);
        let position = summarize(
            grid,
            &asks,
            &bids,
            balances,
            U256::ZERO,
            10,
            3800.0,
            MarketSpec::weth_usdc(),
        );

        // Bid at ~3500 and ask at ~4000; one tick of rounding either way
        assert!((position.min_price - 3500.0).abs() / 3500.0 < 0.001);
        assert!((position.max_price - 4000.0).abs() / 4000.0 < 0.001);
        assert!(position.is_active);
    }

    #[test]
    fn test_zero_range_sentinel_when_all_filled() {
        // All orders filled: balances remain but no offers rest on the book
        let grid = addr(0x11);
        let balances = TokenBalances {
            base: parse_units("0.5", 18).unwrap(),
            quote: U256::ZERO,
        };
        let position = summarize(
            grid,
            &[],
            &[],
            balances,
            parse_units("0.054", 18).unwrap(),
            10,
            3800.0,
            MarketSpec::weth_usdc(),
        );

        assert_eq!(position.min_price, 0.0);
        assert_eq!(position.max_price, 0.0);
        assert_eq!(position.active_offers, 0);
        assert!(!position.is_active);
        assert!(!position.is_negligible());
    }

    #[test]
    fn test_usd_valuation_uses_available_balances() {
        let grid = addr(0x11);
        let (asks, bids, balances) = sample_inputs(grid);
        let position = summarize(
            grid,
            &asks,
            &bids,
            balances,
            parse_units("0.054", 18).unwrap(),
            10,
            3800.0,
            MarketSpec::weth_usdc(),
        );

        // available 0.5 WETH * 3800 + available 1000 USDC + 0.054 ETH * 3800
        let expected = 0.5 * 3800.0 + 1000.0 + 0.054 * 3800.0;
        assert!((position.total_value_usd - expected).abs() < 1e-6);
    }

    #[test]
    fn test_idempotent() {
        let grid = addr(0x11);
        let (asks, bids, balances) = sample_inputs(grid);
        let market = MarketSpec::weth_usdc();
        let provision = parse_units("0.01", 18).unwrap();

        let first = summarize(grid, &asks, &bids, balances, provision, 10, 3800.0, market);
        let second = summarize(grid, &asks, &bids, balances, provision, 10, 3800.0, market);
        assert_eq!(first, second);
    }

    #[test]
    fn test_negligible_position() {
        let grid = addr(0x11);
        let position = summarize(
            grid,
            &[],
            &[],
            TokenBalances::default(),
            // Just below the 0.00001 ETH provision threshold
            U256::from(MIN_PROVISION_WEI - 1),
            10,
            3800.0,
            MarketSpec::weth_usdc(),
        );
        assert!(position.is_negligible());

        let funded = summarize(
            grid,
            &[],
            &[],
            TokenBalances {
                base: U256::from(1u64),
                quote: U256::ZERO,
            },
            U256::ZERO,
            10,
            3800.0,
            MarketSpec::weth_usdc(),
        );
        assert!(!funded.is_negligible());
    }

    #[test]
    fn test_implausible_prices_are_dropped() {
        let grid = addr(0x11);
        // A tick so large its decoded price exceeds any sane market
        let asks = vec![ask(10_000_000, parse_units("0.1", 18).unwrap(), grid)];
        let position = summarize(
            grid,
            &asks,
            &[],
            TokenBalances::default(),
            U256::ZERO,
            10,
            3800.0,
            MarketSpec::weth_usdc(),
        );

        // The offer still counts as active and locks funds, but contributes
        // no price to the range
        assert_eq!(position.active_offers, 1);
        assert_eq!(position.min_price, 0.0);
        assert_eq!(position.max_price, 0.0);
    }
}
