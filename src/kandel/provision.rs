//! Collateral (provision) estimation and USD valuation
//!
//! Every resting offer escrows native gas collateral so the book can
//! compensate takers if the maker fails to deliver. The per-offer gas
//! estimate comes from a live fee oracle and is caller-supplied; the math
//! here is pure.

use alloy::primitives::U256;

use crate::consts::{PROVISION_BUFFER_DEN, PROVISION_BUFFER_NUM};
use crate::helpers::units_to_f64;
use crate::kandel::types::MarketSpec;

/// Total provision for `order_count` offers with the standard 1.5x buffer.
pub fn estimate_provision(gas_per_order: u64, gas_price_wei: U256, order_count: u32) -> U256 {
    estimate_provision_with_buffer(
        gas_per_order,
        gas_price_wei,
        order_count,
        PROVISION_BUFFER_NUM,
        PROVISION_BUFFER_DEN,
    )
}

/// Provision estimate with an explicit buffer ratio.
///
/// Integer math throughout: `gas * price * count * num / den`.
pub fn estimate_provision_with_buffer(
    gas_per_order: u64,
    gas_price_wei: U256,
    order_count: u32,
    buffer_num: u64,
    buffer_den: u64,
) -> U256 {
    let per_offer = U256::from(gas_per_order) * gas_price_wei;
    let total = per_offer * U256::from(order_count);
    total * U256::from(buffer_num) / U256::from(buffer_den.max(1))
}

/// USD value of a position's free funds.
///
/// Uses available (unlocked) balances so funds already counted inside
/// resting offers are not double counted; provision is native ETH and is
/// valued at the same feed price.
pub fn position_value_usd(
    available_base: U256,
    available_quote: U256,
    provision_wei: U256,
    eth_price_usd: f64,
    market: MarketSpec,
) -> f64 {
    let base = units_to_f64(available_base, market.base_decimals);
    let quote = units_to_f64(available_quote, market.quote_decimals);
    let provision_eth = units_to_f64(provision_wei, 18);

    base * eth_price_usd + quote + provision_eth * eth_price_usd
}
