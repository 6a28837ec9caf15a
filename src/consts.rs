//! Protocol-level constants shared across the crate.

/// Logarithmic base of the exchange's tick grid: `price = TICK_BASE^tick`.
pub const TICK_BASE: f64 = 1.0001;

/// Minimum notional value per resting offer, in USD. Offers below this are
/// fee-dominated dust that takers will never execute.
pub const MIN_NOTIONAL_USD: f64 = 10.0;

/// Absolute floor for an offer's base-asset volume, in whole base units.
pub const MIN_BASE_VOLUME: f64 = 0.001;

/// Default gas requirement per resting offer.
pub const DEFAULT_GAS_REQUIREMENT: u64 = 200_000;

/// Provision safety buffer, expressed as a ratio (numerator / denominator = 1.5).
pub(crate) const PROVISION_BUFFER_NUM: u64 = 15;
pub(crate) const PROVISION_BUFFER_DEN: u64 = 10;

/// Provision below this (in wei, 0.00001 ETH) is treated as fully withdrawn.
pub const MIN_PROVISION_WEI: u128 = 10_000_000_000_000;

/// Prices above this are considered decode artifacts and ignored.
pub(crate) const PRICE_SANITY_LIMIT: f64 = 1_000_000.0;

/// ETH/USD value used when the live feed is unreachable.
pub(crate) const FALLBACK_ETH_PRICE_USD: f64 = 2500.0;

/// CoinGecko simple-price endpoint for ETH/USD.
pub(crate) const COINGECKO_PRICE_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=ethereum&vs_currencies=usd";
