//! Core data types for grid distributions and on-chain reads

use alloy::primitives::{Address, U256};

/// Decimal configuration of the traded pair.
///
/// Ticks are recorded against the raw integer amounts both tokens use
/// on-chain, so every price/tick conversion needs the decimal difference
/// between base and quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketSpec {
    /// Decimal places of the base token (e.g. 18 for WETH)
    pub base_decimals: u32,
    /// Decimal places of the quote token (e.g. 6 for USDC)
    pub quote_decimals: u32,
}

impl MarketSpec {
    pub fn new(base_decimals: u32, quote_decimals: u32) -> Self {
        Self {
            base_decimals,
            quote_decimals,
        }
    }

    /// The WETH/USDC market the reference deployment trades.
    pub fn weth_usdc() -> Self {
        Self::new(18, 6)
    }

    /// Exponent applied when adjusting a human price onto the tick grid.
    pub fn decimal_shift(&self) -> i32 {
        self.base_decimals as i32 - self.quote_decimals as i32
    }
}

/// Which half of the shared order book a read targets.
///
/// Asks live on the market that sells base for quote; bids live on the
/// inverse market that sells quote for base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSide {
    SellBase,
    SellQuote,
}

/// One planned resting order inside a ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDescriptor {
    /// Ladder index, strictly increasing with tick
    pub index: u32,
    /// Exchange tick this order rests at
    pub tick: i64,
    /// Outbound amount offered: base units for asks, quote units for bids
    pub gives: U256,
}

/// A full ladder of asks and bids for one price range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub asks: Vec<OrderDescriptor>,
    pub bids: Vec<OrderDescriptor>,
    /// Dual-offer distance used when a filled order is reposted.
    /// Carried as metadata; the builder itself does not consume it.
    pub step_size: u32,
}

impl Distribution {
    pub fn total_offers(&self) -> usize {
        self.asks.len() + self.bids.len()
    }
}

/// Token amounts a ladder needs before it can be populated on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapitalRequirement {
    /// Sum of ask gives, in base units
    pub total_base: U256,
    /// Sum of bid gives, in quote units
    pub total_quote: U256,
}

/// Parameters for building a geometric ladder.
#[derive(Debug, Clone)]
pub struct LadderParams {
    pub min_price: f64,
    pub max_price: f64,
    /// Number of ladder indices; one is reserved as the bid/ask gap
    pub price_points: u32,
    /// Dual-offer repost distance, carried through as metadata
    pub step_size: u32,
    /// Base units offered by each ask
    pub base_per_ask: U256,
    /// Quote units offered by each bid
    pub quote_per_bid: U256,
}

/// One live offer as read from the on-chain order book.
///
/// The shared book contains other makers' offers too; `maker` is what lets
/// the reconciler attribute an offer to a specific grid contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOffer {
    pub id: u64,
    pub tick: i64,
    pub gives: U256,
    pub maker: Address,
}

/// Token balances held directly by a grid contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenBalances {
    pub base: U256,
    pub quote: U256,
}
