//! Grid market-making core
//!
//! Pure pricing and sizing math (ticks, dust minimums, ladder construction,
//! provision), plus the chain-facing pieces built on top of it: the position
//! reconciler and the deployment registry.

pub mod distribution;
pub mod errors;
pub mod position;
pub mod provision;
pub mod reconciler;
pub mod registry;
pub mod tick;
pub mod types;
pub mod volume;

pub use distribution::{build_distribution, required_capital};
pub use errors::{KandelError, KandelResult};
pub use position::{summarize, Position};
pub use provision::{estimate_provision, estimate_provision_with_buffer, position_value_usd};
pub use reconciler::{ChainReader, GridCandidate, Reconciler};
pub use registry::{DeploymentRegistry, GridDeployment, MarketPair};
pub use tick::{price_to_tick, tick_to_price};
pub use types::{
    BookSide, CapitalRequirement, Distribution, LadderParams, MarketSpec, OrderDescriptor,
    RawOffer, TokenBalances,
};
pub use volume::{minimum_quote_volume, minimum_volume};
