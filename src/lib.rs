#![deny(unreachable_pub)]
pub mod config;
pub mod kandel;
pub mod price_feed;
mod consts;
mod helpers;
pub use consts::{
    DEFAULT_GAS_REQUIREMENT, MIN_BASE_VOLUME, MIN_NOTIONAL_USD, MIN_PROVISION_WEI, TICK_BASE,
};
pub use helpers::{f64_to_units, format_units, parse_units, units_to_f64};
