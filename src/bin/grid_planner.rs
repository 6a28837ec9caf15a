//! Grid Planner Binary
//!
//! Plans a grid deployment offline: builds the ladder for a price range,
//! reports the token capital and gas provision it needs, and values the
//! total in USD at the current feed price. Nothing is sent on-chain.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin grid_planner -- --config config.toml \
//!     --min 3230 --max 4370 --base-per-ask 0.1 --quote-per-bid 250
//! ```

use std::env;

use alloy::primitives::U256;
use log::{error, info, warn};

use kandel_grid_sdk::config::Settings;
use kandel_grid_sdk::kandel::{
    build_distribution, estimate_provision, required_capital, LadderParams,
};
use kandel_grid_sdk::price_feed::EthPriceFeed;
use kandel_grid_sdk::{format_units, parse_units, units_to_f64};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment from: {}", path.display()),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let args = match PlannerArgs::parse(env::args().collect()) {
        Ok(args) => args,
        Err(e) => {
            error!("{}", e);
            error!(
                "Usage: grid_planner --config <file> --min <price> --max <price> \
                 --base-per-ask <amount> --quote-per-bid <amount> [--gas-price-gwei <gwei>]"
            );
            return;
        }
    };

    let settings = match Settings::new(&args.config_path) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return;
        }
    };

    let market = settings.market.spec();
    let base_per_ask = match parse_units(&args.base_per_ask, market.base_decimals) {
        Ok(amount) => amount,
        Err(e) => {
            error!("Bad --base-per-ask value: {}", e);
            return;
        }
    };
    let quote_per_bid = match parse_units(&args.quote_per_bid, market.quote_decimals) {
        Ok(amount) => amount,
        Err(e) => {
            error!("Bad --quote-per-bid value: {}", e);
            return;
        }
    };

    let params = LadderParams {
        min_price: args.min_price,
        max_price: args.max_price,
        price_points: settings.deploy.price_points,
        step_size: settings.deploy.step_size,
        base_per_ask,
        quote_per_bid,
    };

    info!(
        "Planning {}/{} grid: {} - {} over {} price points",
        settings.market.base_symbol,
        settings.market.quote_symbol,
        params.min_price,
        params.max_price,
        params.price_points
    );

    let distribution = match build_distribution(&params, market) {
        Ok(distribution) => distribution,
        Err(e) => {
            error!("Failed to build distribution: {}", e);
            return;
        }
    };

    info!(
        "Ladder: {} asks, {} bids ({} offers total)",
        distribution.asks.len(),
        distribution.bids.len(),
        distribution.total_offers()
    );

    let capital = required_capital(&distribution);
    info!(
        "Capital required: {} {} + {} {}",
        format_units(capital.total_base, market.base_decimals),
        settings.market.base_symbol,
        format_units(capital.total_quote, market.quote_decimals),
        settings.market.quote_symbol
    );

    let gas_price_wei = U256::from(args.gas_price_gwei) * U256::from(1_000_000_000u64);
    let provision = estimate_provision(
        settings.deploy.gasreq,
        gas_price_wei,
        distribution.total_offers() as u32,
    );
    info!(
        "Provision required: {} ETH ({} gas/offer at {} gwei, 1.5x buffer)",
        format_units(provision, 18),
        settings.deploy.gasreq,
        args.gas_price_gwei
    );

    let quote = EthPriceFeed::new().fetch_or_fallback().await;
    let base_usd = units_to_f64(capital.total_base, market.base_decimals) * quote.usd;
    let quote_usd = units_to_f64(capital.total_quote, market.quote_decimals);
    let provision_usd = units_to_f64(provision, 18) * quote.usd;
    info!(
        "Total to commit: ${:.2} (${:.2} base, ${:.2} quote, ${:.2} provision) at ETH ${:.2} [{:?}]",
        base_usd + quote_usd + provision_usd,
        base_usd,
        quote_usd,
        provision_usd,
        quote.usd,
        quote.source
    );

    if distribution.asks.is_empty() {
        warn!("Ladder has no asks; the grid will only buy");
    }
    if distribution.bids.is_empty() {
        warn!("Ladder has no bids; the grid will only sell");
    }
}

struct PlannerArgs {
    config_path: String,
    min_price: f64,
    max_price: f64,
    base_per_ask: String,
    quote_per_bid: String,
    gas_price_gwei: u64,
}

impl PlannerArgs {
    fn parse(args: Vec<String>) -> Result<Self, String> {
        let mut config_path = None;
        let mut min_price = None;
        let mut max_price = None;
        let mut base_per_ask = None;
        let mut quote_per_bid = None;
        let mut gas_price_gwei = 1u64;

        let mut iter = args.into_iter().skip(1);
        while let Some(flag) = iter.next() {
            let value = iter
                .next()
                .ok_or_else(|| format!("Missing value for {flag}"))?;
            match flag.as_str() {
                "--config" => config_path = Some(value),
                "--min" => {
                    min_price = Some(value.parse().map_err(|_| format!("Bad --min: {value}"))?)
                }
                "--max" => {
                    max_price = Some(value.parse().map_err(|_| format!("Bad --max: {value}"))?)
                }
                "--base-per-ask" => base_per_ask = Some(value),
                "--quote-per-bid" => quote_per_bid = Some(value),
                "--gas-price-gwei" => {
                    gas_price_gwei = value
                        .parse()
                        .map_err(|_| format!("Bad --gas-price-gwei: {value}"))?
                }
                other => return Err(format!("Unknown flag: {other}")),
            }
        }

        Ok(Self {
            config_path: config_path.ok_or("Missing --config")?,
            min_price: min_price.ok_or("Missing --min")?,
            max_price: max_price.ok_or("Missing --max")?,
            base_per_ask: base_per_ask.ok_or("Missing --base-per-ask")?,
            quote_per_bid: quote_per_bid.ok_or("Missing --quote-per-bid")?,
            gas_price_gwei,
        })
    }
}
