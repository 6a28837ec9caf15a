//! ETH/USD price feed with a fixed fallback
//!
//! USD valuation is display-only, so a failed or rate-limited feed call
//! degrades to a configured fallback price instead of failing the caller.

use log::warn;
use serde::Deserialize;

use crate::consts::{COINGECKO_PRICE_URL, FALLBACK_ETH_PRICE_USD};
use crate::kandel::errors::{KandelError, KandelResult};

/// Where a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub usd: f64,
    pub source: PriceSource,
}

#[derive(Deserialize)]
struct CoinGeckoResponse {
    ethereum: CoinGeckoPrice,
}

#[derive(Deserialize)]
struct CoinGeckoPrice {
    usd: f64,
}

pub struct EthPriceFeed {
    client: reqwest::Client,
    url: String,
    fallback_usd: f64,
}

impl EthPriceFeed {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            url: COINGECKO_PRICE_URL.to_string(),
            fallback_usd: FALLBACK_ETH_PRICE_USD,
        }
    }

    pub fn with_url(url: impl Into<String>, fallback_usd: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            fallback_usd,
        }
    }

    /// Fetch the live ETH/USD price.
    pub async fn fetch(&self) -> KandelResult<f64> {
        let response: CoinGeckoResponse = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| KandelError::PriceFeed(e.to_string()))?
            .json()
            .await?;

        let price = response.ethereum.usd;
        if !price.is_finite() || price <= 0.0 {
            return Err(KandelError::PriceFeed(format!(
                "feed returned implausible price {price}"
            )));
        }
        Ok(price)
    }

    /// Fetch the live price, or fall back to the configured constant.
    pub async fn fetch_or_fallback(&self) -> PriceQuote {
        match self.fetch().await {
            Ok(usd) => PriceQuote {
                usd,
                source: PriceSource::Live,
            },
            Err(e) => {
                warn!(
                    "price feed unavailable, using fallback ${}: {e}",
                    self.fallback_usd
                );
                PriceQuote {
                    usd: self.fallback_usd,
                    source: PriceSource::Fallback,
                }
            }
        }
    }
}

impl Default for EthPriceFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_feed_falls_back() {
        // Discard port: connection is refused immediately
        let feed = EthPriceFeed::with_url("http://127.0.0.1:9/price", 2500.0);
        let quote = feed.fetch_or_fallback().await;
        assert_eq!(quote.source, PriceSource::Fallback);
        assert_eq!(quote.usd, 2500.0);
    }

    #[test]
    fn test_response_shape_parses() {
        let json = r#"{"ethereum":{"usd":3841.27}}"#;
        let parsed: CoinGeckoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.ethereum.usd, 3841.27);
    }
}
