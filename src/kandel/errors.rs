//! Kandel-specific error types

use thiserror::Error;

/// Errors that can occur while building distributions or reconciling positions
#[derive(Error, Debug)]
pub enum KandelError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(
        "No valid offers left after dust filtering ({asks_filtered} asks, {bids_filtered} bids \
         removed); increase the liquidity amounts to meet minimum volume requirements"
    )]
    EmptyLadder {
        asks_filtered: usize,
        bids_filtered: usize,
    },

    #[error("Contract at {address} is not a readable grid: {reason}")]
    UnreadableContract { address: String, reason: String },

    #[error("Chain read error: {0}")]
    Chain(String),

    #[error("Price feed error: {0}")]
    PriceFeed(String),

    #[error("State persistence error: {0}")]
    StatePersistence(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<std::io::Error> for KandelError {
    fn from(err: std::io::Error) -> Self {
        KandelError::StatePersistence(err.to_string())
    }
}

impl From<serde_json::Error> for KandelError {
    fn from(err: serde_json::Error) -> Self {
        KandelError::JsonParse(err.to_string())
    }
}

impl From<reqwest::Error> for KandelError {
    fn from(err: reqwest::Error) -> Self {
        KandelError::PriceFeed(err.to_string())
    }
}

/// Result type for kandel operations
pub type KandelResult<T> = std::result::Result<T, KandelError>;
