//! Batch position reconciler
//!
//! Rebuilds the position view for a list of candidate grid addresses from
//! read-only chain queries. The candidate list comes from persistence and is
//! untrusted: stale or foreign contracts are expected, logged, and skipped
//! without failing the batch. Each pass builds an independent result set, so
//! concurrent passes share nothing but the remote data source.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use futures_util::future::join_all;
use log::{debug, warn};

use super::errors::KandelResult;
use super::position::{summarize, Position};
use super::types::{BookSide, MarketSpec, RawOffer, TokenBalances};

/// Read-only chain access needed by the reconciler - mockable for tests.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Admin (owner) of a grid contract; errors if the address is not a grid.
    async fn grid_admin(&self, grid: Address) -> KandelResult<Address>;

    /// All live offers on one side of the shared book.
    async fn offers(&self, side: BookSide) -> KandelResult<Vec<RawOffer>>;

    /// Base/quote token balances held by a grid contract.
    async fn token_balances(&self, grid: Address) -> KandelResult<TokenBalances>;

    /// Provision escrowed for the grid with the core exchange contract.
    async fn provision_balance(&self, grid: Address) -> KandelResult<U256>;

    /// Native balance of the grid contract, used as a provision fallback.
    async fn native_balance(&self, grid: Address) -> KandelResult<U256>;
}

/// One registry entry to probe during a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCandidate {
    pub address: Address,
    /// Price points recorded at deploy time; display metadata only
    pub price_points: u32,
}

/// Rebuilds position views from live chain reads.
pub struct Reconciler {
    market: MarketSpec,
}

impl Reconciler {
    pub fn new(market: MarketSpec) -> Self {
        Self { market }
    }

    /// Reconcile every candidate owned by `owner` into a best-effort
    /// position list.
    ///
    /// The shared book is read once per pass; candidates are then processed
    /// concurrently and merged by address, so completion order is
    /// irrelevant. A failure on one candidate never fails the batch; only an
    /// unreadable book does.
    pub async fn reconcile_all<R: ChainReader>(
        &self,
        reader: &R,
        owner: Address,
        candidates: &[GridCandidate],
        eth_price_usd: f64,
    ) -> KandelResult<Vec<Position>> {
        let (book_asks, book_bids) = tokio::try_join!(
            reader.offers(BookSide::SellBase),
            reader.offers(BookSide::SellQuote)
        )?;

        let results = join_all(candidates.iter().map(|candidate| {
            self.reconcile_one(
                reader,
                owner,
                *candidate,
                &book_asks,
                &book_bids,
                eth_price_usd,
            )
        }))
        .await;

        Ok(results.into_iter().flatten().collect())
    }

    async fn reconcile_one<R: ChainReader>(
        &self,
        reader: &R,
        owner: Address,
        candidate: GridCandidate,
        book_asks: &[RawOffer],
        book_bids: &[RawOffer],
        eth_price_usd: f64,
    ) -> Option<Position> {
        let grid = candidate.address;

        let admin = match reader.grid_admin(grid).await {
            Ok(admin) => admin,
            Err(e) => {
                warn!("skipping {grid}: not a readable grid contract: {e}");
                return None;
            }
        };

        if admin != owner {
            debug!("skipping {grid}: owned by {admin}, not {owner}");
            return None;
        }

        let balances = match reader.token_balances(grid).await {
            Ok(balances) => balances,
            Err(e) => {
                warn!("skipping {grid}: balance read failed: {e}");
                return None;
            }
        };

        let provision = match reader.provision_balance(grid).await {
            Ok(provision) => provision,
            Err(e) => {
                warn!("provision read failed for {grid}, falling back to native balance: {e}");
                match reader.native_balance(grid).await {
                    Ok(balance) => balance,
                    Err(e) => {
                        warn!("skipping {grid}: native balance read failed: {e}");
                        return None;
                    }
                }
            }
        };

        let position = summarize(
            grid,
            book_asks,
            book_bids,
            balances,
            provision,
            candidate.price_points,
            eth_price_usd,
            self.market,
        );

        if position.is_negligible() {
            debug!("hiding withdrawn grid {grid}");
            return None;
        }

        Some(position)
    }
}

/// Mock chain reader for testing without a node connection.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    use super::super::errors::KandelError;

    /// In-memory chain state with per-call failure switches.
    #[derive(Default)]
    pub struct MockChain {
        pub admins: Arc<Mutex<HashMap<Address, Address>>>,
        pub asks: Arc<Mutex<Vec<RawOffer>>>,
        pub bids: Arc<Mutex<Vec<RawOffer>>>,
        pub balances: Arc<Mutex<HashMap<Address, TokenBalances>>>,
        pub provisions: Arc<Mutex<HashMap<Address, U256>>>,
        pub native: Arc<Mutex<HashMap<Address, U256>>>,
        pub fail_book: Arc<Mutex<bool>>,
        pub fail_provision: Arc<Mutex<bool>>,
    }

    impl MockChain {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn register_grid(&self, grid: Address, admin: Address) {
            self.admins.lock().await.insert(grid, admin);
            self.balances
                .lock()
                .await
                .entry(grid)
                .or_insert_with(TokenBalances::default);
        }

        pub async fn set_balances(&self, grid: Address, balances: TokenBalances) {
            self.balances.lock().await.insert(grid, balances);
        }

        pub async fn set_provision(&self, grid: Address, wei: U256) {
            self.provisions.lock().await.insert(grid, wei);
        }

        pub async fn set_native(&self, grid: Address, wei: U256) {
            self.native.lock().await.insert(grid, wei);
        }

        pub async fn push_offer(&self, side: BookSide, offer: RawOffer) {
            match side {
                BookSide::SellBase => self.asks.lock().await.push(offer),
                BookSide::SellQuote => self.bids.lock().await.push(offer),
            }
        }

        pub async fn set_fail_provision(&self, fail: bool) {
            *self.fail_provision.lock().await = fail;
        }
    }

    #[async_trait]
    impl ChainReader for MockChain {
        async fn grid_admin(&self, grid: Address) -> KandelResult<Address> {
            self.admins.lock().await.get(&grid).copied().ok_or_else(|| {
                KandelError::UnreadableContract {
                    address: grid.to_string(),
                    reason: "no admin() method".into(),
                }
            })
        }

        async fn offers(&self, side: BookSide) -> KandelResult<Vec<RawOffer>> {
            if *self.fail_book.lock().await {
                return Err(KandelError::Chain("book read failed".into()));
            }
            Ok(match side {
                BookSide::SellBase => self.asks.lock().await.clone(),
                BookSide::SellQuote => self.bids.lock().await.clone(),
            })
        }

        async fn token_balances(&self, grid: Address) -> KandelResult<TokenBalances> {
            self.balances
                .lock()
                .await
                .get(&grid)
                .copied()
                .ok_or_else(|| KandelError::Chain(format!("no balances for {grid}")))
        }

        async fn provision_balance(&self, grid: Address) -> KandelResult<U256> {
            if *self.fail_provision.lock().await {
                return Err(KandelError::Chain("provision read failed".into()));
            }
            Ok(self
                .provisions
                .lock()
                .await
                .get(&grid)
                .copied()
                .unwrap_or(U256::ZERO))
        }

        async fn native_balance(&self, grid: Address) -> KandelResult<U256> {
            Ok(self
                .native
                .lock()
                .await
                .get(&grid)
                .copied()
                .unwrap_or(U256::ZERO))
        }
    }
}
