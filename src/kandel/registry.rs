//! Deployment registry with JSON persistence
//!
//! Records every grid the tool has deployed so later reconciliation passes
//! know which addresses to probe. The file is advisory: entries may point at
//! contracts that were withdrawn or retired out of band, and the reconciler
//! treats them accordingly.

use std::path::{Path, PathBuf};

use alloy::primitives::Address;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::KandelResult;

/// Market pair identifier as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPair {
    pub base: String,
    pub quote: String,
}

/// One deployed grid, as recorded at deploy time.
///
/// Token amounts are stored as decimal strings in human units so the file
/// stays readable and independent of integer width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridDeployment {
    pub id: Uuid,
    /// Grid contract address, checksummed hex
    pub address: String,
    pub deployed_by: String,
    pub name: String,
    pub deployed_at: DateTime<Utc>,
    pub market: MarketPair,
    pub min_price: f64,
    pub max_price: f64,
    pub price_points: u32,
    pub step_size: u32,
    pub gasreq: u64,
    pub total_base_deposited: String,
    pub total_quote_deposited: String,
    pub provision: String,
    pub active: bool,
}

/// File-backed list of deployments.
pub struct DeploymentRegistry {
    path: PathBuf,
    records: Vec<GridDeployment>,
}

impl DeploymentRegistry {
    /// Load the registry from `path`, or start empty if the file is missing.
    ///
    /// A corrupt file is an error rather than silently starting over; the
    /// records are the only link back to deployed capital.
    pub fn load_or_create(path: impl AsRef<Path>) -> KandelResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let records: Vec<GridDeployment> = serde_json::from_str(&content)?;
            info!("loaded {} deployment records from {:?}", records.len(), path);
            records
        } else {
            info!("no registry file at {:?}, starting empty", path);
            Vec::new()
        };
        Ok(Self { path, records })
    }

    pub fn records(&self) -> &[GridDeployment] {
        &self.records
    }

    /// Append a record and persist immediately.
    pub fn add(&mut self, deployment: GridDeployment) -> KandelResult<()> {
        self.records.push(deployment);
        self.save()
    }

    /// All records deployed by `owner` (case-insensitive hex compare).
    pub fn by_owner<'a>(&'a self, owner: &str) -> Vec<&'a GridDeployment> {
        self.records
            .iter()
            .filter(|r| r.deployed_by.eq_ignore_ascii_case(owner))
            .collect()
    }

    /// Parse every recorded address, skipping malformed entries.
    ///
    /// A record with a bad address is logged and left in the file so it can
    /// be inspected by hand; it just never reaches the chain.
    pub fn addresses(&self) -> Vec<Address> {
        self.records
            .iter()
            .filter_map(|r| match r.address.parse::<Address>() {
                Ok(address) => Some(address),
                Err(e) => {
                    warn!("registry record {} has malformed address {}: {e}", r.id, r.address);
                    None
                }
            })
            .collect()
    }

    /// Mark a deployment inactive (retired) and persist.
    ///
    /// Returns false if no record matches the address.
    pub fn mark_inactive(&mut self, address: &str) -> KandelResult<bool> {
        let mut found = false;
        for record in &mut self.records {
            if record.address.eq_ignore_ascii_case(address) && record.active {
                record.active = false;
                found = true;
            }
        }
        if found {
            self.save()?;
        }
        Ok(found)
    }

    /// Delete a record entirely and persist. Returns false if absent.
    pub fn remove(&mut self, id: Uuid) -> KandelResult<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// Atomic save: write to a temp file, then rename over the target.
    fn save(&self) -> KandelResult<()> {
        let temp_path = self.path.with_extension("tmp");
        let content = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_registry_path() -> PathBuf {
        std::env::temp_dir().join(format!("grid-registry-{}.json", Uuid::new_v4()))
    }

    fn sample_deployment(address: &str, owner: &str) -> GridDeployment {
        GridDeployment {
            id: Uuid::new_v4(),
            address: address.to_string(),
            deployed_by: owner.to_string(),
            name: "weth-usdc grid".to_string(),
            deployed_at: Utc::now(),
            market: MarketPair {
                base: "WETH".to_string(),
                quote: "USDC".to_string(),
            },
            min_price: 3230.0,
            max_price: 4370.0,
            price_points: 10,
            step_size: 1,
            gasreq: 200_000,
            total_base_deposited: "0.5".to_string(),
            total_quote_deposited: "1000".to_string(),
            provision: "0.054".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_roundtrip_through_file() {
        let path = temp_registry_path();
        let owner = "0x1111111111111111111111111111111111111111";
        let grid = "0x2222222222222222222222222222222222222222";

        {
            let mut registry = DeploymentRegistry::load_or_create(&path).unwrap();
            assert!(registry.records().is_empty());
            registry.add(sample_deployment(grid, owner)).unwrap();
        }

        let registry = DeploymentRegistry::load_or_create(&path).unwrap();
        assert_eq!(registry.records().len(), 1);
        assert_eq!(registry.records()[0].address, grid);
        assert_eq!(registry.records()[0].price_points, 10);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_owner_filter_is_case_insensitive() {
        let path = temp_registry_path();
        let mut registry = DeploymentRegistry::load_or_create(&path).unwrap();
        registry
            .add(sample_deployment(
                "0x2222222222222222222222222222222222222222",
                "0xAAAA111111111111111111111111111111111111",
            ))
            .unwrap();
        registry
            .add(sample_deployment(
                "0x3333333333333333333333333333333333333333",
                "0xBBBB111111111111111111111111111111111111",
            ))
            .unwrap();

        let mine = registry.by_owner("0xaaaa111111111111111111111111111111111111");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].address, "0x2222222222222222222222222222222222222222");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_malformed_address_is_skipped_not_fatal() {
        let path = temp_registry_path();
        let mut registry = DeploymentRegistry::load_or_create(&path).unwrap();
        registry
            .add(sample_deployment(
                "0x2222222222222222222222222222222222222222",
                "0x1111111111111111111111111111111111111111",
            ))
            .unwrap();
        registry
            .add(sample_deployment(
                "not-an-address",
                "0x1111111111111111111111111111111111111111",
            ))
            .unwrap();

        let addresses = registry.addresses();
        assert_eq!(addresses.len(), 1);
        // The malformed record stays in the file for inspection
        assert_eq!(registry.records().len(), 2);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_mark_inactive_and_remove() {
        let path = temp_registry_path();
        let grid = "0x2222222222222222222222222222222222222222";
        let mut registry = DeploymentRegistry::load_or_create(&path).unwrap();
        let deployment = sample_deployment(grid, "0x1111111111111111111111111111111111111111");
        let id = deployment.id;
        registry.add(deployment).unwrap();

        assert!(registry.mark_inactive(grid).unwrap());
        assert!(!registry.records()[0].active);
        // Already inactive: nothing to change
        assert!(!registry.mark_inactive(grid).unwrap());

        assert!(registry.remove(id).unwrap());
        assert!(registry.records().is_empty());
        assert!(!registry.remove(id).unwrap());

        std::fs::remove_file(&path).ok();
    }
}
