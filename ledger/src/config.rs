//! Ledger configuration with TOML file support.

use std::path::Path;

use ember_types::{NetworkId, ProtocolParams};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Configuration for a ledger instance.
///
/// Can be loaded from a TOML file via [`LedgerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default,
/// so a partial file only overrides what it names.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Which network this ledger settles for.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// Minimum fee accepted for any transaction.
    #[serde(default = "default_min_fee")]
    pub min_transaction_fee: u64,

    /// Fixed per-block author reward.
    #[serde(default = "default_block_reward")]
    pub block_reward: u64,

    /// Whether delegation transactions are accepted. Switching this off
    /// rejects every delegation network-wide.
    #[serde(default = "default_true")]
    pub enable_delegations: bool,
}

fn default_network() -> NetworkId {
    NetworkId::Main
}

fn default_min_fee() -> u64 {
    ProtocolParams::default().min_transaction_fee
}

fn default_block_reward() -> u64 {
    ProtocolParams::default().block_reward
}

fn default_true() -> bool {
    true
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            min_transaction_fee: default_min_fee(),
            block_reward: default_block_reward(),
            enable_delegations: true,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, LedgerError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&raw)
            .map_err(|e| LedgerError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Protocol parameters derived from this configuration.
    pub fn params(&self) -> ProtocolParams {
        ProtocolParams {
            min_transaction_fee: self.min_transaction_fee,
            block_reward: self.block_reward,
            enable_delegations: self.enable_delegations,
            ..ProtocolParams::default()
        }
    }
}
