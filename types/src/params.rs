//! Protocol parameters.

use serde::{Deserialize, Serialize};

/// Protocol parameters applied by every node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Minimum fee (base currency units) for any transaction.
    /// Transactions below this floor are rejected.
    pub min_transaction_fee: u64,

    /// Fixed reward (base currency units) credited to a block's author.
    pub block_reward: u64,

    /// Maximum number of outputs an order application may direct at each
    /// of its two asset types: one remainder back to the maker plus one
    /// payment to the counterparty.
    pub max_order_asset_outputs: usize,

    /// Whether delegation transactions are accepted at all.
    /// When false, every delegation is rejected network-wide.
    pub enable_delegations: bool,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            min_transaction_fee: 10,
            block_reward: 50,
            max_order_asset_outputs: 2,
            enable_delegations: true,
        }
    }
}
