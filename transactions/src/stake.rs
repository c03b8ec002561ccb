//! Stake-token actions.

use ember_types::{Address, NetworkId, Signature, TxHash};
use serde::{Deserialize, Serialize};

/// The stake operation a [`StakeTx`] performs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakeAction {
    /// Move directly-held stake tokens to another account.
    TransferStake { receiver: Address, quantity: u64 },
    /// Move directly-held stake into a delegation to a validator.
    Delegate { delegatee: Address, quantity: u64 },
    /// Move previously delegated stake back to the delegator.
    Revoke { delegatee: Address, quantity: u64 },
}

impl StakeAction {
    /// The stake quantity this action moves.
    pub fn quantity(&self) -> u64 {
        match self {
            Self::TransferStake { quantity, .. }
            | Self::Delegate { quantity, .. }
            | Self::Revoke { quantity, .. } => *quantity,
        }
    }
}

/// A stake-token transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakeTx {
    pub hash: TxHash,
    pub signer: Address,
    pub action: StakeAction,
    pub seq: u64,
    pub fee: u64,
    pub network_id: NetworkId,
    pub signature: Signature,
}
