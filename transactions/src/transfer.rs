//! Asset transfer transaction: inputs, outputs, and embedded orders.

use ember_types::{Address, AssetType, LockScriptHash, NetworkId, ShardId, Signature, TxHash};
use serde::{Deserialize, Serialize};

use crate::order::OrderOnTransfer;

/// Reference to a specific output of a prior transaction.
///
/// Carries the asset type and quantity the spender claims the output
/// holds; the ledger checks the claim against the recorded output, so a
/// transfer built from stale data fails loudly instead of moving the
/// wrong amount.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetOutPoint {
    pub tx_hash: TxHash,
    pub index: usize,
    pub asset_type: AssetType,
    pub quantity: u64,
}

/// One consumed input of a transfer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetTransferInput {
    pub prev_out: AssetOutPoint,
    /// Arguments satisfying the previous output's lock script.
    pub unlock_params: Vec<Vec<u8>>,
}

/// One created output of a transfer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetTransferOutput {
    pub lock_script_hash: LockScriptHash,
    pub parameters: Vec<Vec<u8>>,
    pub asset_type: AssetType,
    pub quantity: u64,
    pub shard_id: ShardId,
}

/// Consume asset outputs and create new ones.
///
/// Without orders this is a plain reshuffle: per asset type, input and
/// output quantities must balance exactly. Each entry in `orders` binds
/// an exchange order to a subset of the inputs and outputs and relaxes
/// conservation along the order's declared ratio.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransferAssetTx {
    pub hash: TxHash,
    pub signer: Address,
    pub inputs: Vec<AssetTransferInput>,
    pub outputs: Vec<AssetTransferOutput>,
    pub orders: Vec<OrderOnTransfer>,
    pub seq: u64,
    pub fee: u64,
    pub network_id: NetworkId,
    pub signature: Signature,
}

impl TransferAssetTx {
    /// Outpoint a given output of this transfer will be spendable under.
    pub fn out_point(&self, index: usize) -> Option<AssetOutPoint> {
        self.outputs.get(index).map(|out| AssetOutPoint {
            tx_hash: self.hash,
            index,
            asset_type: out.asset_type,
            quantity: out.quantity,
        })
    }
}
