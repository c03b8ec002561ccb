//! Asset mint transaction.

use ember_types::{Address, AssetType, LockScriptHash, NetworkId, ShardId, Signature, TxHash};
use serde::{Deserialize, Serialize};

/// The initial output of a freshly minted asset.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetMintOutput {
    pub lock_script_hash: LockScriptHash,
    pub parameters: Vec<Vec<u8>>,
    /// Total supply of the new asset, all placed in this single output.
    pub supply: u64,
}

/// Create a new asset type.
///
/// The asset type is derived from the transaction hash, so it is unique
/// per mint and cannot be chosen by the minter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MintAssetTx {
    pub hash: TxHash,
    pub signer: Address,
    pub output: AssetMintOutput,
    pub shard_id: ShardId,
    pub seq: u64,
    pub fee: u64,
    pub network_id: NetworkId,
    pub signature: Signature,
}

impl MintAssetTx {
    /// The asset type this mint creates.
    pub fn asset_type(&self) -> AssetType {
        AssetType::from_tx_hash(self.hash.as_bytes())
    }
}
