//! Unspent asset output storage trait.

use crate::StoreError;
use ember_transactions::AssetOutPoint;
use ember_types::{LockScriptHash, ShardId, TxHash};
use serde::{Deserialize, Serialize};

/// An unspent asset output.
///
/// Present in the store means unspent; spending deletes the entry
/// permanently. There is no "spent" state to flip back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssetUtxo {
    /// Identity plus asset type and quantity, as spenders reference it.
    pub out: AssetOutPoint,
    /// The lock guarding this output.
    pub lock_script_hash: LockScriptHash,
    /// Lock script parameters.
    pub parameters: Vec<Vec<u8>>,
    pub shard_id: ShardId,
}

/// Trait for UTXO storage operations.
pub trait UtxoStore {
    /// Look up an unspent output by its (transaction, index) identity.
    fn get_utxo(&self, tx_hash: &TxHash, index: usize) -> Result<Option<AssetUtxo>, StoreError>;

    /// Record a freshly created output.
    fn put_utxo(&self, utxo: &AssetUtxo) -> Result<(), StoreError>;

    /// Remove a spent output. Deleting an absent entry is a
    /// [`StoreError::NotFound`]: validation must have resolved the
    /// output already, so a miss here is an applier logic bug.
    fn delete_utxo(&self, tx_hash: &TxHash, index: usize) -> Result<(), StoreError>;

    fn contains_utxo(&self, tx_hash: &TxHash, index: usize) -> Result<bool, StoreError>;

    fn utxo_count(&self) -> Result<u64, StoreError>;

    fn iter_utxos(&self) -> Result<Vec<AssetUtxo>, StoreError>;
}
