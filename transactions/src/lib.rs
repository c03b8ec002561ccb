//! All EMBER transaction types and their stateless validation.
//!
//! Transaction types:
//! - **Payment**: transfer base currency between accounts
//! - **MintAsset**: create a new asset type and its initial output
//! - **TransferAsset**: consume asset outputs and create new ones,
//!   optionally steered by embedded exchange orders
//! - **SetRegularKey**: bind a secondary signing key to an account
//! - **Stake**: move, delegate, or revoke stake tokens
//!
//! Stateful checks (balances, UTXO existence, seq) live in the ledger;
//! this crate owns the payload shapes and everything decidable from the
//! transaction alone.

pub mod error;
pub mod hashing;
pub mod mint;
pub mod order;
pub mod payment;
pub mod regular_key;
pub mod stake;
pub mod transfer;
pub mod validation;

use ember_types::{Address, NetworkId, Signature, TxHash};
use serde::{Deserialize, Serialize};

pub use error::TransactionError;
pub use mint::{AssetMintOutput, MintAssetTx};
pub use order::{Order, OrderOnTransfer};
pub use payment::PaymentTx;
pub use regular_key::SetRegularKeyTx;
pub use stake::{StakeAction, StakeTx};
pub use transfer::{AssetOutPoint, AssetTransferInput, AssetTransferOutput, TransferAssetTx};

/// The unified transaction enum wrapping all EMBER transaction types.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Transaction {
    Payment(payment::PaymentTx),
    MintAsset(mint::MintAssetTx),
    TransferAsset(transfer::TransferAssetTx),
    SetRegularKey(regular_key::SetRegularKeyTx),
    Stake(stake::StakeTx),
}

impl Transaction {
    /// Get the hash of this transaction.
    pub fn hash(&self) -> &TxHash {
        match self {
            Self::Payment(tx) => &tx.hash,
            Self::MintAsset(tx) => &tx.hash,
            Self::TransferAsset(tx) => &tx.hash,
            Self::SetRegularKey(tx) => &tx.hash,
            Self::Stake(tx) => &tx.hash,
        }
    }

    /// Get the signer (fee payer and seq holder) of this transaction.
    pub fn signer(&self) -> &Address {
        match self {
            Self::Payment(tx) => &tx.signer,
            Self::MintAsset(tx) => &tx.signer,
            Self::TransferAsset(tx) => &tx.signer,
            Self::SetRegularKey(tx) => &tx.signer,
            Self::Stake(tx) => &tx.signer,
        }
    }

    /// Get the sequence number.
    pub fn seq(&self) -> u64 {
        match self {
            Self::Payment(tx) => tx.seq,
            Self::MintAsset(tx) => tx.seq,
            Self::TransferAsset(tx) => tx.seq,
            Self::SetRegularKey(tx) => tx.seq,
            Self::Stake(tx) => tx.seq,
        }
    }

    /// Get the declared fee.
    pub fn fee(&self) -> u64 {
        match self {
            Self::Payment(tx) => tx.fee,
            Self::MintAsset(tx) => tx.fee,
            Self::TransferAsset(tx) => tx.fee,
            Self::SetRegularKey(tx) => tx.fee,
            Self::Stake(tx) => tx.fee,
        }
    }

    /// Get the network this transaction was signed for.
    pub fn network_id(&self) -> NetworkId {
        match self {
            Self::Payment(tx) => tx.network_id,
            Self::MintAsset(tx) => tx.network_id,
            Self::TransferAsset(tx) => tx.network_id,
            Self::SetRegularKey(tx) => tx.network_id,
            Self::Stake(tx) => tx.network_id,
        }
    }

    /// Get the signature.
    pub fn signature(&self) -> &Signature {
        match self {
            Self::Payment(tx) => &tx.signature,
            Self::MintAsset(tx) => &tx.signature,
            Self::TransferAsset(tx) => &tx.signature,
            Self::SetRegularKey(tx) => &tx.signature,
            Self::Stake(tx) => &tx.signature,
        }
    }
}
