use ember_orders::OrderError;
use ember_staking::StakingError;
use ember_store::StoreError;
use ember_transactions::TransactionError;
use ember_types::{NetworkId, TxHash};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Transaction(#[from] TransactionError),

    #[error("{0}")]
    Order(#[from] OrderError),

    #[error("{0}")]
    Staking(#[from] StakingError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("fee {fee} is below the minimum {minimum}")]
    TooLowFee { fee: u64, minimum: u64 },

    #[error("transaction is for network {actual:?}, this node is on {expected:?}")]
    InvalidNetworkId {
        expected: NetworkId,
        actual: NetworkId,
    },

    #[error("transaction seq {actual} does not match account seq {expected}")]
    InvalidSeq { expected: u64, actual: u64 },

    #[error("insufficient balance: need {needed}, have {available}")]
    NotEnoughBalance { needed: u64, available: u64 },

    #[error("asset {tx_hash}:{index} does not exist or is already spent")]
    AssetNotFound { tx_hash: TxHash, index: usize },

    #[error("delegations are disabled on this network")]
    DelegationsDisabled,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal invariant violated: {0}")]
    Internal(String),
}
