use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("order origin outputs do not match the inputs the order is bound to")]
    InvalidOriginOutputs,

    #[error("order exchanges an asset type for itself")]
    InvalidOrderAssetTypes,

    #[error("order ratio has a zero side")]
    InvalidOrderAssetQuantities,

    #[error("order expired at {expiration}, ledger time is {now}")]
    OrderExpired { expiration: u64, now: u64 },

    #[error("origin output lock script hash does not match the order")]
    InvalidOrderLockScriptHash,

    #[error("origin output parameters do not match the order")]
    InvalidOrderParameters,

    #[error("transfer quantities are inconsistent with its orders: {reason}")]
    InconsistentTransactionInOutWithOrders { reason: &'static str },

    #[error("input and output quantities do not balance for asset type {asset_type}")]
    InconsistentTransactionInOut { asset_type: String },

    #[error("input {index} does not match the recorded output it spends")]
    InvalidAssetOutPoint { index: usize },
}
