//! Per-transaction invoices.
//!
//! An invoice is what the mempool and the RPC layer see for each
//! candidate transaction: success, or a structured failure kind stable
//! enough to serialize across the wire and suppress re-propagation of
//! known-invalid transactions.

use ember_orders::OrderError;
use ember_staking::StakingError;
use ember_transactions::TransactionError;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::LedgerError;

/// The failure taxonomy reported to external layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidOriginOutputs,
    InvalidOrderAssetTypes,
    InvalidOrderAssetQuantities,
    OrderExpired,
    InvalidOrderLockScriptHash,
    InvalidOrderParameters,
    InconsistentTransactionInOutWithOrders,
    InconsistentTransactionInOut,
    InvalidAssetOutPoint,
    AssetNotFound,
    NotEnoughBalance,
    NotEnoughDelegation,
    InvalidDelegatee,
    TooLowFee,
    InvalidNetworkId,
    InvalidSeq,
    ZeroQuantity,
    InvalidTransaction,
    /// A storage or invariant failure leaked into invoice construction.
    /// These halt block application; they should never reach the mempool.
    Internal,
}

impl From<&LedgerError> for ErrorKind {
    fn from(error: &LedgerError) -> Self {
        match error {
            LedgerError::Transaction(e) => match e {
                TransactionError::ZeroQuantity => Self::ZeroQuantity,
                _ => Self::InvalidTransaction,
            },
            LedgerError::Order(e) => match e {
                OrderError::InvalidOriginOutputs => Self::InvalidOriginOutputs,
                OrderError::InvalidOrderAssetTypes => Self::InvalidOrderAssetTypes,
                OrderError::InvalidOrderAssetQuantities => Self::InvalidOrderAssetQuantities,
                OrderError::OrderExpired { .. } => Self::OrderExpired,
                OrderError::InvalidOrderLockScriptHash => Self::InvalidOrderLockScriptHash,
                OrderError::InvalidOrderParameters => Self::InvalidOrderParameters,
                OrderError::InconsistentTransactionInOutWithOrders { .. } => {
                    Self::InconsistentTransactionInOutWithOrders
                }
                OrderError::InconsistentTransactionInOut { .. } => {
                    Self::InconsistentTransactionInOut
                }
                OrderError::InvalidAssetOutPoint { .. } => Self::InvalidAssetOutPoint,
            },
            LedgerError::Staking(e) => match e {
                StakingError::NotEnoughBalance { .. } => Self::NotEnoughBalance,
                StakingError::NotEnoughDelegation { .. } => Self::NotEnoughDelegation,
                StakingError::InvalidDelegatee(_) | StakingError::SelfDelegation => {
                    Self::InvalidDelegatee
                }
                StakingError::ZeroQuantity => Self::ZeroQuantity,
            },
            LedgerError::TooLowFee { .. } => Self::TooLowFee,
            LedgerError::InvalidNetworkId { .. } => Self::InvalidNetworkId,
            LedgerError::InvalidSeq { .. } => Self::InvalidSeq,
            LedgerError::NotEnoughBalance { .. } => Self::NotEnoughBalance,
            LedgerError::AssetNotFound { .. } => Self::AssetNotFound,
            // Disabled delegations look like any other bad delegatee to
            // the outside: the transaction is rejected network-wide.
            LedgerError::DelegationsDisabled => Self::InvalidDelegatee,
            LedgerError::Store(_) | LedgerError::Config(_) | LedgerError::Internal(_) => {
                Self::Internal
            }
        }
    }
}

/// Outcome of validating or applying a single transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Invoice {
    Success,
    Failed(ErrorKind),
}

impl Invoice {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success => None,
            Self::Failed(kind) => Some(*kind),
        }
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed(kind) => write!(f, "failed: {:?}", kind),
        }
    }
}
