use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StakingError {
    #[error("insufficient stake: need {needed}, have {available}")]
    NotEnoughBalance { needed: u64, available: u64 },

    #[error("insufficient delegation: revoking {needed}, delegated {available}")]
    NotEnoughDelegation { needed: u64, available: u64 },

    #[error("delegatee {0} is not an active validator")]
    InvalidDelegatee(String),

    #[error("cannot delegate to self")]
    SelfDelegation,

    #[error("stake quantity must be positive")]
    ZeroQuantity,
}
