use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("quantity must be positive")]
    ZeroQuantity,

    #[error("transfer has no inputs")]
    EmptyInputs,

    #[error("input {index} references the same output as input {first}")]
    DuplicateInput { first: usize, index: usize },

    #[error("order application references {kind} index {index}, but the transfer has {len}")]
    OrderIndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    #[error("order application input index sets overlap at input {index}")]
    OverlappingOrderInputs { index: usize },

    #[error("{0}")]
    Other(String),
}
