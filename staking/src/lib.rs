//! Stake and delegation ledger.
//!
//! Tracks directly-held stake tokens, delegation entries, and the
//! stakeholder set, and computes the stake-weighted fee distribution paid
//! out at block settlement. All operations are atomic check-then-mutate:
//! a rejected operation leaves the ledger untouched.

pub mod distribution;
pub mod engine;
pub mod error;

pub use distribution::distribute_fee;
pub use engine::StakingLedger;
pub use error::StakingError;
