//! Transaction application and block settlement.
//!
//! The [`Ledger`] is the single mutable handle over confirmed chain
//! state: the store backend, the staking ledger, protocol parameters,
//! and the active validator set. The external consensus layer drives it
//! through two entry points: [`Ledger::validate_transaction`] for the
//! mempool (read-only, per-transaction invoices) and
//! [`Ledger::apply_block`] for finalized blocks (sequential, atomic,
//! with reward and fee payout).

pub mod block;
pub mod config;
pub mod error;
pub mod genesis;
pub mod invoice;
pub mod ledger;
pub mod settlement;

pub use block::Block;
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use genesis::GenesisConfig;
pub use invoice::{ErrorKind, Invoice};
pub use ledger::Ledger;
pub use settlement::BlockOutcome;
