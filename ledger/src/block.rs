//! Block type as seen by settlement.
//!
//! Header validation, sealing, and ordering are the consensus layer's
//! business; settlement only needs the author, the ledger time, and the
//! ordered transaction list.

use ember_transactions::Transaction;
use ember_types::{Address, BlockHash, Timestamp};
use serde::{Deserialize, Serialize};

/// An ordered batch of transactions finalized by consensus.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub hash: BlockHash,
    /// The proposer credited with the block reward and fee remainder.
    pub author: Address,
    /// Ledger time for every validation inside this block.
    pub timestamp: Timestamp,
    pub transactions: Vec<Transaction>,
}
