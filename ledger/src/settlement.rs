//! Block settlement.
//!
//! A finalized block is applied as one unit: transactions run
//! sequentially against a checkpoint, and any failure restores the
//! pre-block state entirely. This is the inverse of the mempool path,
//! where a rejection drops only the offending transaction.

use ember_staking::distribution::{distribute_fee, distributed_total};
use ember_staking::StakingLedger;
use ember_store::{AccountStore, MetaStore, Store};
use ember_types::Address;
use tracing::{info, warn};

use crate::block::Block;
use crate::error::LedgerError;
use crate::ledger::Ledger;

/// What a successfully settled block paid out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockOutcome {
    /// Sum of all transaction fees in the block.
    pub fee_total: u64,
    /// Stake-weighted fee shares credited to stakeholders, address-ordered.
    pub fee_shares: Vec<(Address, u64)>,
    /// Block reward plus the undistributed fee remainder, credited to the
    /// author.
    pub author_reward: u64,
}

impl<S: Store> Ledger<S> {
    /// Apply a finalized block atomically.
    ///
    /// On `Err` the ledger is exactly as it was before the call; the
    /// block must be rejected by the caller. Reorganization is the same
    /// operation driven from outside: restore to the fork point and
    /// replay the canonical chain's blocks.
    pub fn apply_block(&mut self, block: &Block) -> Result<BlockOutcome, LedgerError> {
        let checkpoint = self.store().checkpoint();
        let staking_backup = self.staking().clone();

        match self.apply_block_inner(block) {
            Ok(outcome) => {
                info!(
                    block = %block.hash,
                    transactions = block.transactions.len(),
                    fee_total = outcome.fee_total,
                    author_reward = outcome.author_reward,
                    "block settled"
                );
                Ok(outcome)
            }
            Err(error) => {
                self.store_mut().rollback(checkpoint);
                *self.staking_mut() = staking_backup;
                warn!(block = %block.hash, %error, "block rejected, state restored");
                Err(error)
            }
        }
    }

    fn apply_block_inner(&mut self, block: &Block) -> Result<BlockOutcome, LedgerError> {
        // Weights are sampled before the block's own stake actions take
        // effect, so the distribution a block pays cannot be steered by
        // transactions inside it.
        let weights = self.staking().weight_snapshot();

        let mut fee_total: u64 = 0;
        for tx in &block.transactions {
            self.apply_transaction(tx, block.timestamp)?;
            fee_total = fee_total
                .checked_add(tx.fee())
                .ok_or_else(|| LedgerError::Internal("block fee total overflow".into()))?;
        }

        let fee_shares = distribute_fee(&weights, fee_total);
        for (address, share) in &fee_shares {
            self.credit_balance(address, *share)?;
        }

        let distributed = distributed_total(&fee_shares);
        let author_reward = self
            .params()
            .block_reward
            .checked_add(fee_total - distributed)
            .ok_or_else(|| LedgerError::Internal("author reward overflow".into()))?;
        self.credit_balance(&block.author, author_reward)?;

        // Persist the staking image alongside the block's state.
        let staking_bytes = self.staking().save_state();
        self.store_mut()
            .put_meta(StakingLedger::meta_key(), &staking_bytes)?;

        Ok(BlockOutcome {
            fee_total,
            fee_shares,
            author_reward,
        })
    }

    fn credit_balance(&mut self, address: &Address, quantity: u64) -> Result<(), LedgerError> {
        let mut account = self.store().get_account(address)?;
        account.balance = account
            .balance
            .checked_add(quantity)
            .ok_or_else(|| LedgerError::Internal("balance overflow on credit".into()))?;
        self.store_mut().put_account(&account)?;
        Ok(())
    }
}
