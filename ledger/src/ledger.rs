//! The ledger handle and per-transaction application.

use std::collections::BTreeSet;

use ember_orders::verify_transfer;
use ember_staking::StakingLedger;
use ember_store::{AccountInfo, AccountStore, AssetUtxo, MetaStore, Store, StoreError, UtxoStore};
use ember_transactions::{
    validation, AssetOutPoint, MintAssetTx, PaymentTx, SetRegularKeyTx, StakeAction, StakeTx,
    Transaction, TransferAssetTx,
};
use ember_types::{Address, NetworkId, ProtocolParams, Timestamp};
use tracing::debug;

use crate::error::LedgerError;
use crate::invoice::{ErrorKind, Invoice};

/// The single mutable handle over confirmed chain state.
///
/// All mutation is serialized through `&mut self`; reads against the
/// committed state go through the accessor methods. There is no ambient
/// global; every caller owns or borrows its ledger explicitly.
pub struct Ledger<S: Store> {
    store: S,
    staking: StakingLedger,
    network: NetworkId,
    params: ProtocolParams,
    /// Active validator set, fed by the external consensus layer.
    validators: BTreeSet<Address>,
}

impl<S: Store> Ledger<S> {
    pub fn new(store: S, network: NetworkId, params: ProtocolParams) -> Self {
        Self {
            store,
            staking: StakingLedger::new(),
            network,
            params,
            validators: BTreeSet::new(),
        }
    }

    /// Reopen a ledger over an existing store image, restoring the
    /// staking ledger from its persisted snapshot.
    pub fn open(store: S, network: NetworkId, params: ProtocolParams) -> Result<Self, LedgerError> {
        let staking = match store.get_meta(StakingLedger::meta_key()) {
            Ok(bytes) => StakingLedger::load_state(&bytes),
            Err(StoreError::NotFound(_)) => StakingLedger::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            store,
            staking,
            network,
            params,
            validators: BTreeSet::new(),
        })
    }

    /// Tear down the handle and hand the store image back.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Replace the active validator set (delegation targets).
    pub fn set_validators(&mut self, validators: impl IntoIterator<Item = Address>) {
        self.validators = validators.into_iter().collect();
    }

    pub fn validators(&self) -> &BTreeSet<Address> {
        &self.validators
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn staking(&self) -> &StakingLedger {
        &self.staking
    }

    pub(crate) fn staking_mut(&mut self) -> &mut StakingLedger {
        &mut self.staking
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    /// Base currency balance of an address.
    pub fn balance(&self, address: &Address) -> Result<u64, LedgerError> {
        Ok(self.store.get_account(address)?.balance)
    }

    /// Current seq of an address.
    pub fn seq(&self, address: &Address) -> Result<u64, LedgerError> {
        Ok(self.store.get_account(address)?.seq)
    }

    /// Read-only validation for the mempool path.
    ///
    /// Produces a structured invoice; the ledger is untouched either way.
    pub fn validate_transaction(&self, tx: &Transaction, now: Timestamp) -> Invoice {
        match self.check_transaction(tx, now) {
            Ok(()) => Invoice::Success,
            Err(error) => {
                debug!(tx = %tx.hash(), %error, "transaction rejected");
                Invoice::Failed(ErrorKind::from(&error))
            }
        }
    }

    /// Validate and commit a single transaction.
    ///
    /// On `Ok` every sub-ledger mutation (accounts, UTXOs, staking) is
    /// committed as a unit; on `Err` nothing is retained.
    pub fn apply_transaction(
        &mut self,
        tx: &Transaction,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.check_transaction(tx, now)?;

        // Commit point. Past here only storage corruption can fail, which
        // aborts block application rather than producing an invoice.
        self.commit_envelope(tx)?;
        match tx {
            Transaction::Payment(payment_tx) => self.commit_payment(payment_tx)?,
            Transaction::MintAsset(mint_tx) => self.commit_mint(mint_tx)?,
            Transaction::TransferAsset(transfer_tx) => self.commit_transfer(transfer_tx)?,
            Transaction::SetRegularKey(key_tx) => self.commit_regular_key(key_tx)?,
            Transaction::Stake(stake_tx) => self.commit_stake(stake_tx)?,
        }
        Ok(())
    }

    /// Every check, no mutation. Shared by the mempool path and the
    /// commit path so both reject for identical reasons.
    fn check_transaction(&self, tx: &Transaction, now: Timestamp) -> Result<(), LedgerError> {
        validation::validate_transaction(tx)?;
        let account = self.check_envelope(tx)?;

        match tx {
            Transaction::Payment(payment_tx) => {
                let needed = payment_tx
                    .fee
                    .checked_add(payment_tx.quantity)
                    .ok_or(LedgerError::NotEnoughBalance {
                        needed: u64::MAX,
                        available: account.balance,
                    })?;
                if account.balance < needed {
                    return Err(LedgerError::NotEnoughBalance {
                        needed,
                        available: account.balance,
                    });
                }
            }
            Transaction::MintAsset(_) | Transaction::SetRegularKey(_) => {}
            Transaction::TransferAsset(transfer_tx) => {
                let resolved = self.resolve_inputs(transfer_tx)?;
                verify_transfer(transfer_tx, &resolved, now, &self.params)?;
            }
            Transaction::Stake(stake_tx) => {
                // Dry-run against a copy; the staking ledger itself is
                // check-then-mutate, so the copy rejects exactly when the
                // real application would.
                let mut staking = self.staking.clone();
                run_stake_action(
                    &mut staking,
                    &self.validators,
                    &self.params,
                    &stake_tx.signer,
                    &stake_tx.action,
                )?;
            }
        }
        Ok(())
    }

    /// Preconditions common to every transaction kind: network id,
    /// minimum fee, seq match, and fee-payer balance.
    fn check_envelope(&self, tx: &Transaction) -> Result<AccountInfo, LedgerError> {
        if tx.network_id() != self.network {
            return Err(LedgerError::InvalidNetworkId {
                expected: self.network,
                actual: tx.network_id(),
            });
        }
        if tx.fee() < self.params.min_transaction_fee {
            return Err(LedgerError::TooLowFee {
                fee: tx.fee(),
                minimum: self.params.min_transaction_fee,
            });
        }
        let account = self.store.get_account(tx.signer())?;
        if tx.seq() != account.seq {
            return Err(LedgerError::InvalidSeq {
                expected: account.seq,
                actual: tx.seq(),
            });
        }
        if account.balance < tx.fee() {
            return Err(LedgerError::NotEnoughBalance {
                needed: tx.fee(),
                available: account.balance,
            });
        }
        Ok(account)
    }

    /// Deduct the fee and bump the signer's seq.
    fn commit_envelope(&mut self, tx: &Transaction) -> Result<(), LedgerError> {
        let mut account = self.store.get_account(tx.signer())?;
        account.balance -= tx.fee();
        account.seq += 1;
        self.store.put_account(&account)?;
        Ok(())
    }

    fn commit_payment(&mut self, tx: &PaymentTx) -> Result<(), LedgerError> {
        let mut sender = self.store.get_account(&tx.signer)?;
        sender.balance = sender
            .balance
            .checked_sub(tx.quantity)
            .ok_or_else(|| LedgerError::Internal("payment balance checked then missing".into()))?;
        self.store.put_account(&sender)?;

        let mut receiver = self.store.get_account(&tx.receiver)?;
        receiver.balance = receiver
            .balance
            .checked_add(tx.quantity)
            .ok_or_else(|| LedgerError::Internal("receiver balance overflow".into()))?;
        self.store.put_account(&receiver)?;
        Ok(())
    }

    fn commit_mint(&mut self, tx: &MintAssetTx) -> Result<(), LedgerError> {
        let utxo = AssetUtxo {
            out: AssetOutPoint {
                tx_hash: tx.hash,
                index: 0,
                asset_type: tx.asset_type(),
                quantity: tx.output.supply,
            },
            lock_script_hash: tx.output.lock_script_hash,
            parameters: tx.output.parameters.clone(),
            shard_id: tx.shard_id,
        };
        self.store.put_utxo(&utxo)?;
        Ok(())
    }

    fn commit_transfer(&mut self, tx: &TransferAssetTx) -> Result<(), LedgerError> {
        for input in &tx.inputs {
            self.store
                .delete_utxo(&input.prev_out.tx_hash, input.prev_out.index)
                .map_err(|e| {
                    LedgerError::Internal(format!("resolved input vanished during commit: {e}"))
                })?;
        }
        for (index, output) in tx.outputs.iter().enumerate() {
            let utxo = AssetUtxo {
                out: AssetOutPoint {
                    tx_hash: tx.hash,
                    index,
                    asset_type: output.asset_type,
                    quantity: output.quantity,
                },
                lock_script_hash: output.lock_script_hash,
                parameters: output.parameters.clone(),
                shard_id: output.shard_id,
            };
            self.store.put_utxo(&utxo)?;
        }
        Ok(())
    }

    fn commit_regular_key(&mut self, tx: &SetRegularKeyTx) -> Result<(), LedgerError> {
        let mut account = self.store.get_account(&tx.signer)?;
        account.regular_key = Some(tx.key);
        self.store.put_account(&account)?;
        Ok(())
    }

    fn commit_stake(&mut self, tx: &StakeTx) -> Result<(), LedgerError> {
        // Re-running after the dry-run; a failure here means the two
        // drifted apart, which is a logic bug, not a user error.
        let validators = self.validators.clone();
        run_stake_action(
            &mut self.staking,
            &validators,
            &self.params,
            &tx.signer,
            &tx.action,
        )
        .map_err(|e| LedgerError::Internal(format!("stake action failed after dry-run: {e}")))
    }

    /// Resolve each input against its recorded UTXO, in input order.
    fn resolve_inputs(&self, tx: &TransferAssetTx) -> Result<Vec<AssetUtxo>, LedgerError> {
        tx.inputs
            .iter()
            .map(|input| {
                self.store
                    .get_utxo(&input.prev_out.tx_hash, input.prev_out.index)?
                    .ok_or(LedgerError::AssetNotFound {
                        tx_hash: input.prev_out.tx_hash,
                        index: input.prev_out.index,
                    })
            })
            .collect()
    }
}

/// Apply one stake action against a staking ledger.
///
/// Used twice per transaction: against a copy during validation and
/// against the real ledger at commit.
fn run_stake_action(
    staking: &mut StakingLedger,
    validators: &BTreeSet<Address>,
    params: &ProtocolParams,
    signer: &Address,
    action: &StakeAction,
) -> Result<(), LedgerError> {
    match action {
        StakeAction::TransferStake { receiver, quantity } => {
            staking.transfer_stake(signer, receiver, *quantity)?;
        }
        StakeAction::Delegate {
            delegatee,
            quantity,
        } => {
            if !params.enable_delegations {
                return Err(LedgerError::DelegationsDisabled);
            }
            staking.delegate(signer, delegatee, *quantity, validators)?;
        }
        StakeAction::Revoke {
            delegatee,
            quantity,
        } => {
            staking.revoke(signer, delegatee, *quantity)?;
        }
    }
    Ok(())
}
