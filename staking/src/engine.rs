//! The staking ledger engine.

use std::collections::{BTreeMap, BTreeSet};

use ember_types::Address;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StakingError;

// Meta-store key used for persisting the staking ledger state.
const STAKING_LEDGER_META_KEY: &str = "staking_ledger_state";

/// Serializable image of the staking ledger.
///
/// Every collection is ordered, so the bincode encoding of a given state
/// is byte-identical on every node.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StakingSnapshot {
    balances: BTreeMap<Address, u64>,
    delegations: BTreeMap<Address, BTreeMap<Address, u64>>,
    stakeholders: BTreeSet<Address>,
}

/// Tracks stake balances, delegations, and the stakeholder set.
///
/// Entries exist only while positive: an operation that would leave a
/// balance or delegation at zero removes the entry instead. Stakeholder
/// membership is the one exception: once an address has held stake it
/// stays in the set, with a weight of zero once drained.
#[derive(Clone, Debug, Default)]
pub struct StakingLedger {
    /// Directly-held stake per address.
    balances: BTreeMap<Address, u64>,
    /// delegator → (delegatee → quantity).
    delegations: BTreeMap<Address, BTreeMap<Address, u64>>,
    /// Every address that ever held stake or a delegation.
    stakeholders: BTreeSet<Address>,
    /// Total delegated *to* each address. Rebuilt on load, maintained
    /// incrementally so effective weights are O(log n).
    incoming: BTreeMap<Address, u64>,
}

impl StakingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit freshly issued stake (genesis or hard-coded allocations).
    pub fn credit(&mut self, address: Address, quantity: u64) {
        if quantity == 0 {
            return;
        }
        *self.balances.entry(address).or_insert(0) += quantity;
        self.stakeholders.insert(address);
    }

    /// Directly-held stake of an address (undelegated portion).
    pub fn balance(&self, address: &Address) -> u64 {
        self.balances.get(address).copied().unwrap_or(0)
    }

    /// Quantity currently delegated from `delegator` to `delegatee`.
    pub fn delegation(&self, delegator: &Address, delegatee: &Address) -> u64 {
        self.delegations
            .get(delegator)
            .and_then(|m| m.get(delegatee))
            .copied()
            .unwrap_or(0)
    }

    /// All delegations made by an address.
    pub fn delegations_of(&self, delegator: &Address) -> Vec<(Address, u64)> {
        self.delegations
            .get(delegator)
            .map(|m| m.iter().map(|(d, q)| (*d, *q)).collect())
            .unwrap_or_default()
    }

    /// Total quantity an address has delegated away.
    pub fn delegated_total(&self, delegator: &Address) -> u64 {
        self.delegations
            .get(delegator)
            .map(|m| m.values().sum())
            .unwrap_or(0)
    }

    /// Whether an address has ever held stake or a delegation.
    pub fn is_stakeholder(&self, address: &Address) -> bool {
        self.stakeholders.contains(address)
    }

    /// The full stakeholder set, in address order.
    pub fn stakeholders(&self) -> Vec<Address> {
        self.stakeholders.iter().copied().collect()
    }

    /// Effective stake weight: directly-held stake plus all stake
    /// delegated to this address. Delegating away moves weight to the
    /// delegatee.
    pub fn effective_weight(&self, address: &Address) -> u64 {
        self.balance(address) + self.incoming.get(address).copied().unwrap_or(0)
    }

    /// Deterministic map of nonzero effective weights across the
    /// stakeholder set. Taken at block start and handed to
    /// [`crate::distribute_fee`].
    pub fn weight_snapshot(&self) -> BTreeMap<Address, u64> {
        self.stakeholders
            .iter()
            .filter_map(|address| {
                let weight = self.effective_weight(address);
                (weight > 0).then_some((*address, weight))
            })
            .collect()
    }

    /// Total stake across all balances and delegations. Constant under
    /// every operation except [`StakingLedger::credit`].
    pub fn total_stake(&self) -> u64 {
        let held: u64 = self.balances.values().sum();
        let delegated: u64 = self
            .delegations
            .values()
            .flat_map(|m| m.values())
            .sum();
        held + delegated
    }

    /// Move directly-held stake from `sender` to `receiver`.
    pub fn transfer_stake(
        &mut self,
        sender: &Address,
        receiver: &Address,
        quantity: u64,
    ) -> Result<(), StakingError> {
        if quantity == 0 {
            return Err(StakingError::ZeroQuantity);
        }
        let available = self.balance(sender);
        if available < quantity {
            return Err(StakingError::NotEnoughBalance {
                needed: quantity,
                available,
            });
        }

        self.debit_balance(sender, quantity);
        *self.balances.entry(*receiver).or_insert(0) += quantity;
        self.stakeholders.insert(*receiver);
        debug!(%sender, %receiver, quantity, "stake transferred");
        Ok(())
    }

    /// Move directly-held stake into a delegation to a validator.
    ///
    /// The delegations-enabled switch is enforced by the caller; this
    /// ledger only checks the target against the supplied validator set.
    pub fn delegate(
        &mut self,
        delegator: &Address,
        delegatee: &Address,
        quantity: u64,
        validators: &BTreeSet<Address>,
    ) -> Result<(), StakingError> {
        if quantity == 0 {
            return Err(StakingError::ZeroQuantity);
        }
        if delegator == delegatee {
            return Err(StakingError::SelfDelegation);
        }
        if !validators.contains(delegatee) {
            return Err(StakingError::InvalidDelegatee(delegatee.to_string()));
        }
        let available = self.balance(delegator);
        if available < quantity {
            return Err(StakingError::NotEnoughBalance {
                needed: quantity,
                available,
            });
        }

        self.debit_balance(delegator, quantity);
        *self
            .delegations
            .entry(*delegator)
            .or_default()
            .entry(*delegatee)
            .or_insert(0) += quantity;
        *self.incoming.entry(*delegatee).or_insert(0) += quantity;
        self.stakeholders.insert(*delegator);
        self.stakeholders.insert(*delegatee);
        debug!(%delegator, %delegatee, quantity, "stake delegated");
        Ok(())
    }

    /// Move delegated stake back to the delegator's direct balance.
    ///
    /// Revoking more than is currently delegated fails and changes
    /// nothing; revoking the full amount removes the entry.
    pub fn revoke(
        &mut self,
        delegator: &Address,
        delegatee: &Address,
        quantity: u64,
    ) -> Result<(), StakingError> {
        if quantity == 0 {
            return Err(StakingError::ZeroQuantity);
        }
        let delegated = self.delegation(delegator, delegatee);
        if delegated < quantity {
            return Err(StakingError::NotEnoughDelegation {
                needed: quantity,
                available: delegated,
            });
        }

        let remaining = delegated - quantity;
        if let Some(entries) = self.delegations.get_mut(delegator) {
            if remaining == 0 {
                entries.remove(delegatee);
                if entries.is_empty() {
                    self.delegations.remove(delegator);
                }
            } else {
                entries.insert(*delegatee, remaining);
            }
        }
        self.debit_incoming(delegatee, quantity);
        *self.balances.entry(*delegator).or_insert(0) += quantity;
        debug!(%delegator, %delegatee, quantity, "delegation revoked");
        Ok(())
    }

    /// Subtract from a direct balance, removing the entry at zero.
    fn debit_balance(&mut self, address: &Address, quantity: u64) {
        if let Some(balance) = self.balances.get_mut(address) {
            *balance = balance.saturating_sub(quantity);
            if *balance == 0 {
                self.balances.remove(address);
            }
        }
    }

    /// Subtract from an incoming-delegation total, removing the entry at zero.
    fn debit_incoming(&mut self, address: &Address, quantity: u64) {
        if let Some(total) = self.incoming.get_mut(address) {
            *total = total.saturating_sub(quantity);
            if *total == 0 {
                self.incoming.remove(address);
            }
        }
    }
}

impl StakingLedger {
    /// Serialize the staking state to bytes for meta-store persistence.
    pub fn save_state(&self) -> Vec<u8> {
        let snapshot = StakingSnapshot {
            balances: self.balances.clone(),
            delegations: self.delegations.clone(),
            stakeholders: self.stakeholders.clone(),
        };
        bincode::serialize(&snapshot).unwrap_or_default()
    }

    /// Restore the staking state from serialized bytes.
    ///
    /// The incoming-delegation index is rebuilt rather than persisted.
    pub fn load_state(data: &[u8]) -> Self {
        match bincode::deserialize::<StakingSnapshot>(data) {
            Ok(snapshot) => {
                let mut incoming = BTreeMap::<Address, u64>::new();
                for entries in snapshot.delegations.values() {
                    for (delegatee, quantity) in entries {
                        *incoming.entry(*delegatee).or_insert(0) += quantity;
                    }
                }
                Self {
                    balances: snapshot.balances,
                    delegations: snapshot.delegations,
                    stakeholders: snapshot.stakeholders,
                    incoming,
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// The meta-store key used for staking ledger persistence.
    pub fn meta_key() -> &'static str {
        STAKING_LEDGER_META_KEY
    }
}
