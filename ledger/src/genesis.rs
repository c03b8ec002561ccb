//! Genesis state seeding.

use ember_store::{AccountStore, MetaStore, Store};
use ember_types::{Address, NetworkId, ProtocolParams};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// The database schema version written at genesis.
pub const SCHEMA_VERSION: u32 = 1;

/// Initial chain state: base-currency balances, the initial stake
/// distribution, and the bootstrap validator set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenesisConfig {
    pub accounts: Vec<(Address, u64)>,
    pub stakes: Vec<(Address, u64)>,
    pub validators: Vec<Address>,
}

impl<S: Store> Ledger<S> {
    /// Build a ledger with genesis state already committed.
    pub fn from_genesis(
        store: S,
        network: NetworkId,
        params: ProtocolParams,
        genesis: &GenesisConfig,
    ) -> Result<Self, LedgerError> {
        let mut ledger = Ledger::new(store, network, params);

        for (address, balance) in &genesis.accounts {
            let mut account = ledger.store().get_account(address)?;
            account.balance = *balance;
            ledger.store().put_account(&account)?;
        }
        for (address, quantity) in &genesis.stakes {
            ledger.staking_mut().credit(*address, *quantity);
        }
        ledger.set_validators(genesis.validators.iter().copied());

        let staking_bytes = ledger.staking().save_state();
        ledger
            .store()
            .put_meta(ember_staking::StakingLedger::meta_key(), &staking_bytes)?;
        ledger.store().set_schema_version(SCHEMA_VERSION)?;

        Ok(ledger)
    }
}
