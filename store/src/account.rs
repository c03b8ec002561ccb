//! Account storage trait.

use crate::StoreError;
use ember_types::{Address, PublicKey};
use serde::{Deserialize, Serialize};

/// Per-account information stored in the ledger.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountInfo {
    pub address: Address,
    /// Base currency balance.
    pub balance: u64,
    /// Next expected transaction sequence number.
    pub seq: u64,
    /// Registered regular key, if any.
    pub regular_key: Option<PublicKey>,
}

impl AccountInfo {
    /// A fresh account record: zero balance, seq 0, no regular key.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balance: 0,
            seq: 0,
            regular_key: None,
        }
    }
}

/// Trait for account storage operations.
pub trait AccountStore {
    /// Get the record for an address. Unknown addresses yield a fresh
    /// zero-balance record rather than an error: every address exists
    /// implicitly with balance 0 and seq 0.
    fn get_account(&self, address: &Address) -> Result<AccountInfo, StoreError>;

    fn put_account(&self, info: &AccountInfo) -> Result<(), StoreError>;

    /// Whether an explicit record exists for this address.
    fn account_exists(&self, address: &Address) -> Result<bool, StoreError>;

    fn account_count(&self) -> Result<u64, StoreError>;

    fn iter_accounts(&self) -> Result<Vec<AccountInfo>, StoreError>;
}
