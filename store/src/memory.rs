//! Deterministic in-memory storage backend.
//!
//! A single ordered map keyed by a one-byte entity-kind prefix followed
//! by the entity's natural key, with bincode-encoded values. Ordered
//! iteration and a fixed encoding make the full state image byte-stable
//! across nodes, which block settlement relies on for its
//! checkpoint/rollback cycle.

use std::collections::BTreeMap;
use std::sync::RwLock;

use ember_types::{Address, TxHash};

use crate::account::{AccountInfo, AccountStore};
use crate::meta::MetaStore;
use crate::utxo::{AssetUtxo, UtxoStore};
use crate::{Store, StoreError};

const KIND_ACCOUNT: u8 = b'a';
const KIND_UTXO: u8 = b'u';
const KIND_META: u8 = b'm';

const SCHEMA_VERSION_KEY: &str = "schema_version";

/// Full-state image captured from a [`MemoryStore`].
#[derive(Clone)]
pub struct Checkpoint {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

/// In-memory key-value backend implementing every store trait.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&BTreeMap<Vec<u8>, Vec<u8>>) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut BTreeMap<Vec<u8>, Vec<u8>>) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Corruption(e.to_string()))
    }

    fn account_key(address: &Address) -> Vec<u8> {
        let mut key = Vec::with_capacity(21);
        key.push(KIND_ACCOUNT);
        key.extend_from_slice(address.as_bytes());
        key
    }

    fn utxo_key(tx_hash: &TxHash, index: usize) -> Vec<u8> {
        let mut key = Vec::with_capacity(41);
        key.push(KIND_UTXO);
        key.extend_from_slice(tx_hash.as_bytes());
        key.extend_from_slice(&(index as u64).to_be_bytes());
        key
    }

    fn meta_key(name: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(1 + name.len());
        key.push(KIND_META);
        key.extend_from_slice(name.as_bytes());
        key
    }

    fn count_prefix(&self, kind: u8) -> u64 {
        self.read(|map| {
            map.range(vec![kind]..)
                .take_while(|(k, _)| k.first() == Some(&kind))
                .count() as u64
        })
    }
}

impl AccountStore for MemoryStore {
    fn get_account(&self, address: &Address) -> Result<AccountInfo, StoreError> {
        let key = Self::account_key(address);
        match self.read(|map| map.get(&key).cloned()) {
            Some(bytes) => Self::decode(&bytes),
            None => Ok(AccountInfo::new(*address)),
        }
    }

    fn put_account(&self, info: &AccountInfo) -> Result<(), StoreError> {
        let bytes = Self::encode(info)?;
        self.write(|map| {
            map.insert(Self::account_key(&info.address), bytes);
        });
        Ok(())
    }

    fn account_exists(&self, address: &Address) -> Result<bool, StoreError> {
        let key = Self::account_key(address);
        Ok(self.read(|map| map.contains_key(&key)))
    }

    fn account_count(&self) -> Result<u64, StoreError> {
        Ok(self.count_prefix(KIND_ACCOUNT))
    }

    fn iter_accounts(&self) -> Result<Vec<AccountInfo>, StoreError> {
        self.read(|map| {
            map.range(vec![KIND_ACCOUNT]..)
                .take_while(|(k, _)| k.first() == Some(&KIND_ACCOUNT))
                .map(|(_, v)| Self::decode(v))
                .collect()
        })
    }
}

impl UtxoStore for MemoryStore {
    fn get_utxo(&self, tx_hash: &TxHash, index: usize) -> Result<Option<AssetUtxo>, StoreError> {
        let key = Self::utxo_key(tx_hash, index);
        match self.read(|map| map.get(&key).cloned()) {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_utxo(&self, utxo: &AssetUtxo) -> Result<(), StoreError> {
        let bytes = Self::encode(utxo)?;
        self.write(|map| {
            map.insert(Self::utxo_key(&utxo.out.tx_hash, utxo.out.index), bytes);
        });
        Ok(())
    }

    fn delete_utxo(&self, tx_hash: &TxHash, index: usize) -> Result<(), StoreError> {
        let key = Self::utxo_key(tx_hash, index);
        let removed = self.write(|map| map.remove(&key));
        match removed {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(format!("utxo {}:{}", tx_hash, index))),
        }
    }

    fn contains_utxo(&self, tx_hash: &TxHash, index: usize) -> Result<bool, StoreError> {
        let key = Self::utxo_key(tx_hash, index);
        Ok(self.read(|map| map.contains_key(&key)))
    }

    fn utxo_count(&self) -> Result<u64, StoreError> {
        Ok(self.count_prefix(KIND_UTXO))
    }

    fn iter_utxos(&self) -> Result<Vec<AssetUtxo>, StoreError> {
        self.read(|map| {
            map.range(vec![KIND_UTXO]..)
                .take_while(|(k, _)| k.first() == Some(&KIND_UTXO))
                .map(|(_, v)| Self::decode(v))
                .collect()
        })
    }
}

impl MetaStore for MemoryStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.write(|map| {
            map.insert(Self::meta_key(key), value.to_vec());
        });
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.read(|map| map.get(&Self::meta_key(key)).cloned())
            .ok_or_else(|| StoreError::NotFound(format!("meta key {}", key)))
    }

    fn delete_meta(&self, key: &str) -> Result<(), StoreError> {
        self.write(|map| map.remove(&Self::meta_key(key)));
        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        let bytes = self.get_meta(SCHEMA_VERSION_KEY)?;
        let arr: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| StoreError::Corruption("schema version is not 4 bytes".into()))?;
        Ok(u32::from_be_bytes(arr))
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.put_meta(SCHEMA_VERSION_KEY, &version.to_be_bytes())
    }
}

impl Store for MemoryStore {
    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            entries: self.read(|map| map.clone()),
        }
    }

    fn rollback(&self, checkpoint: Checkpoint) {
        self.write(|map| *map = checkpoint.entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_transactions::AssetOutPoint;
    use ember_types::{AssetType, LockScriptHash};

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn utxo(src: u8, index: usize, quantity: u64) -> AssetUtxo {
        AssetUtxo {
            out: AssetOutPoint {
                tx_hash: TxHash::new([src; 32]),
                index,
                asset_type: AssetType::new([1u8; 20]),
                quantity,
            },
            lock_script_hash: LockScriptHash::new([5u8; 20]),
            parameters: vec![],
            shard_id: 0,
        }
    }

    #[test]
    fn unknown_account_is_fresh_record() {
        let store = MemoryStore::new();
        let info = store.get_account(&addr(1)).unwrap();
        assert_eq!(info.balance, 0);
        assert_eq!(info.seq, 0);
        assert!(info.regular_key.is_none());
        assert!(!store.account_exists(&addr(1)).unwrap());
    }

    #[test]
    fn account_round_trip() {
        let store = MemoryStore::new();
        let mut info = AccountInfo::new(addr(1));
        info.balance = 500;
        info.seq = 3;
        store.put_account(&info).unwrap();

        let loaded = store.get_account(&addr(1)).unwrap();
        assert_eq!(loaded.balance, 500);
        assert_eq!(loaded.seq, 3);
        assert_eq!(store.account_count().unwrap(), 1);
    }

    #[test]
    fn utxo_spend_removes_entry_permanently() {
        let store = MemoryStore::new();
        let u = utxo(1, 0, 100);
        store.put_utxo(&u).unwrap();
        assert!(store.contains_utxo(&u.out.tx_hash, 0).unwrap());

        store.delete_utxo(&u.out.tx_hash, 0).unwrap();
        assert!(!store.contains_utxo(&u.out.tx_hash, 0).unwrap());
        assert!(store.get_utxo(&u.out.tx_hash, 0).unwrap().is_none());

        // A second delete is a logic bug upstream, not a silent no-op.
        assert!(matches!(
            store.delete_utxo(&u.out.tx_hash, 0),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn utxo_count_and_iteration_are_prefix_scoped() {
        let store = MemoryStore::new();
        store.put_utxo(&utxo(1, 0, 10)).unwrap();
        store.put_utxo(&utxo(1, 1, 20)).unwrap();
        store.put_utxo(&utxo(2, 0, 30)).unwrap();
        store.put_account(&AccountInfo::new(addr(1))).unwrap();

        assert_eq!(store.utxo_count().unwrap(), 3);
        assert_eq!(store.iter_utxos().unwrap().len(), 3);
        assert_eq!(store.account_count().unwrap(), 1);
    }

    #[test]
    fn checkpoint_rollback_restores_exact_image() {
        let store = MemoryStore::new();
        store.put_utxo(&utxo(1, 0, 10)).unwrap();
        let checkpoint = store.checkpoint();

        store.delete_utxo(&TxHash::new([1u8; 32]), 0).unwrap();
        store.put_utxo(&utxo(2, 0, 99)).unwrap();
        let mut info = AccountInfo::new(addr(1));
        info.balance = 1;
        store.put_account(&info).unwrap();

        store.rollback(checkpoint);
        assert!(store.contains_utxo(&TxHash::new([1u8; 32]), 0).unwrap());
        assert!(!store.contains_utxo(&TxHash::new([2u8; 32]), 0).unwrap());
        assert_eq!(store.account_count().unwrap(), 0);
    }

    #[test]
    fn schema_version_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get_schema_version().is_err());
        store.set_schema_version(2).unwrap();
        assert_eq!(store.get_schema_version().unwrap(), 2);
    }
}
