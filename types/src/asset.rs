//! Asset identifiers and lock scripts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shard an asset output lives in.
pub type ShardId = u16;

/// A 160-bit asset type identifier.
///
/// Derived from the hash of the minting transaction, so two distinct mints
/// can never collide. The distinguished [`AssetType::BASE`] denotes the
/// base currency and is never mintable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetType([u8; 20]);

impl AssetType {
    /// The base currency pseudo-type (all zero bytes).
    pub const BASE: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive an asset type from a 32-byte transaction hash (first 20 bytes).
    pub fn from_tx_hash(hash: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[..20]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_base(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetType(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Hash of the lock script guarding an asset output.
///
/// Spending an output means supplying unlock parameters that satisfy this
/// lock; the cryptographic check itself lives in the external script layer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LockScriptHash([u8; 20]);

impl LockScriptHash {
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Debug for LockScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LockScriptHash(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for LockScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_asset_type_is_all_zero() {
        assert!(AssetType::BASE.is_base());
        assert!(!AssetType::new([1u8; 20]).is_base());
    }

    #[test]
    fn asset_type_from_tx_hash_takes_prefix() {
        let mut hash = [0u8; 32];
        for (i, b) in hash.iter_mut().enumerate() {
            *b = i as u8;
        }
        let asset_type = AssetType::from_tx_hash(&hash);
        assert_eq!(&asset_type.as_bytes()[..], &hash[..20]);
    }
}
