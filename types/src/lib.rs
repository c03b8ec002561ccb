//! Fundamental types for the EMBER settlement core.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: addresses, asset identifiers, hashes, timestamps, network ids,
//! and protocol parameters.

pub mod address;
pub mod asset;
pub mod block;
pub mod hash;
pub mod keys;
pub mod network;
pub mod params;
pub mod time;

pub use address::Address;
pub use asset::{AssetType, LockScriptHash, ShardId};
pub use block::BlockHash;
pub use hash::TxHash;
pub use keys::{PublicKey, Signature};
pub use network::NetworkId;
pub use params::ProtocolParams;
pub use time::Timestamp;
