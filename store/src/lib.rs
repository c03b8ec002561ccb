//! Abstract storage traits for the EMBER settlement core.
//!
//! Every storage backend implements these traits; the rest of the
//! workspace depends only on the traits. The bundled [`MemoryStore`]
//! backend keeps the whole image in an ordered map with a deterministic
//! byte encoding, which is what block settlement snapshots and restores.

pub mod account;
pub mod error;
pub mod memory;
pub mod meta;
pub mod utxo;

pub use account::{AccountInfo, AccountStore};
pub use error::StoreError;
pub use memory::{Checkpoint, MemoryStore};
pub use meta::MetaStore;
pub use utxo::{AssetUtxo, UtxoStore};

/// A complete storage backend: every entity store plus whole-image
/// checkpointing for block-level rollback.
pub trait Store: UtxoStore + AccountStore + MetaStore {
    /// Capture the full state image.
    fn checkpoint(&self) -> Checkpoint;

    /// Discard current state and restore a previously captured image.
    fn rollback(&self, checkpoint: Checkpoint);
}
