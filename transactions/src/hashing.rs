//! Blake2b hashing for transaction identities.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ember_types::TxHash;
use serde::Serialize;

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash a serializable payload to produce its `TxHash`.
///
/// The payload is bincode-encoded first; in-memory payload structs encode
/// infallibly, so a serialization failure collapses to hashing the empty
/// string rather than panicking.
pub fn hash_payload<T: Serialize>(payload: &T) -> TxHash {
    let bytes = bincode::serialize(payload).unwrap_or_default();
    TxHash::new(blake2b_256(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_deterministic() {
        let h1 = blake2b_256(b"hello ember");
        let h2 = blake2b_256(b"hello ember");
        assert_eq!(h1, h2);
    }

    #[test]
    fn blake2b_different_inputs() {
        let h1 = blake2b_256(b"hello");
        let h2 = blake2b_256(b"world");
        assert_ne!(h1, h2);
    }

    #[test]
    fn payload_hash_depends_on_contents() {
        let h1 = hash_payload(&("payment", 1u64, 500u64));
        let h2 = hash_payload(&("payment", 1u64, 501u64));
        assert_ne!(h1, h2);
    }
}
