//! Regular-key registration.

use ember_types::{Address, NetworkId, PublicKey, Signature, TxHash};
use serde::{Deserialize, Serialize};

/// Bind a secondary signing key to the signer's account.
///
/// Later transactions from this account may be signed with the regular
/// key instead of the master key. Re-registration replaces the binding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetRegularKeyTx {
    pub hash: TxHash,
    pub signer: Address,
    pub key: PublicKey,
    pub seq: u64,
    pub fee: u64,
    pub network_id: NetworkId,
    pub signature: Signature,
}
