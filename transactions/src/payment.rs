//! Base-currency payment transaction.

use ember_types::{Address, NetworkId, Signature, TxHash};
use serde::{Deserialize, Serialize};

/// Transfer base currency from the signer to a receiver.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentTx {
    pub hash: TxHash,
    pub signer: Address,
    pub receiver: Address,
    /// Base currency units moved to the receiver (fee not included).
    pub quantity: u64,
    pub seq: u64,
    pub fee: u64,
    pub network_id: NetworkId,
    pub signature: Signature,
}
