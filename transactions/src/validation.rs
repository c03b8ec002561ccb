//! Stateless transaction validation.
//!
//! Everything decidable from the transaction alone: positive quantities,
//! non-empty inputs, duplicate-input detection, order index bounds.
//! Stateful checks (balances, UTXO existence, seq, order semantics) are
//! done by the ledger.

use std::collections::HashSet;

use crate::error::TransactionError;
use crate::stake::StakeAction;
use crate::transfer::TransferAssetTx;
use crate::Transaction;

/// Validate a transaction's basic structure.
pub fn validate_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    match tx {
        Transaction::Payment(payment_tx) => {
            if payment_tx.quantity == 0 {
                return Err(TransactionError::ZeroQuantity);
            }
            if payment_tx.receiver == payment_tx.signer {
                return Err(TransactionError::Other(
                    "payment sender and receiver must be different".into(),
                ));
            }
        }
        Transaction::MintAsset(mint_tx) => {
            if mint_tx.output.supply == 0 {
                return Err(TransactionError::ZeroQuantity);
            }
        }
        Transaction::TransferAsset(transfer_tx) => {
            validate_transfer(transfer_tx)?;
        }
        Transaction::SetRegularKey(_) => {}
        Transaction::Stake(stake_tx) => {
            if stake_tx.action.quantity() == 0 {
                return Err(TransactionError::ZeroQuantity);
            }
            if let StakeAction::TransferStake { receiver, .. } = &stake_tx.action {
                if receiver == &stake_tx.signer {
                    return Err(TransactionError::Other(
                        "stake transfer sender and receiver must be different".into(),
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Validate a transfer transaction's structure.
pub fn validate_transfer(tx: &TransferAssetTx) -> Result<(), TransactionError> {
    if tx.inputs.is_empty() {
        return Err(TransactionError::EmptyInputs);
    }

    for output in &tx.outputs {
        if output.quantity == 0 {
            return Err(TransactionError::ZeroQuantity);
        }
    }

    // No output may be referenced twice, even within a single transaction.
    let mut seen = std::collections::HashMap::new();
    for (index, input) in tx.inputs.iter().enumerate() {
        let key = (input.prev_out.tx_hash, input.prev_out.index);
        if let Some(first) = seen.insert(key, index) {
            return Err(TransactionError::DuplicateInput { first, index });
        }
    }

    // Order applications must index real inputs/outputs, and no input may
    // back more than one order.
    let mut claimed_inputs = HashSet::new();
    for order_tx in &tx.orders {
        for &index in &order_tx.input_indices {
            if index >= tx.inputs.len() {
                return Err(TransactionError::OrderIndexOutOfRange {
                    kind: "input",
                    index,
                    len: tx.inputs.len(),
                });
            }
            if !claimed_inputs.insert(index) {
                return Err(TransactionError::OverlappingOrderInputs { index });
            }
        }
        for &index in &order_tx.output_indices {
            if index >= tx.outputs.len() {
                return Err(TransactionError::OrderIndexOutOfRange {
                    kind: "output",
                    index,
                    len: tx.outputs.len(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Order, OrderOnTransfer};
    use crate::payment::PaymentTx;
    use crate::transfer::{AssetOutPoint, AssetTransferInput, AssetTransferOutput};
    use ember_types::{Address, AssetType, LockScriptHash, NetworkId, Signature, Timestamp, TxHash};

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn tx_hash(n: u8) -> TxHash {
        TxHash::new([n; 32])
    }

    fn sig() -> Signature {
        Signature([0u8; 64])
    }

    fn input(src: u8, index: usize, asset: AssetType, quantity: u64) -> AssetTransferInput {
        AssetTransferInput {
            prev_out: AssetOutPoint {
                tx_hash: tx_hash(src),
                index,
                asset_type: asset,
                quantity,
            },
            unlock_params: vec![],
        }
    }

    fn output(asset: AssetType, quantity: u64) -> AssetTransferOutput {
        AssetTransferOutput {
            lock_script_hash: LockScriptHash::new([5u8; 20]),
            parameters: vec![],
            asset_type: asset,
            quantity,
            shard_id: 0,
        }
    }

    fn transfer(
        inputs: Vec<AssetTransferInput>,
        outputs: Vec<AssetTransferOutput>,
        orders: Vec<OrderOnTransfer>,
    ) -> TransferAssetTx {
        TransferAssetTx {
            hash: tx_hash(0xff),
            signer: addr(1),
            inputs,
            outputs,
            orders,
            seq: 0,
            fee: 10,
            network_id: NetworkId::Dev,
            signature: sig(),
        }
    }

    fn gold() -> AssetType {
        AssetType::new([1u8; 20])
    }

    #[test]
    fn zero_quantity_payment_rejected() {
        let tx = Transaction::Payment(PaymentTx {
            hash: tx_hash(1),
            signer: addr(1),
            receiver: addr(2),
            quantity: 0,
            seq: 0,
            fee: 10,
            network_id: NetworkId::Dev,
            signature: sig(),
        });
        assert!(matches!(
            validate_transaction(&tx),
            Err(TransactionError::ZeroQuantity)
        ));
    }

    #[test]
    fn transfer_without_inputs_rejected() {
        let tx = transfer(vec![], vec![output(gold(), 10)], vec![]);
        assert!(matches!(
            validate_transfer(&tx),
            Err(TransactionError::EmptyInputs)
        ));
    }

    #[test]
    fn duplicate_input_rejected() {
        let tx = transfer(
            vec![input(1, 0, gold(), 10), input(1, 0, gold(), 10)],
            vec![output(gold(), 20)],
            vec![],
        );
        assert!(matches!(
            validate_transfer(&tx),
            Err(TransactionError::DuplicateInput { first: 0, index: 1 })
        ));
    }

    #[test]
    fn order_input_index_out_of_range_rejected() {
        let order = Order {
            asset_type_from: gold(),
            asset_type_to: AssetType::new([2u8; 20]),
            asset_quantity_from: 10,
            asset_quantity_to: 10,
            expiration: Timestamp::new(100),
            origin_outputs: vec![],
            lock_script_hash_from: LockScriptHash::new([5u8; 20]),
            parameters_from: vec![],
        };
        let tx = transfer(
            vec![input(1, 0, gold(), 10)],
            vec![output(gold(), 10)],
            vec![OrderOnTransfer {
                order,
                spent_quantity: 5,
                input_indices: vec![3],
                output_indices: vec![],
            }],
        );
        assert!(matches!(
            validate_transfer(&tx),
            Err(TransactionError::OrderIndexOutOfRange {
                kind: "input",
                index: 3,
                len: 1
            })
        ));
    }

    #[test]
    fn overlapping_order_inputs_rejected() {
        let order = Order {
            asset_type_from: gold(),
            asset_type_to: AssetType::new([2u8; 20]),
            asset_quantity_from: 10,
            asset_quantity_to: 10,
            expiration: Timestamp::new(100),
            origin_outputs: vec![],
            lock_script_hash_from: LockScriptHash::new([5u8; 20]),
            parameters_from: vec![],
        };
        let order_tx = |indices: Vec<usize>| OrderOnTransfer {
            order: order.clone(),
            spent_quantity: 5,
            input_indices: indices,
            output_indices: vec![],
        };
        let tx = transfer(
            vec![input(1, 0, gold(), 10), input(2, 0, gold(), 10)],
            vec![output(gold(), 20)],
            vec![order_tx(vec![0]), order_tx(vec![0])],
        );
        assert!(matches!(
            validate_transfer(&tx),
            Err(TransactionError::OverlappingOrderInputs { index: 0 })
        ));
    }

    #[test]
    fn well_formed_transfer_passes() {
        let tx = transfer(
            vec![input(1, 0, gold(), 10)],
            vec![output(gold(), 10)],
            vec![],
        );
        assert!(validate_transfer(&tx).is_ok());
    }
}
