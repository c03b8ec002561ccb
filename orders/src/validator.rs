//! The transfer acceptance decision.
//!
//! Validation sequence per order application: origin-output folio,
//! asset-type distinctness, nonzero ratio, expiration, maker
//! authorization, output-count bounds, quantity conservation under the
//! order ratio. The first failure is the reported error. Plain per-asset
//! conservation closes the check for everything not bound to an order.

use std::collections::{BTreeMap, BTreeSet};

use ember_store::AssetUtxo;
use ember_transactions::{AssetOutPoint, OrderOnTransfer, TransferAssetTx};
use ember_types::{ProtocolParams, Timestamp};

use crate::error::OrderError;

/// Decide accept/reject for a transfer transaction.
///
/// `resolved` must hold the recorded UTXO for each input, in input order;
/// the ledger resolves them before calling in. No state is mutated here;
/// on `Ok` the caller commits the input deletions and output insertions.
pub fn verify_transfer(
    tx: &TransferAssetTx,
    resolved: &[AssetUtxo],
    now: Timestamp,
    params: &ProtocolParams,
) -> Result<(), OrderError> {
    verify_outpoints(tx, resolved)?;
    for order_tx in &tx.orders {
        verify_order(order_tx, tx, resolved, now, params)?;
    }
    verify_conservation(tx)
}

/// Each input's declared `prev_out` must match the recorded output it spends.
fn verify_outpoints(tx: &TransferAssetTx, resolved: &[AssetUtxo]) -> Result<(), OrderError> {
    for (index, input) in tx.inputs.iter().enumerate() {
        match resolved.get(index) {
            Some(utxo) if utxo.out == input.prev_out => {}
            _ => return Err(OrderError::InvalidAssetOutPoint { index }),
        }
    }
    Ok(())
}

fn verify_order(
    order_tx: &OrderOnTransfer,
    tx: &TransferAssetTx,
    resolved: &[AssetUtxo],
    now: Timestamp,
    params: &ProtocolParams,
) -> Result<(), OrderError> {
    let order = &order_tx.order;

    // Origin outputs must equal, as a set, exactly the inputs bound to
    // this order. An empty folio never authorizes anything.
    if order.origin_outputs.is_empty() {
        return Err(OrderError::InvalidOriginOutputs);
    }
    let declared: BTreeSet<&AssetOutPoint> = order.origin_outputs.iter().collect();
    let bound: BTreeSet<&AssetOutPoint> = order_tx
        .input_indices
        .iter()
        .map(|&i| &tx.inputs[i].prev_out)
        .collect();
    if declared.len() != order.origin_outputs.len()
        || bound.len() != order_tx.input_indices.len()
        || declared != bound
    {
        return Err(OrderError::InvalidOriginOutputs);
    }

    if order.asset_type_from == order.asset_type_to {
        return Err(OrderError::InvalidOrderAssetTypes);
    }

    if order.asset_quantity_from == 0 || order.asset_quantity_to == 0 {
        return Err(OrderError::InvalidOrderAssetQuantities);
    }

    if order.expiration.has_passed(now) {
        return Err(OrderError::OrderExpired {
            expiration: order.expiration.as_secs(),
            now: now.as_secs(),
        });
    }

    // The maker's declared lock must be the one actually guarding the
    // origin outputs; any tampering invalidates the authorization.
    for &index in &order_tx.input_indices {
        let utxo = &resolved[index];
        if utxo.lock_script_hash != order.lock_script_hash_from {
            return Err(OrderError::InvalidOrderLockScriptHash);
        }
        if utxo.parameters != order.parameters_from {
            return Err(OrderError::InvalidOrderParameters);
        }
    }

    verify_order_flow(order_tx, tx, params)
}

/// Output-count bounds and quantity conservation under the order ratio.
fn verify_order_flow(
    order_tx: &OrderOnTransfer,
    tx: &TransferAssetTx,
    params: &ProtocolParams,
) -> Result<(), OrderError> {
    let order = &order_tx.order;
    let spent = order_tx.spent_quantity;

    if spent > order.asset_quantity_from {
        return Err(OrderError::InconsistentTransactionInOutWithOrders {
            reason: "spent quantity exceeds the order",
        });
    }

    let mut input_total: u128 = 0;
    for &index in &order_tx.input_indices {
        let prev_out = &tx.inputs[index].prev_out;
        if prev_out.asset_type != order.asset_type_from {
            return Err(OrderError::InconsistentTransactionInOutWithOrders {
                reason: "order-bound input carries an asset the order does not give",
            });
        }
        input_total += u128::from(prev_out.quantity);
    }
    if u128::from(spent) > input_total {
        return Err(OrderError::InconsistentTransactionInOutWithOrders {
            reason: "spent quantity exceeds the bound inputs",
        });
    }

    // Walk the order-bound outputs: at most two per side (remainder back
    // to the maker plus payment across), nothing unrelated, and track how
    // much of each side lands back under the maker's lock.
    let mut from_outputs = 0usize;
    let mut to_outputs = 0usize;
    let mut maker_from: u128 = 0;
    let mut maker_to: u128 = 0;
    for &index in &order_tx.output_indices {
        let output = &tx.outputs[index];
        let maker_owned = output.lock_script_hash == order.lock_script_hash_from
            && output.parameters == order.parameters_from;
        if output.asset_type == order.asset_type_from {
            from_outputs += 1;
            if maker_owned {
                maker_from += u128::from(output.quantity);
            }
        } else if output.asset_type == order.asset_type_to {
            to_outputs += 1;
            if maker_owned {
                maker_to += u128::from(output.quantity);
            }
        } else {
            return Err(OrderError::InconsistentTransactionInOutWithOrders {
                reason: "order-bound output carries an unrelated asset type",
            });
        }
    }
    if from_outputs > params.max_order_asset_outputs || to_outputs > params.max_order_asset_outputs
    {
        return Err(OrderError::InconsistentTransactionInOutWithOrders {
            reason: "too many outputs bound to one side of the order",
        });
    }

    if maker_from != input_total - u128::from(spent) {
        return Err(OrderError::InconsistentTransactionInOutWithOrders {
            reason: "maker change does not match the unspent quantity",
        });
    }

    // Ratio check with floor division; the truncation remainder may be
    // kept by the relayer, but the maker's payment is pinned exactly.
    let expected_receive = order
        .maker_receive_quantity(spent)
        .unwrap_or_default();
    if maker_to != u128::from(expected_receive) {
        return Err(OrderError::InconsistentTransactionInOutWithOrders {
            reason: "maker payment does not match the order ratio",
        });
    }

    Ok(())
}

/// Per-asset-type conservation across the whole transfer.
///
/// Orders reassign ownership, never quantity: the totals must balance
/// even for order-carrying transfers.
fn verify_conservation(tx: &TransferAssetTx) -> Result<(), OrderError> {
    let mut totals: BTreeMap<_, (u128, u128)> = BTreeMap::new();
    for input in &tx.inputs {
        totals.entry(input.prev_out.asset_type).or_default().0 += u128::from(input.prev_out.quantity);
    }
    for output in &tx.outputs {
        totals.entry(output.asset_type).or_default().1 += u128::from(output.quantity);
    }
    for (asset_type, (input_total, output_total)) in totals {
        if input_total != output_total {
            return Err(OrderError::InconsistentTransactionInOut {
                asset_type: asset_type.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_transactions::{AssetTransferInput, AssetTransferOutput, Order};
    use ember_types::{Address, AssetType, LockScriptHash, NetworkId, Signature, TxHash};

    fn gold() -> AssetType {
        AssetType::new([1u8; 20])
    }

    fn silver() -> AssetType {
        AssetType::new([2u8; 20])
    }

    fn alice_lock() -> LockScriptHash {
        LockScriptHash::new([0xaa; 20])
    }

    fn bob_lock() -> LockScriptHash {
        LockScriptHash::new([0xbb; 20])
    }

    fn params() -> ProtocolParams {
        ProtocolParams::default()
    }

    fn input(src: u8, index: usize, asset: AssetType, quantity: u64) -> AssetTransferInput {
        AssetTransferInput {
            prev_out: AssetOutPoint {
                tx_hash: TxHash::new([src; 32]),
                index,
                asset_type: asset,
                quantity,
            },
            unlock_params: vec![],
        }
    }

    fn output(lock: LockScriptHash, asset: AssetType, quantity: u64) -> AssetTransferOutput {
        AssetTransferOutput {
            lock_script_hash: lock,
            parameters: vec![],
            asset_type: asset,
            quantity,
            shard_id: 0,
        }
    }

    fn utxo_for(input: &AssetTransferInput, lock: LockScriptHash) -> AssetUtxo {
        AssetUtxo {
            out: input.prev_out.clone(),
            lock_script_hash: lock,
            parameters: vec![],
            shard_id: 0,
        }
    }

    fn transfer(
        inputs: Vec<AssetTransferInput>,
        outputs: Vec<AssetTransferOutput>,
        orders: Vec<OrderOnTransfer>,
    ) -> TransferAssetTx {
        TransferAssetTx {
            hash: TxHash::new([0xff; 32]),
            signer: Address::new([9u8; 20]),
            inputs,
            outputs,
            orders,
            seq: 0,
            fee: 10,
            network_id: NetworkId::Dev,
            signature: Signature([0u8; 64]),
        }
    }

    /// Alice offers 100 gold for 1000 silver; bob fills `spent` of it.
    /// Outputs: [alice gold change, alice silver, bob gold, bob silver change].
    fn exchange_fixture(spent: u64, alice_silver: u64) -> (TransferAssetTx, Vec<AssetUtxo>) {
        let alice_in = input(1, 0, gold(), 100);
        let bob_in = input(2, 0, silver(), 1200);
        let order = Order {
            asset_type_from: gold(),
            asset_type_to: silver(),
            asset_quantity_from: 100,
            asset_quantity_to: 1000,
            expiration: Timestamp::new(10_000),
            origin_outputs: vec![alice_in.prev_out.clone()],
            lock_script_hash_from: alice_lock(),
            parameters_from: vec![],
        };
        let resolved = vec![utxo_for(&alice_in, alice_lock()), utxo_for(&bob_in, bob_lock())];
        // Full fills carry no maker change output.
        let mut outputs = Vec::new();
        if spent < 100 {
            outputs.push(output(alice_lock(), gold(), 100 - spent));
        }
        outputs.push(output(alice_lock(), silver(), alice_silver));
        outputs.push(output(bob_lock(), gold(), spent));
        let order_bound: Vec<usize> = (0..outputs.len()).collect();
        outputs.push(output(bob_lock(), silver(), 1200 - alice_silver));
        let tx = transfer(
            vec![alice_in, bob_in],
            outputs,
            vec![OrderOnTransfer {
                order,
                spent_quantity: spent,
                input_indices: vec![0],
                output_indices: order_bound,
            }],
        );
        (tx, resolved)
    }

    fn now() -> Timestamp {
        Timestamp::new(100)
    }

    #[test]
    fn half_fill_at_exact_ratio_passes() {
        let (tx, resolved) = exchange_fixture(50, 500);
        assert!(verify_transfer(&tx, &resolved, now(), &params()).is_ok());
    }

    #[test]
    fn full_fill_at_exact_ratio_passes() {
        let (tx, resolved) = exchange_fixture(100, 1000);
        assert!(verify_transfer(&tx, &resolved, now(), &params()).is_ok());
    }

    #[test]
    fn off_by_one_under_ratio_rejected() {
        let (tx, resolved) = exchange_fixture(50, 499);
        assert!(matches!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InconsistentTransactionInOutWithOrders { .. })
        ));
    }

    #[test]
    fn off_by_one_over_ratio_rejected() {
        let (tx, resolved) = exchange_fixture(50, 501);
        assert!(matches!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InconsistentTransactionInOutWithOrders { .. })
        ));
    }

    #[test]
    fn wrong_maker_change_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.outputs[0].quantity = 49;
        tx.outputs[2].quantity = 51; // keep conservation intact
        assert!(matches!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InconsistentTransactionInOutWithOrders { .. })
        ));
    }

    #[test]
    fn spending_more_than_the_order_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].spent_quantity = 101;
        assert!(matches!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InconsistentTransactionInOutWithOrders { .. })
        ));
    }

    #[test]
    fn same_asset_on_both_sides_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].order.asset_type_to = gold();
        assert_eq!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InvalidOrderAssetTypes)
        );
    }

    #[test]
    fn zero_ratio_side_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].order.asset_quantity_to = 0;
        assert_eq!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InvalidOrderAssetQuantities)
        );
    }

    #[test]
    fn expired_order_rejected_regardless_of_other_fields() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].order.expiration = Timestamp::EPOCH;
        assert_eq!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::OrderExpired {
                expiration: 0,
                now: 100
            })
        );
    }

    #[test]
    fn expiration_equal_to_ledger_time_is_expired() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].order.expiration = now();
        assert!(matches!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::OrderExpired { .. })
        ));
    }

    #[test]
    fn tampered_lock_script_hash_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].order.lock_script_hash_from = bob_lock();
        // Keep the folio self-consistent so only the authorization fails:
        // the declared origin outputs still identify the same outpoints.
        assert_eq!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InvalidOrderLockScriptHash)
        );
    }

    #[test]
    fn tampered_parameters_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].order.parameters_from = vec![vec![1, 2, 3]];
        assert_eq!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InvalidOrderParameters)
        );
    }

    #[test]
    fn empty_origin_outputs_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].order.origin_outputs.clear();
        assert_eq!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InvalidOriginOutputs)
        );
    }

    #[test]
    fn origin_outputs_superset_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].order.origin_outputs.push(AssetOutPoint {
            tx_hash: TxHash::new([7u8; 32]),
            index: 0,
            asset_type: gold(),
            quantity: 1,
        });
        assert_eq!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InvalidOriginOutputs)
        );
    }

    #[test]
    fn origin_outputs_identity_mismatch_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.orders[0].order.origin_outputs[0].index = 1;
        assert_eq!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InvalidOriginOutputs)
        );
    }

    #[test]
    fn too_many_outputs_on_one_side_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        // Split the maker change into three gold outputs, all order-bound.
        tx.outputs[0].quantity = 30;
        tx.outputs.push(output(alice_lock(), gold(), 10));
        tx.outputs.push(output(alice_lock(), gold(), 10));
        let extra = tx.outputs.len() - 2;
        tx.orders[0].output_indices.push(extra);
        tx.orders[0].output_indices.push(extra + 1);
        assert!(matches!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InconsistentTransactionInOutWithOrders { .. })
        ));
    }

    #[test]
    fn unrelated_asset_in_order_outputs_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.outputs[2].asset_type = AssetType::new([3u8; 20]);
        assert!(matches!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InconsistentTransactionInOutWithOrders { .. })
        ));
    }

    #[test]
    fn plain_transfer_conservation_violation_rejected() {
        let gold_in = input(1, 0, gold(), 100);
        let resolved = vec![utxo_for(&gold_in, alice_lock())];
        let tx = transfer(
            vec![gold_in],
            vec![output(bob_lock(), gold(), 99)],
            vec![],
        );
        assert!(matches!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InconsistentTransactionInOut { .. })
        ));
    }

    #[test]
    fn plain_transfer_balancing_passes() {
        let gold_in = input(1, 0, gold(), 100);
        let resolved = vec![utxo_for(&gold_in, alice_lock())];
        let tx = transfer(
            vec![gold_in],
            vec![
                output(bob_lock(), gold(), 40),
                output(alice_lock(), gold(), 60),
            ],
            vec![],
        );
        assert!(verify_transfer(&tx, &resolved, now(), &params()).is_ok());
    }

    #[test]
    fn stale_outpoint_claim_rejected() {
        let (mut tx, resolved) = exchange_fixture(50, 500);
        tx.inputs[1].prev_out.quantity = 999;
        assert_eq!(
            verify_transfer(&tx, &resolved, now(), &params()),
            Err(OrderError::InvalidAssetOutPoint { index: 1 })
        );
    }

    #[test]
    fn cancellation_spends_origin_outputs_without_an_order() {
        // Spending the order's backing outputs in an order-free transfer
        // is how a maker cancels: plain conservation is all that applies.
        let gold_in = input(1, 0, gold(), 100);
        let resolved = vec![utxo_for(&gold_in, alice_lock())];
        let tx = transfer(
            vec![gold_in],
            vec![output(alice_lock(), gold(), 100)],
            vec![],
        );
        assert!(verify_transfer(&tx, &resolved, now(), &params()).is_ok());
    }

    #[test]
    fn partial_fill_then_residual_fill_passes() {
        // First fill: 50 of 100 gold.
        let (tx1, resolved1) = exchange_fixture(50, 500);
        assert!(verify_transfer(&tx1, &resolved1, now(), &params()).is_ok());

        // The residual order is backed by the maker's change output of tx1.
        let change_out = tx1.out_point(0).unwrap();
        let residual = tx1.orders[0].order.consumed(50, vec![change_out.clone()]);
        assert_eq!(residual.asset_quantity_from, 50);
        assert_eq!(residual.asset_quantity_to, 500);

        // Second fill consumes the residual completely.
        let alice_in = AssetTransferInput {
            prev_out: change_out,
            unlock_params: vec![],
        };
        let carol_in = input(3, 0, silver(), 700);
        let resolved2 = vec![utxo_for(&alice_in, alice_lock()), utxo_for(&carol_in, bob_lock())];
        let tx2 = transfer(
            vec![alice_in, carol_in],
            vec![
                output(alice_lock(), silver(), 500),
                output(bob_lock(), gold(), 50),
                output(bob_lock(), silver(), 200),
            ],
            vec![OrderOnTransfer {
                order: residual,
                spent_quantity: 50,
                input_indices: vec![0],
                output_indices: vec![0, 1],
            }],
        );
        assert!(verify_transfer(&tx2, &resolved2, now(), &params()).is_ok());
    }

    #[test]
    fn two_independent_orders_validate_independently() {
        let alice_in = input(1, 0, gold(), 100);
        let carol_in = input(3, 0, silver(), 300);
        let bob_gold = input(2, 0, gold(), 60);
        let bob_silver = input(2, 1, silver(), 1000);
        let carol_lock = LockScriptHash::new([0xcc; 20]);

        let alice_order = Order {
            asset_type_from: gold(),
            asset_type_to: silver(),
            asset_quantity_from: 100,
            asset_quantity_to: 1000,
            expiration: Timestamp::new(10_000),
            origin_outputs: vec![alice_in.prev_out.clone()],
            lock_script_hash_from: alice_lock(),
            parameters_from: vec![],
        };
        let carol_order = Order {
            asset_type_from: silver(),
            asset_type_to: gold(),
            asset_quantity_from: 300,
            asset_quantity_to: 30,
            expiration: Timestamp::new(10_000),
            origin_outputs: vec![carol_in.prev_out.clone()],
            lock_script_hash_from: carol_lock,
            parameters_from: vec![],
        };

        let resolved = vec![
            utxo_for(&alice_in, alice_lock()),
            utxo_for(&carol_in, carol_lock),
            utxo_for(&bob_gold, bob_lock()),
            utxo_for(&bob_silver, bob_lock()),
        ];
        let tx = transfer(
            vec![alice_in, carol_in, bob_gold, bob_silver],
            vec![
                // Alice: 40 gold spent for 400 silver.
                output(alice_lock(), gold(), 60),
                output(alice_lock(), silver(), 400),
                output(bob_lock(), gold(), 40),
                // Carol: 300 silver spent for 30 gold.
                output(carol_lock, gold(), 30),
                output(bob_lock(), silver(), 300),
                // Bob's remaining balances.
                output(bob_lock(), gold(), 30),
                output(bob_lock(), silver(), 600),
            ],
            vec![
                OrderOnTransfer {
                    order: alice_order,
                    spent_quantity: 40,
                    input_indices: vec![0],
                    output_indices: vec![0, 1, 2],
                },
                OrderOnTransfer {
                    order: carol_order,
                    spent_quantity: 300,
                    input_indices: vec![1],
                    output_indices: vec![3, 4],
                },
            ],
        );
        assert!(verify_transfer(&tx, &resolved, now(), &params()).is_ok());
    }
}
