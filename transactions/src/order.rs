//! Embedded exchange orders.
//!
//! An order is a maker's signed statement: "I give `asset_quantity_from`
//! units of `asset_type_from` for `asset_quantity_to` units of
//! `asset_type_to`, backed by these specific outputs, until `expiration`."
//! Orders are not resting book entries: each one is carried inside the
//! transfer transaction that settles it and dies with that transaction.

use ember_types::{AssetType, LockScriptHash, Timestamp};
use serde::{Deserialize, Serialize};

use crate::transfer::AssetOutPoint;

/// A single-use exchange instruction embedded in a transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Asset the maker gives away.
    pub asset_type_from: AssetType,
    /// Asset the maker wants in return.
    pub asset_type_to: AssetType,
    /// Ratio numerator: total `from` quantity offered.
    pub asset_quantity_from: u64,
    /// Ratio denominator side: total `to` quantity asked.
    pub asset_quantity_to: u64,
    /// Ledger time after which the order is dead. Strictly-greater-than
    /// comparison: an order expiring at the block time is already expired.
    pub expiration: Timestamp,
    /// The exact outputs whose spending this order authorizes.
    pub origin_outputs: Vec<AssetOutPoint>,
    /// Lock script hash guarding the origin outputs (the maker's lock).
    pub lock_script_hash_from: LockScriptHash,
    /// Lock script parameters of the origin outputs.
    pub parameters_from: Vec<Vec<u8>>,
}

impl Order {
    /// Quantity of `asset_type_to` the maker must receive when `spent`
    /// units of `asset_type_from` are taken: `floor(spent * to / from)`.
    ///
    /// 128-bit intermediate so the full u64 range cannot overflow.
    /// Returns `None` when the order has a zero `from` side (such an
    /// order never validates, but arithmetic here must not divide by zero).
    pub fn maker_receive_quantity(&self, spent: u64) -> Option<u64> {
        if self.asset_quantity_from == 0 {
            return None;
        }
        let exact = u128::from(spent) * u128::from(self.asset_quantity_to)
            / u128::from(self.asset_quantity_from);
        Some(exact as u64)
    }

    /// The residual order left after `spent` units have been taken.
    ///
    /// Partial fills chain client-side: the follow-up transaction embeds
    /// this residual, with its `origin_outputs` pointing at the change
    /// outputs of the fill that consumed the original.
    pub fn consumed(&self, spent: u64, new_origin_outputs: Vec<AssetOutPoint>) -> Order {
        let received = self.maker_receive_quantity(spent).unwrap_or(0);
        Order {
            asset_type_from: self.asset_type_from,
            asset_type_to: self.asset_type_to,
            asset_quantity_from: self.asset_quantity_from.saturating_sub(spent),
            asset_quantity_to: self.asset_quantity_to.saturating_sub(received),
            expiration: self.expiration,
            origin_outputs: new_origin_outputs,
            lock_script_hash_from: self.lock_script_hash_from,
            parameters_from: self.parameters_from.clone(),
        }
    }
}

/// Binds one order to a subset of a transfer's inputs and outputs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderOnTransfer {
    pub order: Order,
    /// How much of the order's `asset_quantity_from` this transfer takes.
    pub spent_quantity: u64,
    /// Indices into the transfer's inputs backing this order.
    pub input_indices: Vec<usize>,
    /// Indices into the transfer's outputs settling this order.
    pub output_indices: Vec<usize>,
}
