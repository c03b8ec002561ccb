//! Stake-weighted fee distribution.

use std::collections::BTreeMap;

use ember_types::Address;

/// Split a block's fee total across stakeholders in proportion to their
/// effective weights.
///
/// Each share is `fee * weight / total_weight` with floor division
/// (128-bit intermediate). Zero shares are omitted. The undistributed
/// remainder (rounding loss plus anything below one share) goes to the
/// block author, which the settlement layer reconciles.
///
/// Returned in address order, so every node emits the same sequence.
pub fn distribute_fee(weights: &BTreeMap<Address, u64>, fee: u64) -> Vec<(Address, u64)> {
    let total_weight: u128 = weights.values().map(|w| u128::from(*w)).sum();
    if total_weight == 0 || fee == 0 {
        return Vec::new();
    }

    weights
        .iter()
        .filter_map(|(address, weight)| {
            let share = u128::from(fee) * u128::from(*weight) / total_weight;
            (share > 0).then_some((*address, share as u64))
        })
        .collect()
}

/// Sum of all shares produced by [`distribute_fee`].
pub fn distributed_total(shares: &[(Address, u64)]) -> u64 {
    shares.iter().map(|(_, share)| share).sum()
}
