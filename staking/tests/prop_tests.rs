use proptest::prelude::*;

use std::collections::BTreeSet;

use ember_staking::{distribute_fee, StakingLedger};
use ember_types::Address;

fn addr(n: u8) -> Address {
    Address::new([n; 20])
}

/// A random stake operation to replay against the ledger.
#[derive(Clone, Debug)]
enum Op {
    Transfer { from: u8, to: u8, quantity: u64 },
    Delegate { from: u8, to: u8, quantity: u64 },
    Revoke { from: u8, to: u8, quantity: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let party = 0u8..6;
    let quantity = 0u64..2000;
    prop_oneof![
        (party.clone(), party.clone(), quantity.clone())
            .prop_map(|(from, to, quantity)| Op::Transfer { from, to, quantity }),
        (party.clone(), party.clone(), quantity.clone())
            .prop_map(|(from, to, quantity)| Op::Delegate { from, to, quantity }),
        (party.clone(), party, quantity)
            .prop_map(|(from, to, quantity)| Op::Revoke { from, to, quantity }),
    ]
}

fn run_ops(ledger: &mut StakingLedger, ops: &[Op]) {
    // Addresses 4 and 5 act as the validator set.
    let validators: BTreeSet<Address> = [addr(4), addr(5)].into_iter().collect();
    for op in ops {
        // Failures are part of the exercise; state must stay consistent.
        let _ = match *op {
            Op::Transfer { from, to, quantity } => {
                ledger.transfer_stake(&addr(from), &addr(to), quantity)
            }
            Op::Delegate { from, to, quantity } => {
                ledger.delegate(&addr(from), &addr(to), quantity, &validators)
            }
            Op::Revoke { from, to, quantity } => {
                ledger.revoke(&addr(from), &addr(to), quantity)
            }
        };
    }
}

proptest! {
    /// Total stake is conserved by any operation sequence.
    #[test]
    fn stake_is_conserved(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut ledger = StakingLedger::new();
        ledger.credit(addr(0), 70000);
        ledger.credit(addr(1), 20000);
        ledger.credit(addr(2), 10000);
        let initial = ledger.total_stake();

        run_ops(&mut ledger, &ops);
        prop_assert_eq!(ledger.total_stake(), initial);
    }

    /// No zero-balance entry survives, and effective weights always sum
    /// to the total stake.
    #[test]
    fn weights_partition_total_stake(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut ledger = StakingLedger::new();
        ledger.credit(addr(0), 70000);
        ledger.credit(addr(1), 20000);
        ledger.credit(addr(2), 10000);

        run_ops(&mut ledger, &ops);

        let snapshot = ledger.weight_snapshot();
        prop_assert!(snapshot.values().all(|w| *w > 0));
        let weight_sum: u64 = snapshot.values().sum();
        prop_assert_eq!(weight_sum, ledger.total_stake());
    }

    /// Fee shares never exceed the fee, and the author remainder closes
    /// the books exactly.
    #[test]
    fn distribution_never_exceeds_fee(
        fee in 0u64..1_000_000,
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let mut ledger = StakingLedger::new();
        ledger.credit(addr(0), 70000);
        ledger.credit(addr(1), 20000);
        ledger.credit(addr(2), 10000);
        run_ops(&mut ledger, &ops);

        let shares = distribute_fee(&ledger.weight_snapshot(), fee);
        let distributed: u64 = shares.iter().map(|(_, s)| s).sum();
        prop_assert!(distributed <= fee);

        let author_remainder = fee - distributed;
        prop_assert_eq!(distributed + author_remainder, fee);
    }

    /// Persistence round-trips every reachable state byte-identically.
    #[test]
    fn save_load_round_trip(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut ledger = StakingLedger::new();
        ledger.credit(addr(0), 50000);
        ledger.credit(addr(1), 30000);
        run_ops(&mut ledger, &ops);

        let bytes = ledger.save_state();
        let restored = StakingLedger::load_state(&bytes);
        prop_assert_eq!(restored.save_state(), bytes);
        prop_assert_eq!(restored.total_stake(), ledger.total_stake());
        prop_assert_eq!(restored.weight_snapshot(), ledger.weight_snapshot());
    }
}
