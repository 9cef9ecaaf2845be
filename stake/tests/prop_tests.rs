//! Property tests: the activity invariant and total accounting hold after
//! every operation in an arbitrary stake/unstake sequence.

use jury_stake::StakeLedger;
use jury_types::{ParticipantId, Timestamp, TokenAmount};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Stake(usize, u128),
    Unstake(usize, u128),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0u128..300).prop_map(|(p, a)| Op::Stake(p, a)),
        (0usize..4, 0u128..300).prop_map(|(p, a)| Op::Unstake(p, a)),
    ]
}

proptest! {
    #[test]
    fn is_active_tracks_minimum_after_every_op(
        minimum in 1u128..200,
        ops in prop::collection::vec(arb_op(), 1..60),
    ) {
        let participants: Vec<ParticipantId> =
            (0..4).map(|i| ParticipantId::new(format!("p{i}"))).collect();
        let mut ledger = StakeLedger::new(TokenAmount::new(minimum));

        for (t, op) in ops.into_iter().enumerate() {
            let now = Timestamp::new(t as u64);
            let _ = match op {
                Op::Stake(i, a) => ledger.stake(&participants[i], TokenAmount::new(a), now),
                Op::Unstake(i, a) => ledger.unstake(&participants[i], TokenAmount::new(a), now),
            };

            let mut sum = 0u128;
            for p in &participants {
                if let Some(stake) = ledger.stake_of(p) {
                    prop_assert_eq!(stake.is_active, stake.amount.raw() >= minimum);
                    sum += stake.amount.raw();
                }
            }
            prop_assert_eq!(ledger.total_staked().raw(), sum);
        }
    }
}
