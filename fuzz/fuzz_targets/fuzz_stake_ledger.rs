#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use jury_stake::StakeLedger;
use jury_types::{DisputeId, ParticipantId, Timestamp, TokenAmount};

#[derive(Arbitrary, Debug)]
enum Op {
    Stake { who: u8, amount: u128 },
    Unstake { who: u8, amount: u128 },
    Lock { who: u8, dispute: u8 },
    Release { dispute: u8 },
}

// Arbitrary stake/unstake/lock sequences never panic and keep the ledger's
// accounting consistent.
fuzz_target!(|input: (u64, Vec<Op>)| {
    let (minimum, ops) = input;
    let mut ledger = StakeLedger::new(TokenAmount::new(minimum as u128));
    let who = |w: u8| ParticipantId::new(format!("p{}", w % 8));

    for (t, op) in ops.into_iter().enumerate() {
        let now = Timestamp::new(t as u64);
        match op {
            Op::Stake { who: w, amount } => {
                let _ = ledger.stake(&who(w), TokenAmount::new(amount), now);
            }
            Op::Unstake { who: w, amount } => {
                let _ = ledger.unstake(&who(w), TokenAmount::new(amount), now);
            }
            Op::Lock { who: w, dispute } => {
                ledger.lock_juror(&who(w), DisputeId::new(dispute as u64));
            }
            Op::Release { dispute } => {
                let everyone: Vec<ParticipantId> = (0..8).map(who).collect();
                ledger.release_dispute(DisputeId::new(dispute as u64), &everyone);
            }
        }

        let mut sum = 0u128;
        for w in 0..8 {
            let balance = ledger.balance_of(&who(w));
            sum = sum.checked_add(balance.raw()).expect("stakes fit in total");
            assert_eq!(ledger.is_active(&who(w)), balance >= ledger.minimum_stake());
        }
        assert_eq!(ledger.total_staked().raw(), sum);
    }
});
