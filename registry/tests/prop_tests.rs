use std::sync::Arc;

use jury_nullables::{NullClock, NullLedger};
use jury_registry::{ArbitrationEngine, EngineConfig};
use jury_types::{DisputeId, ParticipantId, TokenAmount};
use proptest::prelude::*;

const PARTICIPANTS: [&str; 6] = ["p0", "p1", "p2", "p3", "p4", "p5"];
const MINIMUM: u128 = 100;

#[derive(Clone, Debug)]
enum Op {
    Stake(usize, u128),
    Unstake(usize, u128),
    Create(usize, usize, u128),
    Verify(usize),
    Select(usize, usize),
    Vote(usize, usize, bool),
    Advance(u64),
    Resolve(usize),
    Distribute(usize),
    Claim(usize),
}

fn op() -> impl Strategy<Value = Op> {
    let who = 0..PARTICIPANTS.len();
    prop_oneof![
        (who.clone(), 0u128..300).prop_map(|(w, a)| Op::Stake(w, a)),
        (who.clone(), 0u128..300).prop_map(|(w, a)| Op::Unstake(w, a)),
        (who.clone(), who.clone(), 0u128..50).prop_map(|(a, b, r)| Op::Create(a, b, r)),
        (0usize..4).prop_map(Op::Verify),
        (0usize..4, 0usize..5).prop_map(|(d, n)| Op::Select(d, n)),
        (who.clone(), 0usize..4, any::<bool>()).prop_map(|(w, d, v)| Op::Vote(w, d, v)),
        (0u64..200).prop_map(Op::Advance),
        (0usize..4).prop_map(Op::Resolve),
        (0usize..4).prop_map(Op::Distribute),
        who.prop_map(Op::Claim),
    ]
}

fn p(i: usize) -> ParticipantId {
    ParticipantId::new(PARTICIPANTS[i])
}

proptest! {
    /// Invariants that must hold after every operation, successful or not.
    #[test]
    fn engine_invariants_hold(ops in prop::collection::vec(op(), 1..80)) {
        let mut config = EngineConfig::default();
        config.params.minimum_stake = TokenAmount::new(MINIMUM);
        config.params.dispute_duration_secs = 100;
        let clock = Arc::new(NullClock::new(0));
        let mut ledger = NullLedger::new(config.escrow_account.clone());
        for i in 0..PARTICIPANTS.len() {
            ledger.fund(&p(i), TokenAmount::new(1_000_000));
        }
        let mut engine = ArbitrationEngine::new(config, ledger, Arc::clone(&clock)).unwrap();
        let mut frozen_juries: Vec<Option<Vec<ParticipantId>>> = Vec::new();

        for op in ops {
            let anyone = ParticipantId::new("anyone");
            let _ = match op {
                Op::Stake(w, a) => engine.stake(&p(w), TokenAmount::new(a)).map(|_| ()),
                Op::Unstake(w, a) => engine.unstake(&p(w), TokenAmount::new(a)).map(|_| ()),
                Op::Create(a, b, r) => engine
                    .create_dispute(&p(a), &p(b), TokenAmount::new(r), "", "")
                    .map(|_| ()),
                Op::Verify(d) => {
                    let id = DisputeId::new(d as u64);
                    let defendant = engine.dispute(id).map(|x| x.defendant.clone());
                    match defendant {
                        Ok(def) => engine.verify(&def, id).map(|_| ()),
                        Err(e) => Err(e),
                    }
                }
                Op::Select(d, n) => engine
                    .select_jurors(&anyone, DisputeId::new(d as u64), n)
                    .map(|_| ()),
                Op::Vote(w, d, v) => engine.cast_vote(&p(w), DisputeId::new(d as u64), v).map(|_| ()),
                Op::Advance(s) => {
                    clock.advance(s);
                    Ok(())
                }
                Op::Resolve(d) => engine.resolve_dispute(&anyone, DisputeId::new(d as u64)).map(|_| ()),
                Op::Distribute(d) => engine
                    .distribute_rewards(&anyone, DisputeId::new(d as u64))
                    .map(|_| ()),
                Op::Claim(w) => engine.claim_rewards(&p(w)).map(|_| ()),
            };

            let mut sum = 0u128;
            for i in 0..PARTICIPANTS.len() {
                let balance = engine.balance_of(&p(i));
                sum += balance.raw();
                prop_assert_eq!(engine.is_active(&p(i)), balance.raw() >= MINIMUM);
            }
            prop_assert_eq!(engine.total_staked().raw(), sum);

            for dispute in engine.disputes() {
                let idx = dispute.id.as_u64() as usize;
                if frozen_juries.len() <= idx {
                    frozen_juries.resize(idx + 1, None);
                }
                match &frozen_juries[idx] {
                    Some(jury) => prop_assert_eq!(jury, &dispute.jurors),
                    None if !dispute.jurors.is_empty() => {
                        frozen_juries[idx] = Some(dispute.jurors.clone());
                    }
                    None => {}
                }

                let cast = dispute.disputant_votes.raw() + dispute.defendant_votes.raw();
                prop_assert!(cast <= dispute.total_juror_weight().unwrap().raw());
                for juror in &dispute.jurors {
                    prop_assert!(!dispute.is_party(juror));
                }
            }
        }
    }
}
