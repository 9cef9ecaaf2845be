//! Juror selection for a single dispute.

use crate::error::SelectionError;
use crate::sampler::weighted_sample;
use jury_stake::StakeLedger;
use jury_types::{
    ArbitrationParams, Dispute, DomainEvent, Hash256, ParticipantId, SelectionRecord, TokenAmount,
};

/// Draws a stake-weighted jury and freezes each juror's weight.
#[derive(Clone, Debug)]
pub struct JurorSelector {
    max_jury_size: usize,
    min_viable_jurors: usize,
    allow_partial_jury: bool,
}

impl JurorSelector {
    pub fn new(params: &ArbitrationParams) -> Self {
        Self {
            max_jury_size: params.max_jury_size,
            min_viable_jurors: params.min_viable_jurors,
            allow_partial_jury: params.allow_partial_jury,
        }
    }

    /// Active stakers other than the disputant and defendant, ascending by id,
    /// with their current stake as selection weight.
    pub fn eligible_candidates(
        &self,
        ledger: &StakeLedger,
        dispute: &Dispute,
    ) -> Vec<(ParticipantId, TokenAmount)> {
        ledger
            .active_participants()
            .filter(|(p, w)| !dispute.is_party(p) && !w.is_zero())
            .map(|(p, w)| (p.clone(), w))
            .collect()
    }

    /// Check selection preconditions and pool sufficiency without mutating anything.
    ///
    /// Returns the number of jurors the draw will produce.
    pub fn check(
        &self,
        dispute: &Dispute,
        ledger: &StakeLedger,
        pool_size: usize,
    ) -> Result<usize, SelectionError> {
        if dispute.resolved {
            return Err(SelectionError::DisputeResolved(dispute.id));
        }
        if !dispute.verification_complete {
            return Err(SelectionError::VerificationIncomplete(dispute.id));
        }
        if !dispute.jurors.is_empty() || dispute.selection.is_some() {
            return Err(SelectionError::JurorsAlreadySelected(dispute.id));
        }
        if pool_size == 0 || pool_size > self.max_jury_size {
            return Err(SelectionError::InvalidPoolSize {
                requested: pool_size,
                max: self.max_jury_size,
            });
        }

        let available = self.eligible_candidates(ledger, dispute).len();
        if available >= pool_size {
            return Ok(pool_size);
        }
        if self.allow_partial_jury && available >= self.min_viable_jurors {
            return Ok(available);
        }
        Err(SelectionError::InsufficientJurorPool {
            requested: pool_size,
            available,
        })
    }

    /// Draw the jury for `dispute`, lock each juror's stake, and return one
    /// `JurorSelected` event per juror in draw order.
    pub fn select(
        &self,
        dispute: &mut Dispute,
        ledger: &mut StakeLedger,
        seed: Hash256,
        sequence: u64,
        pool_size: usize,
    ) -> Result<Vec<DomainEvent>, SelectionError> {
        let jury_size = self.check(dispute, ledger, pool_size)?;
        let candidates = self.eligible_candidates(ledger, dispute);
        let drawn =
            weighted_sample(&candidates, &seed, jury_size).ok_or(SelectionError::Overflow)?;

        if drawn.len() < jury_size {
            return Err(SelectionError::InsufficientJurorPool {
                requested: pool_size,
                available: drawn.len(),
            });
        }

        let mut events = Vec::with_capacity(drawn.len());
        for (juror, weight) in &drawn {
            dispute.jurors.push(juror.clone());
            dispute.juror_weights.insert(juror.clone(), *weight);
            ledger.lock_juror(juror, dispute.id);
            events.push(DomainEvent::JurorSelected {
                dispute_id: dispute.id,
                juror: juror.clone(),
                weight: *weight,
                seed,
            });
        }
        dispute.selection = Some(SelectionRecord {
            seed,
            sequence,
            requested: pool_size,
            candidates,
        });

        tracing::info!(
            dispute = %dispute.id,
            requested = pool_size,
            selected = drawn.len(),
            seed = %seed,
            "jurors selected"
        );
        Ok(events)
    }
}

/// Replay a dispute's recorded draw and confirm it yields the stored jury.
pub fn audit_selection(dispute: &Dispute) -> Result<bool, SelectionError> {
    let record = dispute
        .selection
        .as_ref()
        .ok_or(SelectionError::NoSelectionRecord(dispute.id))?;
    let replay = weighted_sample(&record.candidates, &record.seed, dispute.jurors.len())
        .ok_or(SelectionError::Overflow)?;

    let matches = replay.len() == dispute.jurors.len()
        && replay
            .iter()
            .zip(dispute.jurors.iter())
            .all(|((p, w), juror)| p == juror && dispute.weight_of(juror) == Some(*w));
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jury_crypto::selection_seed;
    use jury_types::{DisputeId, DisputePhase, Timestamp};

    fn p(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    fn amt(n: u128) -> TokenAmount {
        TokenAmount::new(n)
    }

    fn params() -> ArbitrationParams {
        ArbitrationParams {
            minimum_stake: amt(100),
            ..Default::default()
        }
    }

    fn verified_dispute() -> Dispute {
        let mut d = Dispute::new(
            DisputeId::new(0),
            p("alice"),
            p("bob"),
            amt(50),
            Timestamp::new(0),
            Timestamp::new(1_000),
            String::new(),
            "commit".into(),
        );
        d.defendant_verified = true;
        d.verification_complete = true;
        d
    }

    fn staked_ledger(entries: &[(&str, u128)]) -> StakeLedger {
        let mut ledger = StakeLedger::new(amt(100));
        for (who, n) in entries {
            ledger.stake(&p(who), amt(*n), Timestamp::new(0)).unwrap();
        }
        ledger
    }

    fn seed() -> Hash256 {
        selection_seed(DisputeId::new(0), 4, "commit", &[])
    }

    #[test]
    fn parties_and_inactive_stakers_excluded() {
        let ledger = staked_ledger(&[
            ("alice", 150),
            ("bob", 500),
            ("carol", 200),
            ("dave", 99),
            ("erin", 100),
        ]);
        let selector = JurorSelector::new(&params());
        let eligible = selector.eligible_candidates(&ledger, &verified_dispute());
        assert_eq!(eligible, vec![(p("carol"), amt(200)), (p("erin"), amt(100))]);
    }

    #[test]
    fn select_populates_jury_and_locks_stake() {
        let mut ledger = staked_ledger(&[("alice", 150), ("c1", 200), ("c2", 100), ("c3", 100)]);
        let selector = JurorSelector::new(&params());
        let mut d = verified_dispute();

        let events = selector.select(&mut d, &mut ledger, seed(), 4, 3).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(d.jurors.len(), 3);
        assert_eq!(d.phase(), DisputePhase::Voting);
        for juror in &d.jurors {
            assert_eq!(d.weight_of(juror), Some(ledger.balance_of(juror)));
            assert_eq!(ledger.locked_disputes(juror), vec![DisputeId::new(0)]);
        }
        assert!(audit_selection(&d).unwrap());
    }

    #[test]
    fn second_selection_rejected_and_jury_unchanged() {
        let mut ledger = staked_ledger(&[("c1", 200), ("c2", 100), ("c3", 100)]);
        let selector = JurorSelector::new(&params());
        let mut d = verified_dispute();
        selector.select(&mut d, &mut ledger, seed(), 4, 2).unwrap();
        let before = d.jurors.clone();

        assert_eq!(
            selector.select(&mut d, &mut ledger, seed(), 5, 2),
            Err(SelectionError::JurorsAlreadySelected(DisputeId::new(0)))
        );
        assert_eq!(d.jurors, before);
    }

    #[test]
    fn unverified_dispute_rejected() {
        let mut ledger = staked_ledger(&[("c1", 200)]);
        let selector = JurorSelector::new(&params());
        let mut d = verified_dispute();
        d.verification_complete = false;
        assert_eq!(
            selector.select(&mut d, &mut ledger, seed(), 1, 1),
            Err(SelectionError::VerificationIncomplete(DisputeId::new(0)))
        );
    }

    #[test]
    fn pool_larger_than_eligible_rejected() {
        let mut ledger = staked_ledger(&[("alice", 150), ("bob", 150), ("c1", 200), ("c2", 100)]);
        let selector = JurorSelector::new(&params());
        let mut d = verified_dispute();
        assert_eq!(
            selector.select(&mut d, &mut ledger, seed(), 1, 3),
            Err(SelectionError::InsufficientJurorPool {
                requested: 3,
                available: 2
            })
        );
        assert!(d.jurors.is_empty());
        assert!(ledger.locked_disputes(&p("c1")).is_empty());
    }

    #[test]
    fn partial_jury_accepted_when_enabled() {
        let mut ledger = staked_ledger(&[("c1", 200), ("c2", 100)]);
        let selector = JurorSelector::new(&ArbitrationParams {
            allow_partial_jury: true,
            min_viable_jurors: 2,
            ..params()
        });
        let mut d = verified_dispute();
        selector.select(&mut d, &mut ledger, seed(), 1, 5).unwrap();
        assert_eq!(d.jurors.len(), 2);
        assert_eq!(d.selection.as_ref().unwrap().requested, 5);
    }

    #[test]
    fn zero_and_oversized_pool_rejected() {
        let ledger = staked_ledger(&[("c1", 200)]);
        let selector = JurorSelector::new(&params());
        let d = verified_dispute();
        assert!(matches!(
            selector.check(&d, &ledger, 0),
            Err(SelectionError::InvalidPoolSize { requested: 0, .. })
        ));
        assert!(matches!(
            selector.check(&d, &ledger, 22),
            Err(SelectionError::InvalidPoolSize { requested: 22, max: 21 })
        ));
    }

    #[test]
    fn audit_detects_tampered_jury() {
        let mut ledger = staked_ledger(&[("c1", 200), ("c2", 100), ("c3", 300)]);
        let selector = JurorSelector::new(&params());
        let mut d = verified_dispute();
        selector.select(&mut d, &mut ledger, seed(), 4, 2).unwrap();

        let outsider = p("zed");
        d.juror_weights.remove(&d.jurors[0].clone());
        d.jurors[0] = outsider.clone();
        d.juror_weights.insert(outsider, amt(1));
        assert!(!audit_selection(&d).unwrap());
    }
}
