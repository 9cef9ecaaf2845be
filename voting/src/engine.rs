//! Vote casting and resolution.

use crate::error::VotingError;
use jury_types::{
    Dispute, DisputeOutcome, DomainEvent, ParticipantId, ResolutionPath, Timestamp, TokenAmount,
};
use serde::{Deserialize, Serialize};

/// Snapshot of a dispute's weighted vote totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub disputant_votes: TokenAmount,
    pub defendant_votes: TokenAmount,
    /// Frozen weight of jurors who have not voted yet.
    pub outstanding: TokenAmount,
    pub disputant_won: bool,
}

pub struct VotingEngine;

impl VotingEngine {
    /// Check that `voter` may vote on `dispute` and return their frozen weight.
    pub fn check_vote(
        &self,
        dispute: &Dispute,
        voter: &ParticipantId,
    ) -> Result<TokenAmount, VotingError> {
        if dispute.resolved {
            return Err(VotingError::DisputeResolved(dispute.id));
        }
        let weight = dispute
            .weight_of(voter)
            .ok_or_else(|| VotingError::NotAJuror {
                dispute: dispute.id,
                voter: voter.clone(),
            })?;
        if dispute.has_voted(voter) {
            return Err(VotingError::AlreadyVoted {
                dispute: dispute.id,
                voter: voter.clone(),
            });
        }
        Ok(weight)
    }

    /// Record a juror's vote, weighted by their selection-time stake.
    pub fn cast_vote(
        &self,
        dispute: &mut Dispute,
        voter: &ParticipantId,
        for_disputant: bool,
    ) -> Result<DomainEvent, VotingError> {
        let weight = self.check_vote(dispute, voter)?;

        let (disputant_votes, defendant_votes) = if for_disputant {
            (dispute.disputant_votes.checked_add(weight), Some(dispute.defendant_votes))
        } else {
            (Some(dispute.disputant_votes), dispute.defendant_votes.checked_add(weight))
        };
        let (Some(disputant_votes), Some(defendant_votes)) = (disputant_votes, defendant_votes)
        else {
            return Err(VotingError::TallyInvariant {
                dispute: dispute.id,
                reason: "vote total overflow".into(),
            });
        };

        let cast = disputant_votes.checked_add(defendant_votes);
        let total = dispute.total_juror_weight();
        if !matches!((cast, total), (Some(c), Some(t)) if c <= t) {
            return Err(VotingError::TallyInvariant {
                dispute: dispute.id,
                reason: "votes would exceed frozen juror weight".into(),
            });
        }

        dispute.disputant_votes = disputant_votes;
        dispute.defendant_votes = defendant_votes;
        dispute.votes.insert(voter.clone(), for_disputant);

        tracing::info!(
            dispute = %dispute.id,
            juror = %voter,
            for_disputant,
            weight = weight.raw(),
            "vote cast"
        );

        Ok(DomainEvent::VoteCast {
            dispute_id: dispute.id,
            juror: voter.clone(),
            for_disputant,
            weight,
        })
    }

    pub fn tally(&self, dispute: &Dispute) -> Tally {
        let outstanding = dispute
            .juror_weights
            .iter()
            .filter(|(juror, _)| !dispute.has_voted(juror))
            .map(|(_, w)| *w)
            .fold(TokenAmount::ZERO, |acc, w| acc.saturating_add(w));
        Tally {
            disputant_votes: dispute.disputant_votes,
            defendant_votes: dispute.defendant_votes,
            outstanding,
            disputant_won: dispute.tally_favours_disputant(),
        }
    }

    /// Check that `dispute` may be resolved by tally at `now`.
    pub fn check_resolution(&self, dispute: &Dispute, now: Timestamp) -> Result<(), VotingError> {
        if dispute.resolved {
            return Err(VotingError::AlreadyResolved(dispute.id));
        }
        if !dispute.is_past_deadline(now) {
            return Err(VotingError::DeadlineNotReached {
                deadline: dispute.deadline,
                now,
            });
        }
        Ok(())
    }

    /// Resolve by tally once the deadline has passed.
    pub fn resolve(
        &self,
        dispute: &mut Dispute,
        now: Timestamp,
    ) -> Result<DomainEvent, VotingError> {
        self.check_resolution(dispute, now)?;
        let disputant_won = dispute.tally_favours_disputant();
        Ok(self.commit_outcome(dispute, disputant_won, ResolutionPath::Tally, now))
    }

    /// Force an outcome before the deadline, bypassing the tally.
    ///
    /// Authorisation of `by` is the caller's responsibility.
    pub fn terminate_early(
        &self,
        dispute: &mut Dispute,
        by: &ParticipantId,
        disputant_won: bool,
        now: Timestamp,
    ) -> Result<DomainEvent, VotingError> {
        if dispute.resolved {
            return Err(VotingError::AlreadyResolved(dispute.id));
        }
        tracing::warn!(
            audit = "override",
            dispute = %dispute.id,
            by = %by,
            disputant_won,
            disputant_votes = dispute.disputant_votes.raw(),
            defendant_votes = dispute.defendant_votes.raw(),
            "dispute terminated early"
        );
        let path = ResolutionPath::EarlyTermination { by: by.clone() };
        Ok(self.commit_outcome(dispute, disputant_won, path, now))
    }

    fn commit_outcome(
        &self,
        dispute: &mut Dispute,
        disputant_won: bool,
        path: ResolutionPath,
        now: Timestamp,
    ) -> DomainEvent {
        dispute.resolved = true;
        dispute.outcome = Some(DisputeOutcome {
            disputant_won,
            path: path.clone(),
            resolved_at: now,
        });

        tracing::info!(
            dispute = %dispute.id,
            disputant_won,
            override_path = path.is_override(),
            "dispute resolved"
        );

        DomainEvent::DisputeResolved {
            dispute_id: dispute.id,
            disputant_won,
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jury_types::DisputeId;

    fn p(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    fn amt(n: u128) -> TokenAmount {
        TokenAmount::new(n)
    }

    /// Dispute with jurors j1 (200), j2 (100), j3 (100), deadline at t=1000.
    fn dispute_with_jury() -> Dispute {
        let mut d = Dispute::new(
            DisputeId::new(3),
            p("alice"),
            p("bob"),
            amt(50),
            Timestamp::new(0),
            Timestamp::new(1_000),
            String::new(),
            String::new(),
        );
        d.defendant_verified = true;
        d.verification_complete = true;
        for (j, w) in [("j1", 200), ("j2", 100), ("j3", 100)] {
            d.jurors.push(p(j));
            d.juror_weights.insert(p(j), amt(w));
        }
        d
    }

    #[test]
    fn weighted_majority_for_disputant() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        engine.cast_vote(&mut d, &p("j1"), true).unwrap();
        engine.cast_vote(&mut d, &p("j2"), true).unwrap();
        engine.cast_vote(&mut d, &p("j3"), false).unwrap();
        assert_eq!(d.disputant_votes, amt(300));
        assert_eq!(d.defendant_votes, amt(100));

        let ev = engine.resolve(&mut d, Timestamp::new(1_000)).unwrap();
        assert_eq!(
            ev,
            DomainEvent::DisputeResolved {
                dispute_id: DisputeId::new(3),
                disputant_won: true,
                path: ResolutionPath::Tally
            }
        );
        assert!(d.resolved);
    }

    #[test]
    fn exact_tie_goes_to_defendant() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        engine.cast_vote(&mut d, &p("j1"), true).unwrap();
        engine.cast_vote(&mut d, &p("j2"), false).unwrap();
        engine.cast_vote(&mut d, &p("j3"), false).unwrap();
        assert_eq!(d.disputant_votes, d.defendant_votes);

        engine.resolve(&mut d, Timestamp::new(2_000)).unwrap();
        assert!(!d.outcome.as_ref().unwrap().disputant_won);
    }

    #[test]
    fn no_votes_goes_to_defendant() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        engine.resolve(&mut d, Timestamp::new(1_000)).unwrap();
        assert!(!d.outcome.unwrap().disputant_won);
    }

    #[test]
    fn outsider_and_double_votes_rejected() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        assert_eq!(
            engine.cast_vote(&mut d, &p("alice"), true),
            Err(VotingError::NotAJuror {
                dispute: DisputeId::new(3),
                voter: p("alice")
            })
        );
        engine.cast_vote(&mut d, &p("j2"), false).unwrap();
        assert_eq!(
            engine.cast_vote(&mut d, &p("j2"), true),
            Err(VotingError::AlreadyVoted {
                dispute: DisputeId::new(3),
                voter: p("j2")
            })
        );
        assert_eq!(d.defendant_votes, amt(100));
        assert_eq!(d.disputant_votes, TokenAmount::ZERO);
    }

    #[test]
    fn resolution_before_deadline_rejected() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        assert_eq!(
            engine.resolve(&mut d, Timestamp::new(999)),
            Err(VotingError::DeadlineNotReached {
                deadline: Timestamp::new(1_000),
                now: Timestamp::new(999)
            })
        );
        assert!(!d.resolved);
    }

    #[test]
    fn second_resolution_rejected_and_state_unchanged() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        engine.cast_vote(&mut d, &p("j1"), true).unwrap();
        engine.resolve(&mut d, Timestamp::new(1_000)).unwrap();
        let snapshot = d.clone();

        assert_eq!(
            engine.resolve(&mut d, Timestamp::new(5_000)),
            Err(VotingError::AlreadyResolved(DisputeId::new(3)))
        );
        assert_eq!(d, snapshot);
    }

    #[test]
    fn votes_after_resolution_rejected() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        engine.resolve(&mut d, Timestamp::new(1_000)).unwrap();
        assert_eq!(
            engine.cast_vote(&mut d, &p("j1"), true),
            Err(VotingError::DisputeResolved(DisputeId::new(3)))
        );
    }

    #[test]
    fn early_termination_overrides_tally() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        engine.cast_vote(&mut d, &p("j1"), false).unwrap();

        let ev = engine
            .terminate_early(&mut d, &p("arbiter"), true, Timestamp::new(10))
            .unwrap();
        assert_eq!(
            ev,
            DomainEvent::DisputeResolved {
                dispute_id: DisputeId::new(3),
                disputant_won: true,
                path: ResolutionPath::EarlyTermination { by: p("arbiter") }
            }
        );
        let outcome = d.outcome.as_ref().unwrap();
        assert!(outcome.path.is_override());
        assert_eq!(outcome.resolved_at, Timestamp::new(10));

        assert_eq!(
            engine.terminate_early(&mut d, &p("arbiter"), false, Timestamp::new(11)),
            Err(VotingError::AlreadyResolved(DisputeId::new(3)))
        );
    }

    #[test]
    fn tally_reports_outstanding_weight() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        engine.cast_vote(&mut d, &p("j1"), true).unwrap();
        let t = engine.tally(&d);
        assert_eq!(t.disputant_votes, amt(200));
        assert_eq!(t.outstanding, amt(200));
        assert!(t.disputant_won);
    }

    #[test]
    fn cast_votes_never_exceed_frozen_weight() {
        let engine = VotingEngine;
        let mut d = dispute_with_jury();
        for (j, side) in [("j1", true), ("j2", false), ("j3", true)] {
            engine.cast_vote(&mut d, &p(j), side).unwrap();
            let cast = d.disputant_votes.raw() + d.defendant_votes.raw();
            assert!(cast <= d.total_juror_weight().unwrap().raw());
        }
    }
}
