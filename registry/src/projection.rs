//! Rebuild a dispute's observable state from its event history.

use std::collections::BTreeMap;

use jury_types::{
    Dispute, DisputeId, DisputePhase, DistributionMode, DomainEvent, ParticipantId,
    ResolutionPath, Timestamp, TokenAmount,
};
use serde::{Deserialize, Serialize};

/// A read model folded from domain events.
///
/// Observers that only see the event feed can reconstruct everything a
/// participant needs to know about a dispute, and re-sync after a gap by
/// replaying from genesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeProjection {
    pub id: DisputeId,
    pub disputant: ParticipantId,
    pub defendant: ParticipantId,
    pub reward: TokenAmount,
    pub deadline: Timestamp,
    pub commitment: String,
    pub defendant_verified: bool,
    /// Jurors in draw order with their frozen weight.
    pub jurors: Vec<(ParticipantId, TokenAmount)>,
    pub votes: BTreeMap<ParticipantId, bool>,
    pub disputant_votes: TokenAmount,
    pub defendant_votes: TokenAmount,
    pub outcome: Option<(bool, ResolutionPath)>,
    pub distribution: Option<DistributionMode>,
}

impl DisputeProjection {
    /// Fold the events of dispute `id`. Events of other disputes are skipped.
    ///
    /// Returns `None` until the `DisputeCreated` event has been seen.
    pub fn replay<'a>(
        id: DisputeId,
        events: impl IntoIterator<Item = &'a DomainEvent>,
    ) -> Option<Self> {
        let mut projection: Option<Self> = None;
        for event in events {
            if event.dispute_id() != Some(id) {
                continue;
            }
            if let Some(p) = projection.as_mut() {
                p.apply(event);
                continue;
            }
            if let DomainEvent::DisputeCreated {
                disputant,
                defendant,
                reward,
                deadline,
                commitment,
                ..
            } = event
            {
                projection = Some(Self {
                    id,
                    disputant: disputant.clone(),
                    defendant: defendant.clone(),
                    reward: *reward,
                    deadline: *deadline,
                    commitment: commitment.clone(),
                    defendant_verified: false,
                    jurors: Vec::new(),
                    votes: BTreeMap::new(),
                    disputant_votes: TokenAmount::ZERO,
                    defendant_votes: TokenAmount::ZERO,
                    outcome: None,
                    distribution: None,
                });
            }
        }
        projection
    }

    fn apply(&mut self, event: &DomainEvent) {
        match event {
            DomainEvent::Verified { .. } => self.defendant_verified = true,
            DomainEvent::JurorSelected { juror, weight, .. } => {
                self.jurors.push((juror.clone(), *weight));
            }
            DomainEvent::VoteCast {
                juror,
                for_disputant,
                weight,
                ..
            } => {
                self.votes.insert(juror.clone(), *for_disputant);
                let side = if *for_disputant {
                    &mut self.disputant_votes
                } else {
                    &mut self.defendant_votes
                };
                *side = side.saturating_add(*weight);
            }
            DomainEvent::DisputeResolved {
                disputant_won,
                path,
                ..
            } => self.outcome = Some((*disputant_won, path.clone())),
            DomainEvent::RewardsDistributed { mode, .. } => self.distribution = Some(*mode),
            _ => {}
        }
    }

    pub fn phase(&self) -> DisputePhase {
        if self.distribution.is_some() {
            DisputePhase::Settled
        } else if self.outcome.is_some() {
            DisputePhase::Resolved
        } else if !self.jurors.is_empty() {
            DisputePhase::Voting
        } else if self.defendant_verified {
            DisputePhase::Verified
        } else {
            DisputePhase::AwaitingVerification
        }
    }

    /// Whether this projection agrees with the authoritative record.
    pub fn matches(&self, dispute: &Dispute) -> bool {
        let jurors_match = self.jurors.len() == dispute.jurors.len()
            && self
                .jurors
                .iter()
                .zip(&dispute.jurors)
                .all(|((p, w), j)| p == j && dispute.weight_of(j) == Some(*w));
        let outcome = dispute
            .outcome
            .as_ref()
            .map(|o| (o.disputant_won, o.path.clone()));

        self.id == dispute.id
            && self.disputant == dispute.disputant
            && self.defendant == dispute.defendant
            && self.reward == dispute.reward
            && self.deadline == dispute.deadline
            && self.commitment == dispute.commitment
            && self.defendant_verified == dispute.defendant_verified
            && jurors_match
            && self.votes == dispute.votes
            && self.disputant_votes == dispute.disputant_votes
            && self.defendant_votes == dispute.defendant_votes
            && self.outcome == outcome
            && self.distribution.is_some() == dispute.rewards_distributed
            && self.phase() == dispute.phase()
    }
}
