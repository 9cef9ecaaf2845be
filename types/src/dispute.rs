//! The dispute record and its derived lifecycle phase.

use crate::address::ParticipantId;
use crate::amount::TokenAmount;
use crate::hash::Hash256;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dense, monotonically increasing dispute identifier (`0..dispute_count`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DisputeId(u64);

impl DisputeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn to_le_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for DisputeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a dispute reached its outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPath {
    /// Weighted juror tally after the deadline.
    Tally,
    /// Forced by an authorised arbiter, bypassing the tally and deadline.
    EarlyTermination { by: ParticipantId },
}

impl ResolutionPath {
    pub fn is_override(&self) -> bool {
        matches!(self, Self::EarlyTermination { .. })
    }
}

/// The final result of a resolved dispute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeOutcome {
    pub disputant_won: bool,
    pub path: ResolutionPath,
    pub resolved_at: Timestamp,
}

/// Everything needed to re-run a juror draw after the fact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    /// Seed the draw consumed.
    pub seed: Hash256,
    /// Engine sequence height mixed into the seed.
    pub sequence: u64,
    /// Jury size the caller asked for.
    pub requested: usize,
    /// Eligible candidates and their stake, in ascending participant order.
    pub candidates: Vec<(ParticipantId, TokenAmount)>,
}

/// Lifecycle phase derived from the dispute's flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisputePhase {
    /// Waiting for the defendant to acknowledge the dispute.
    AwaitingVerification,
    /// Both parties verified; no jury drawn yet.
    Verified,
    /// Jury drawn; votes are being collected.
    Voting,
    /// Outcome fixed; rewards not yet distributed.
    Resolved,
    /// Outcome fixed and the reward pool has been distributed.
    Settled,
}

/// A dispute between a disputant and a defendant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    pub id: DisputeId,
    pub disputant: ParticipantId,
    pub defendant: ParticipantId,
    /// Amount escrowed at creation for the jurors.
    pub reward: TokenAmount,
    pub created_at: Timestamp,
    pub deadline: Timestamp,
    /// Monotonic: never returns to `false`.
    pub resolved: bool,
    pub disputant_votes: TokenAmount,
    pub defendant_votes: TokenAmount,
    /// Fixed at selection time, in draw order, no duplicates.
    pub jurors: Vec<ParticipantId>,
    /// Stake of each juror frozen at selection time.
    pub juror_weights: BTreeMap<ParticipantId, TokenAmount>,
    /// Votes cast so far: juror → `for_disputant`.
    pub votes: BTreeMap<ParticipantId, bool>,
    pub dispute_reason: String,
    /// Opaque value bound to the claim, checked later against the claim body.
    pub commitment: String,
    pub disputant_verified: bool,
    pub defendant_verified: bool,
    pub verification_complete: bool,
    pub selection: Option<SelectionRecord>,
    pub outcome: Option<DisputeOutcome>,
    pub rewards_distributed: bool,
}

impl Dispute {
    /// A freshly created dispute. The disputant is implicitly verified.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: DisputeId,
        disputant: ParticipantId,
        defendant: ParticipantId,
        reward: TokenAmount,
        created_at: Timestamp,
        deadline: Timestamp,
        dispute_reason: String,
        commitment: String,
    ) -> Self {
        Self {
            id,
            disputant,
            defendant,
            reward,
            created_at,
            deadline,
            resolved: false,
            disputant_votes: TokenAmount::ZERO,
            defendant_votes: TokenAmount::ZERO,
            jurors: Vec::new(),
            juror_weights: BTreeMap::new(),
            votes: BTreeMap::new(),
            dispute_reason,
            commitment,
            disputant_verified: true,
            defendant_verified: false,
            verification_complete: false,
            selection: None,
            outcome: None,
            rewards_distributed: false,
        }
    }

    pub fn phase(&self) -> DisputePhase {
        if self.rewards_distributed {
            DisputePhase::Settled
        } else if self.resolved {
            DisputePhase::Resolved
        } else if !self.jurors.is_empty() {
            DisputePhase::Voting
        } else if self.verification_complete {
            DisputePhase::Verified
        } else {
            DisputePhase::AwaitingVerification
        }
    }

    pub fn is_party(&self, participant: &ParticipantId) -> bool {
        self.disputant == *participant || self.defendant == *participant
    }

    pub fn is_juror(&self, participant: &ParticipantId) -> bool {
        self.juror_weights.contains_key(participant)
    }

    pub fn has_voted(&self, participant: &ParticipantId) -> bool {
        self.votes.contains_key(participant)
    }

    /// Frozen selection-time weight of a juror.
    pub fn weight_of(&self, participant: &ParticipantId) -> Option<TokenAmount> {
        self.juror_weights.get(participant).copied()
    }

    /// Sum of all frozen juror weights. `None` on overflow.
    pub fn total_juror_weight(&self) -> Option<TokenAmount> {
        self.juror_weights
            .values()
            .try_fold(TokenAmount::ZERO, |acc, w| acc.checked_add(*w))
    }

    pub fn is_past_deadline(&self, now: Timestamp) -> bool {
        now >= self.deadline
    }

    /// Winner under the tally rule: strictly more disputant weight wins,
    /// anything else (including an exact tie) keeps the status quo.
    pub fn tally_favours_disputant(&self) -> bool {
        self.disputant_votes > self.defendant_votes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dispute {
        Dispute::new(
            DisputeId::new(0),
            ParticipantId::new("alice"),
            ParticipantId::new("bob"),
            TokenAmount::new(50),
            Timestamp::new(1_000),
            Timestamp::new(2_000),
            "late delivery".into(),
            "c0ffee".into(),
        )
    }

    #[test]
    fn new_dispute_awaits_defendant() {
        let d = sample();
        assert!(d.disputant_verified);
        assert!(!d.defendant_verified);
        assert!(!d.verification_complete);
        assert_eq!(d.phase(), DisputePhase::AwaitingVerification);
    }

    #[test]
    fn phase_follows_flags() {
        let mut d = sample();
        d.verification_complete = true;
        assert_eq!(d.phase(), DisputePhase::Verified);
        d.jurors.push(ParticipantId::new("carol"));
        assert_eq!(d.phase(), DisputePhase::Voting);
        d.resolved = true;
        assert_eq!(d.phase(), DisputePhase::Resolved);
        d.rewards_distributed = true;
        assert_eq!(d.phase(), DisputePhase::Settled);
    }

    #[test]
    fn tie_keeps_status_quo() {
        let mut d = sample();
        d.disputant_votes = TokenAmount::new(200);
        d.defendant_votes = TokenAmount::new(200);
        assert!(!d.tally_favours_disputant());
        d.disputant_votes = TokenAmount::new(201);
        assert!(d.tally_favours_disputant());
    }

    #[test]
    fn deadline_is_inclusive() {
        let d = sample();
        assert!(!d.is_past_deadline(Timestamp::new(1_999)));
        assert!(d.is_past_deadline(Timestamp::new(2_000)));
    }
}
