//! Domain events emitted by successful mutating operations.
//!
//! Events are the engine's public change feed. Folding a dispute's events from
//! genesis reproduces its observable state.

use crate::address::ParticipantId;
use crate::amount::TokenAmount;
use crate::dispute::{DisputeId, ResolutionPath};
use crate::hash::Hash256;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// How a dispute's reward pool was split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionMode {
    /// Split among winning-side jurors in proportion to frozen weight.
    OutcomeWeighted,
    /// Split equally among every juror regardless of vote.
    Even,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainEvent {
    Staked {
        participant: ParticipantId,
        amount: TokenAmount,
        balance: TokenAmount,
    },
    Unstaked {
        participant: ParticipantId,
        amount: TokenAmount,
        balance: TokenAmount,
    },
    DisputeCreated {
        dispute_id: DisputeId,
        disputant: ParticipantId,
        defendant: ParticipantId,
        reward: TokenAmount,
        deadline: Timestamp,
        commitment: String,
    },
    Verified {
        dispute_id: DisputeId,
        defendant: ParticipantId,
    },
    JurorSelected {
        dispute_id: DisputeId,
        juror: ParticipantId,
        weight: TokenAmount,
        seed: Hash256,
    },
    VoteCast {
        dispute_id: DisputeId,
        juror: ParticipantId,
        for_disputant: bool,
        weight: TokenAmount,
    },
    DisputeResolved {
        dispute_id: DisputeId,
        disputant_won: bool,
        path: ResolutionPath,
    },
    RewardsDistributed {
        dispute_id: DisputeId,
        mode: DistributionMode,
        payouts: Vec<(ParticipantId, TokenAmount)>,
        retained: TokenAmount,
    },
    RewardClaimed {
        participant: ParticipantId,
        amount: TokenAmount,
    },
}

impl DomainEvent {
    /// The dispute this event belongs to, if any.
    pub fn dispute_id(&self) -> Option<DisputeId> {
        match self {
            Self::DisputeCreated { dispute_id, .. }
            | Self::Verified { dispute_id, .. }
            | Self::JurorSelected { dispute_id, .. }
            | Self::VoteCast { dispute_id, .. }
            | Self::DisputeResolved { dispute_id, .. }
            | Self::RewardsDistributed { dispute_id, .. } => Some(*dispute_id),
            Self::Staked { .. } | Self::Unstaked { .. } | Self::RewardClaimed { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Staked { .. } => "Staked",
            Self::Unstaked { .. } => "Unstaked",
            Self::DisputeCreated { .. } => "DisputeCreated",
            Self::Verified { .. } => "Verified",
            Self::JurorSelected { .. } => "JurorSelected",
            Self::VoteCast { .. } => "VoteCast",
            Self::DisputeResolved { .. } => "DisputeResolved",
            Self::RewardsDistributed { .. } => "RewardsDistributed",
            Self::RewardClaimed { .. } => "RewardClaimed",
        }
    }
}

/// An event as committed to the journal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Global, gap-free position in the journal starting at 1.
    pub sequence: u64,
    pub at: Timestamp,
    pub event: DomainEvent,
}
