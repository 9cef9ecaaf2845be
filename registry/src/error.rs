use jury_ledger::LedgerError;
use jury_rewards::RewardError;
use jury_selection::SelectionError;
use jury_stake::StakeError;
use jury_types::{DisputeId, ParticipantId, TypesError};
use jury_verification::VerificationError;
use jury_voting::VotingError;
use thiserror::Error;

use crate::journal::JournalError;

/// Coarse classification of every engine failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input. Retrying with corrected arguments can succeed.
    Validation,
    /// The dispute or stake is in the wrong phase for the call.
    State,
    /// The caller is not allowed to perform the action.
    Authorization,
    /// Not enough stake, jurors or rewards.
    Resource,
    /// The token ledger refused a transfer.
    External,
}

#[derive(Debug, Error)]
pub enum ArbitrationError {
    #[error("stake error: {0}")]
    Stake(#[from] StakeError),

    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("voting error: {0}")]
    Voting(#[from] VotingError),

    #[error("reward error: {0}")]
    Reward(#[from] RewardError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("journal error: {0}")]
    Journal(#[from] JournalError),

    #[error("invalid parameter: {0}")]
    Types(#[from] TypesError),

    #[error("dispute {0} not found")]
    DisputeNotFound(DisputeId),

    #[error("amount must be non-zero")]
    InvalidAmount,

    #[error("{0} cannot open a dispute against themselves")]
    SelfDispute(ParticipantId),

    #[error("{caller} is not authorised to {action}")]
    NotAuthorized {
        caller: ParticipantId,
        action: &'static str,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("{0} is the engine's escrow account and cannot act as a participant")]
    EscrowCaller(ParticipantId),

    #[error("engine lock poisoned")]
    Poisoned,
}

impl ArbitrationError {
    pub fn kind(&self) -> ErrorKind {
        use ErrorKind::*;
        match self {
            Self::Stake(e) => match e {
                StakeError::InvalidAmount | StakeError::Overflow => Validation,
                StakeError::InsufficientStake { .. } => Resource,
                StakeError::ActiveDisputeHeld { .. } => State,
            },
            Self::Verification(e) => match e {
                VerificationError::NotDefendant { .. } => Authorization,
                VerificationError::AlreadyVerified(_) | VerificationError::DisputeResolved(_) => {
                    State
                }
            },
            Self::Selection(e) => match e {
                SelectionError::InvalidPoolSize { .. } | SelectionError::Overflow => Validation,
                SelectionError::InsufficientJurorPool { .. } => Resource,
                SelectionError::DisputeResolved(_)
                | SelectionError::VerificationIncomplete(_)
                | SelectionError::JurorsAlreadySelected(_)
                | SelectionError::NoSelectionRecord(_) => State,
            },
            Self::Voting(e) => match e {
                VotingError::NotAJuror { .. } => Authorization,
                VotingError::AlreadyVoted { .. }
                | VotingError::DisputeResolved(_)
                | VotingError::AlreadyResolved(_)
                | VotingError::DeadlineNotReached { .. }
                | VotingError::TallyInvariant { .. } => State,
            },
            Self::Reward(e) => match e {
                RewardError::NotResolved(_) | RewardError::AlreadyDistributed(_) => State,
                RewardError::NothingToClaim(_) => Resource,
                RewardError::Overflow => Validation,
            },
            Self::Ledger(_) => External,
            Self::Journal(_) | Self::Types(_) | Self::Config(_) => Validation,
            Self::DisputeNotFound(_)
            | Self::InvalidAmount
            | Self::SelfDispute(_)
            | Self::EscrowCaller(_) => Validation,
            Self::NotAuthorized { .. } => Authorization,
            Self::Poisoned => State,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jury_types::TokenAmount;

    #[test]
    fn component_errors_map_to_taxonomy() {
        let cases: Vec<(ArbitrationError, ErrorKind)> = vec![
            (StakeError::InvalidAmount.into(), ErrorKind::Validation),
            (
                StakeError::InsufficientStake {
                    requested: TokenAmount::new(2),
                    available: TokenAmount::new(1),
                }
                .into(),
                ErrorKind::Resource,
            ),
            (
                VerificationError::NotDefendant {
                    dispute: DisputeId::new(0),
                    caller: ParticipantId::new("eve"),
                }
                .into(),
                ErrorKind::Authorization,
            ),
            (
                SelectionError::InsufficientJurorPool {
                    requested: 3,
                    available: 1,
                }
                .into(),
                ErrorKind::Resource,
            ),
            (VotingError::AlreadyResolved(DisputeId::new(0)).into(), ErrorKind::State),
            (
                RewardError::NothingToClaim(ParticipantId::new("j")).into(),
                ErrorKind::Resource,
            ),
            (LedgerError::Rejected("down".into()).into(), ErrorKind::External),
            (
                ArbitrationError::EscrowCaller(ParticipantId::new("jury-escrow")),
                ErrorKind::Validation,
            ),
            (ArbitrationError::Poisoned, ErrorKind::State),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }
}
