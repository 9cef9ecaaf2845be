use jury_types::{DisputeId, ParticipantId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("dispute {0} is not resolved yet")]
    NotResolved(DisputeId),

    #[error("rewards for dispute {0} were already distributed")]
    AlreadyDistributed(DisputeId),

    #[error("{0} has no rewards to claim")]
    NothingToClaim(ParticipantId),

    #[error("reward arithmetic overflow")]
    Overflow,
}
