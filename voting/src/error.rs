use jury_types::{DisputeId, ParticipantId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VotingError {
    #[error("{voter} is not a juror on dispute {dispute}")]
    NotAJuror {
        dispute: DisputeId,
        voter: ParticipantId,
    },

    #[error("{voter} has already voted on dispute {dispute}")]
    AlreadyVoted {
        dispute: DisputeId,
        voter: ParticipantId,
    },

    #[error("dispute {0} is already resolved")]
    DisputeResolved(DisputeId),

    #[error("dispute {0} was already resolved")]
    AlreadyResolved(DisputeId),

    #[error("deadline {deadline} not reached (now {now})")]
    DeadlineNotReached { deadline: Timestamp, now: Timestamp },

    #[error("vote tally invariant violated on dispute {dispute}: {reason}")]
    TallyInvariant { dispute: DisputeId, reason: String },
}
