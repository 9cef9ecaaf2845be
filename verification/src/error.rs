use jury_types::{DisputeId, ParticipantId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("{caller} is not the defendant of dispute {dispute}")]
    NotDefendant {
        dispute: DisputeId,
        caller: ParticipantId,
    },

    #[error("dispute {0} is already verified by the defendant")]
    AlreadyVerified(DisputeId),

    #[error("dispute {0} is already resolved")]
    DisputeResolved(DisputeId),
}
