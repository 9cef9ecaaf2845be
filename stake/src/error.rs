//! Stake-specific errors.

use jury_types::{DisputeId, ParticipantId, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StakeError {
    #[error("amount must be non-zero")]
    InvalidAmount,

    #[error("insufficient stake: requested {requested}, staked {available}")]
    InsufficientStake {
        requested: TokenAmount,
        available: TokenAmount,
    },

    #[error("{participant} is a juror on unresolved dispute(s) {disputes:?}")]
    ActiveDisputeHeld {
        participant: ParticipantId,
        disputes: Vec<DisputeId>,
    },

    #[error("arithmetic overflow in stake accounting")]
    Overflow,
}
