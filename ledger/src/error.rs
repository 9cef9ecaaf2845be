use jury_types::{ParticipantId, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance for {account}: need {needed}, available {available}")]
    InsufficientBalance {
        account: ParticipantId,
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("insufficient allowance from {owner}: need {needed}, approved {approved}")]
    InsufficientAllowance {
        owner: ParticipantId,
        needed: TokenAmount,
        approved: TokenAmount,
    },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}
