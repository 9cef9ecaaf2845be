use jury_types::DisputeId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("dispute {0} is already resolved")]
    DisputeResolved(DisputeId),

    #[error("dispute {0} has not completed verification")]
    VerificationIncomplete(DisputeId),

    #[error("jurors for dispute {0} have already been selected")]
    JurorsAlreadySelected(DisputeId),

    #[error("invalid jury size {requested}: must be within 1..={max}")]
    InvalidPoolSize { requested: usize, max: usize },

    #[error("insufficient juror pool: requested {requested}, eligible {available}")]
    InsufficientJurorPool { requested: usize, available: usize },

    #[error("dispute {0} has no selection record to audit")]
    NoSelectionRecord(DisputeId),

    #[error("arithmetic overflow summing candidate weights")]
    Overflow,
}
