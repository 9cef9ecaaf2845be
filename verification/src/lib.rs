//! Verification gate.
//!
//! Per dispute: `Created → AwaitingVerification → Verified`.
//!
//! The disputant is verified implicitly when the dispute is created. The
//! defendant must acknowledge the dispute before jurors can be drawn; once both
//! flags are set `verification_complete` opens juror selection.

pub mod error;
pub mod gate;

pub use error::VerificationError;
pub use gate::VerificationGate;
