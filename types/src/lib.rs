//! Fundamental types for the jury arbitration engine.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! participant identifiers, token amounts, timestamps, engine parameters, the dispute
//! record, and the domain events emitted by every mutating operation.

pub mod address;
pub mod amount;
pub mod dispute;
pub mod error;
pub mod event;
pub mod hash;
pub mod params;
pub mod time;

pub use address::ParticipantId;
pub use amount::{mul_div_floor, TokenAmount, TOKEN_UNIT};
pub use dispute::{
    Dispute, DisputeId, DisputeOutcome, DisputePhase, ResolutionPath, SelectionRecord,
};
pub use error::TypesError;
pub use event::{DistributionMode, DomainEvent, EventRecord};
pub use hash::Hash256;
pub use params::ArbitrationParams;
pub use time::{Clock, SystemClock, Timestamp};
