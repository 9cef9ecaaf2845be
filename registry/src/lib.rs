//! Dispute registry: the arbitration engine's single entry point.
//!
//! [`ArbitrationEngine`] owns every dispute record and sequences calls across
//! the stake ledger, verification gate, juror selector, voting engine and
//! reward distributor. Each mutating operation validates first, then moves
//! tokens through the host's [`TokenLedger`](jury_ledger::TokenLedger), then
//! commits state and journals the emitted events. A failure at any step
//! leaves the engine untouched.

pub mod config;
pub mod engine;
pub mod error;
pub mod journal;
pub mod projection;
pub mod shared;

pub use config::EngineConfig;
pub use engine::ArbitrationEngine;
pub use error::{ArbitrationError, ErrorKind};
pub use journal::{EventJournal, JournalError};
pub use projection::DisputeProjection;
pub use shared::SharedEngine;
