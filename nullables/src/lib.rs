//! Nullable infrastructure for deterministic testing.
//!
//! The engine's external collaborators (clock and token ledger) sit behind
//! traits. This crate provides stand-ins that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests and simulations.

pub mod clock;
pub mod ledger;

pub use clock::NullClock;
pub use ledger::{NullLedger, TransferRecord};
