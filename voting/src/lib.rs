//! Voting engine: jurors vote with their frozen selection-time weight.
//!
//! Resolution rule: the disputant wins only with strictly more weight than the
//! defendant. An exact tie, including a dispute nobody voted on, leaves the
//! status quo in place and the defendant wins.

pub mod engine;
pub mod error;

pub use engine::{Tally, VotingEngine};
pub use error::VotingError;
