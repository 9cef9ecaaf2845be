//! Stake ledger: the engine's record of who has staked how much.
//!
//! This crate handles:
//! - Stake / unstake accounting and the global `total_staked` counter
//! - The activity rule `is_active == (amount >= minimum_stake)`
//! - Juror locks that keep a selected juror's stake in place until every
//!   dispute they sit on is resolved
//!
//! Token movement is not handled here; the registry performs the external
//! transfer and only then commits the ledger mutation.

pub mod error;
pub mod ledger;
pub mod stake;

pub use error::StakeError;
pub use ledger::StakeLedger;
pub use stake::Stake;
