//! Reward distribution: settles a resolved dispute's escrowed reward.
//!
//! Two payout modes share a one-shot guard per dispute:
//! - **Outcome-weighted**: jurors who voted with the winning side split the
//!   reward in proportion to their frozen selection weight.
//! - **Even**: every selected juror gets an equal share regardless of vote.
//!
//! Integer-division remainders (and the whole reward when nobody qualifies)
//! go to the retained pool. Payouts are credited to per-participant balances
//! and leave escrow only through a claim.

pub mod distributor;
pub mod error;

pub use distributor::{Distribution, RewardDistributor};
pub use error::RewardError;
