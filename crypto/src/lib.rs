//! Hashing primitives for the jury arbitration engine.
//!
//! - **Blake2b-256** for all digests
//! - Claim commitments: hex digest bound to a dispute at creation time
//! - Selection seeds: pure function of public engine state, so any observer can
//!   recompute a juror draw

pub mod commitment;
pub mod hash;
pub mod seed;

pub use commitment::{commitment_for, verify_commitment};
pub use hash::{blake2b_256, blake2b_256_multi};
pub use seed::{draw_value, selection_seed, SELECTION_DOMAIN};
