//! Juror selection.
//!
//! Candidates are active stakers other than the two parties. Each draw picks a
//! candidate with probability proportional to stake among those not yet
//! chosen. Randomness comes only from a seed derived from public engine state
//! (see [`jury_crypto::selection_seed`]), so any observer holding the
//! [`SelectionRecord`](jury_types::SelectionRecord) can replay the draw.

pub mod error;
pub mod sampler;
pub mod selector;

pub use error::SelectionError;
pub use sampler::weighted_sample;
pub use selector::{audit_selection, JurorSelector};
