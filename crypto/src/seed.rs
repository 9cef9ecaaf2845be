//! Selection seed derivation.
//!
//! `seed = Blake2b(DOMAIN ‖ dispute_id ‖ sequence ‖ commitment ‖ prior_jurors…)`
//!
//! Every input is public engine state, so the draw can be reproduced after the
//! fact. Draw `i` consumes `Blake2b(seed ‖ i)`.

use crate::hash::blake2b_256_multi;
use jury_types::{DisputeId, Hash256, ParticipantId};

/// Domain separator for juror-selection seeds.
pub const SELECTION_DOMAIN: &[u8] = b"jury-selection-v1";

/// Derive the seed for a dispute's juror draw.
///
/// `prior_jurors` is the jury most recently drawn by the engine (empty for the
/// first draw). Each identifier is length-prefixed so adjacent identifiers
/// cannot be re-split into a colliding list.
pub fn selection_seed(
    dispute_id: DisputeId,
    sequence: u64,
    commitment: &str,
    prior_jurors: &[ParticipantId],
) -> Hash256 {
    let id_bytes = dispute_id.to_le_bytes();
    let seq_bytes = sequence.to_le_bytes();
    let commitment_len = (commitment.len() as u64).to_le_bytes();

    let lens: Vec<[u8; 8]> = prior_jurors
        .iter()
        .map(|j| (j.as_bytes().len() as u64).to_le_bytes())
        .collect();

    let mut parts: Vec<&[u8]> = vec![
        SELECTION_DOMAIN,
        &id_bytes,
        &seq_bytes,
        &commitment_len,
        commitment.as_bytes(),
    ];
    for (juror, len) in prior_jurors.iter().zip(lens.iter()) {
        parts.push(len);
        parts.push(juror.as_bytes());
    }

    Hash256::new(blake2b_256_multi(&parts))
}

/// Uniform 128-bit value for draw number `round` under `seed`.
pub fn draw_value(seed: &Hash256, round: u64) -> u128 {
    let digest = blake2b_256_multi(&[seed.as_bytes(), &round.to_le_bytes()]);
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    u128::from_le_bytes(bytes)
}
