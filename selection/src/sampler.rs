//! Weighted sampling without replacement.

use jury_crypto::draw_value;
use jury_types::{Hash256, ParticipantId, TokenAmount};

/// Draw up to `count` distinct candidates, each draw proportional to the
/// remaining candidates' weights.
///
/// Candidates must be supplied in ascending identifier order. Draw `i` maps
/// `draw_value(seed, i) mod remaining_weight` onto the cumulative weights in
/// that order, so candidates with identical weight are separated by identifier
/// and the result is a pure function of `(candidates, seed, count)`.
/// Zero-weight candidates are never chosen. Returns `None` if the total weight
/// overflows.
pub fn weighted_sample(
    candidates: &[(ParticipantId, TokenAmount)],
    seed: &Hash256,
    count: usize,
) -> Option<Vec<(ParticipantId, TokenAmount)>> {
    let mut remaining: Vec<(ParticipantId, TokenAmount)> = candidates
        .iter()
        .filter(|(_, w)| !w.is_zero())
        .cloned()
        .collect();
    let mut total = remaining
        .iter()
        .try_fold(0u128, |acc, (_, w)| acc.checked_add(w.raw()))?;

    let mut chosen = Vec::with_capacity(count.min(remaining.len()));
    let mut round = 0u64;
    while chosen.len() < count && total > 0 {
        let target = draw_value(seed, round) % total;
        round += 1;

        let mut cumulative = 0u128;
        let mut pick = remaining.len() - 1;
        for (idx, (_, weight)) in remaining.iter().enumerate() {
            cumulative += weight.raw();
            if cumulative > target {
                pick = idx;
                break;
            }
        }

        let (participant, weight) = remaining.remove(pick);
        total -= weight.raw();
        chosen.push((participant, weight));
    }
    Some(chosen)
}
