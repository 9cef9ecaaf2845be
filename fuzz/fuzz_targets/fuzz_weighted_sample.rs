#![no_main]

use libfuzzer_sys::fuzz_target;

use jury_selection::weighted_sample;
use jury_types::{Hash256, ParticipantId, TokenAmount};

// Weighted sampling with arbitrary weights and seeds never panics and never
// draws a participant twice or a zero-weight participant at all.
fuzz_target!(|input: ([u8; 32], Vec<u128>, u8)| {
    let (seed, weights, count) = input;
    let candidates: Vec<(ParticipantId, TokenAmount)> = weights
        .iter()
        .enumerate()
        .map(|(i, w)| (ParticipantId::new(format!("c{i:04}")), TokenAmount::new(*w)))
        .collect();

    if let Some(drawn) = weighted_sample(&candidates, &Hash256::new(seed), count as usize) {
        assert!(drawn.len() <= count as usize);
        let mut ids: Vec<&ParticipantId> = drawn.iter().map(|(p, _)| p).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), drawn.len());
        assert!(drawn.iter().all(|(_, w)| !w.is_zero()));
    }
});
