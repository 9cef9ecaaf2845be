//! Claim commitments.
//!
//! A disputant may bind a dispute to the body of its claim without publishing
//! the body: the commitment is the hex Blake2b-256 digest of the claim bytes.

use crate::hash::blake2b_256;

/// Hex commitment for a claim body.
pub fn commitment_for(claim: &[u8]) -> String {
    hex::encode(blake2b_256(claim))
}

/// Whether `claim` matches a previously published commitment.
///
/// Comparison is case-insensitive on the hex digits.
pub fn verify_commitment(commitment: &str, claim: &[u8]) -> bool {
    commitment.eq_ignore_ascii_case(&commitment_for(claim))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_is_64_hex_chars() {
        let c = commitment_for(b"invoice 42 was never paid");
        assert_eq!(c.len(), 64);
        assert!(c.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn verify_accepts_matching_claim_only() {
        let c = commitment_for(b"claim");
        assert!(verify_commitment(&c, b"claim"));
        assert!(verify_commitment(&c.to_uppercase(), b"claim"));
        assert!(!verify_commitment(&c, b"claim!"));
        assert!(!verify_commitment("not-a-digest", b"claim"));
    }
}
