//! Token amounts.
//!
//! Amounts are fixed-point integers (u128) to avoid floating-point errors.
//! The smallest unit is 1 raw; one whole token is [`TOKEN_UNIT`] raw.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Raw units per whole token (18 decimals).
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// A quantity of the staking token, in raw units.
///
/// Human-readable formats (TOML, JSON) carry the raw value as a decimal string,
/// since TOML integers stop at `i64`. Binary formats carry the `u128` directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole tokens, scaled by [`TOKEN_UNIT`]. Returns `None` on overflow.
    pub fn from_tokens(tokens: u128) -> Option<Self> {
        tokens.checked_mul(TOKEN_UNIT).map(Self)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// `self × numerator / denominator`, rounded down, without intermediate overflow.
    pub fn mul_div(self, numerator: u128, denominator: u128) -> Option<Self> {
        mul_div_floor(self.0, numerator, denominator).map(Self)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.0.to_string())
        } else {
            serializer.serialize_u128(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = TokenAmount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or decimal string of raw units")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<TokenAmount, E> {
                Ok(TokenAmount(v as u128))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<TokenAmount, E> {
                Ok(TokenAmount(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<TokenAmount, E> {
                u128::try_from(v)
                    .map(TokenAmount)
                    .map_err(|_| E::custom("token amount must not be negative"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TokenAmount, E> {
                v.parse::<u128>()
                    .map(TokenAmount)
                    .map_err(|e| E::custom(format!("invalid token amount {v:?}: {e}")))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_any(AmountVisitor)
        } else {
            deserializer.deserialize_u128(AmountVisitor)
        }
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} raw", self.0)
    }
}

/// Compute `⌊a × b / c⌋` using a 256-bit intermediate product.
///
/// Returns `None` when `c` is zero or the quotient does not fit in a `u128`.
pub fn mul_div_floor(a: u128, b: u128, c: u128) -> Option<u128> {
    if c == 0 {
        return None;
    }
    if let Some(product) = a.checked_mul(b) {
        return Some(product / c);
    }

    let (hi, lo) = widening_mul(a, b);
    if hi >= c {
        return None;
    }

    // Binary long division of the 256-bit (hi, lo) by c. Since hi < c the
    // quotient fits in 128 bits, so only the low half needs to be shifted in.
    let mut rem = hi;
    let mut quotient: u128 = 0;
    for i in (0..128).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | ((lo >> i) & 1);
        if carry == 1 || rem >= c {
            rem = rem.wrapping_sub(c);
            quotient |= 1 << i;
        }
    }
    Some(quotient)
}

fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;
    let (a1, a0) = (a >> 64, a & MASK);
    let (b1, b0) = (b >> 64, b & MASK);

    let p00 = a0 * b0;
    let p01 = a0 * b1;
    let p10 = a1 * b0;
    let p11 = a1 * b1;

    let mid = (p00 >> 64) + (p01 & MASK) + (p10 & MASK);
    let lo = (p00 & MASK) | ((mid & MASK) << 64);
    let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
    (hi, lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_small_values() {
        assert_eq!(mul_div_floor(50, 200, 300), Some(33));
        assert_eq!(mul_div_floor(50, 100, 300), Some(16));
        assert_eq!(mul_div_floor(7, 0, 3), Some(0));
    }

    #[test]
    fn mul_div_zero_denominator_is_none() {
        assert_eq!(mul_div_floor(1, 1, 0), None);
    }

    #[test]
    fn mul_div_survives_wide_products() {
        let reward = 1_000_000 * TOKEN_UNIT;
        let weight = 400_000 * TOKEN_UNIT;
        let total = 1_000_000 * TOKEN_UNIT;
        assert!(reward.checked_mul(weight).is_none());
        assert_eq!(mul_div_floor(reward, weight, total), Some(400_000 * TOKEN_UNIT));
    }

    #[test]
    fn mul_div_max_values() {
        assert_eq!(mul_div_floor(u128::MAX, u128::MAX, u128::MAX), Some(u128::MAX));
        assert_eq!(mul_div_floor(u128::MAX, 2, 1), None);
        assert_eq!(mul_div_floor(u128::MAX, 3, 4), Some(u128::MAX / 4 * 3 + 2));
    }

    #[test]
    fn overflow_surfaces_through_checked_api() {
        let max = TokenAmount::new(u128::MAX);
        assert_eq!(max.checked_add(TokenAmount::new(1)), None);
        assert_eq!(TokenAmount::ZERO.checked_sub(TokenAmount::new(1)), None);
        assert_eq!(max.saturating_add(TokenAmount::new(1)), max);
        assert_eq!(TokenAmount::ZERO.saturating_sub(max), TokenAmount::ZERO);
    }

    #[test]
    fn from_tokens_scales_by_unit() {
        assert_eq!(TokenAmount::from_tokens(2).unwrap().raw(), 2 * TOKEN_UNIT);
        assert!(TokenAmount::from_tokens(u128::MAX).is_none());
    }
}
