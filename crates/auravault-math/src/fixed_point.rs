//! Integer helpers for wad arithmetic
//!
//! Products are taken in 512 bits so `a * b / c` never truncates before the
//! division, matching Solidity's multiply-then-divide ordering.

use auravault_common::{MathError, U256, U512, WAD};

/// `a * b / denominator` with a 512-bit intermediate, truncating
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    narrow(a.full_mul(b) / U512::from(denominator))
}

/// Fit a 512-bit intermediate back into 256 bits
pub fn narrow(value: U512) -> Result<U256, MathError> {
    U256::try_from(value).map_err(|_| MathError::Overflow)
}

pub fn clamp(value: U256, min: U256, max: U256) -> U256 {
    value.max(min).min(max)
}

/// `1 + slope * (aura - reference) / reference` in wad, floored at zero
///
/// Shared shape of the exponential peg and the supply-cap multiplier.
pub fn aura_multiplier(slope: U256, aura: u8, reference: u8) -> Result<U256, MathError> {
    let reference_u = U256::from(reference);
    if aura >= reference {
        let up = mul_div(slope, U256::from(aura - reference), reference_u)?;
        WAD.checked_add(up).ok_or(MathError::Overflow)
    } else {
        let down = mul_div(slope, U256::from(reference - aura), reference_u)?;
        Ok(WAD.saturating_sub(down))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_keeps_precision() {
        // (2^255 * 4) / 8 overflows a naive 256-bit product
        let big = U256::MAX / U256::from(2u64) + U256::one();
        let result = mul_div(big, U256::from(4u64), U256::from(8u64)).unwrap();
        assert_eq!(result, big / U256::from(2u64));
    }

    #[test]
    fn test_mul_div_truncates() {
        assert_eq!(mul_div(U256::from(10u64), U256::from(1u64), U256::from(3u64)).unwrap(), U256::from(3u64));
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(mul_div(U256::one(), U256::one(), U256::zero()), Err(MathError::DivisionByZero));
        assert_eq!(mul_div(U256::MAX, U256::MAX, U256::one()), Err(MathError::Overflow));
    }

    #[test]
    fn test_aura_multiplier() {
        let half = WAD / U256::from(2u64);
        assert_eq!(aura_multiplier(half, 100, 100).unwrap(), WAD);
        assert_eq!(aura_multiplier(half, 200, 100).unwrap(), WAD + half);
        assert_eq!(aura_multiplier(half, 0, 100).unwrap(), half);
        // Steep slopes floor at zero instead of wrapping
        assert_eq!(aura_multiplier(WAD * U256::from(3u64), 0, 100).unwrap(), U256::zero());
    }
}
