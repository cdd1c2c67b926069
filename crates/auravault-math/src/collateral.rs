//! Collateral, mint fee and health ratio
//!
//! ```text
//! required = quantity * peg * 15 / (10 * 1e18)     (150% of token value)
//! fee      = required * 5 / 1000                   (0.5%)
//! health   = collateral * 100 * 1e18 / (supply * peg)
//! ```

use auravault_common::{MathError, Wad, U256, U512, WAD};

use crate::fixed_point::{mul_div, narrow};

/// Collateral ratio numerator (150% = 15 / 10)
pub const COLLATERAL_RATIO_NUMERATOR: u64 = 15;

/// Collateral ratio denominator
pub const COLLATERAL_RATIO_DENOMINATOR: u64 = 10;

/// Mint fee numerator (0.5% = 5 / 1000)
pub const MINT_FEE_NUMERATOR: u64 = 5;

/// Mint fee denominator
pub const MINT_FEE_DENOMINATOR: u64 = 1_000;

/// Collateral a mint of `quantity` tokens must deposit
pub fn calculate_required_collateral(quantity: Wad, peg: Wad) -> Result<Wad, MathError> {
    let value = quantity.raw().full_mul(peg.raw());
    let scaled = value
        .checked_mul(U512::from(COLLATERAL_RATIO_NUMERATOR))
        .ok_or(MathError::Overflow)?;
    let denominator = U512::from(WAD) * U512::from(COLLATERAL_RATIO_DENOMINATOR);
    narrow(scaled / denominator).map(Wad::from_raw)
}

/// Protocol fee charged on top of the required collateral
pub fn calculate_mint_fee(required_collateral: Wad) -> Result<Wad, MathError> {
    mul_div(
        required_collateral.raw(),
        U256::from(MINT_FEE_NUMERATOR),
        U256::from(MINT_FEE_DENOMINATOR),
    )
    .map(Wad::from_raw)
}

/// Health ratio as a whole percentage (150 means 150%)
///
/// An empty vault (zero supply or zero peg) reports 0, as the contract does.
/// Values beyond `u64::MAX` saturate.
pub fn calculate_health(total_collateral: Wad, total_supply: Wad, peg: Wad) -> u64 {
    if total_supply.is_zero() {
        return 0;
    }
    let denominator = total_supply.raw().full_mul(peg.raw());
    if denominator.is_zero() {
        return 0;
    }
    let numerator = total_collateral.raw().full_mul(WAD * U256::from(100u64));
    let health = numerator / denominator;
    if health > U512::from(u64::MAX) {
        u64::MAX
    } else {
        health.low_u64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_required_collateral_scenario() {
        // 10 tokens at peg 1.0 need 15.0 collateral
        let required = calculate_required_collateral(Wad::from_units(10), Wad::ONE).unwrap();
        assert_eq!(required, Wad::from_units(15));
    }

    #[test]
    fn test_required_collateral_fractional_peg() {
        let peg = Wad::from_units_str("0.001").unwrap();
        let required = calculate_required_collateral(Wad::from_units(1_000), peg).unwrap();
        assert_eq!(required, Wad::from_units_str("1.5").unwrap());
    }

    #[test]
    fn test_required_collateral_truncates_once() {
        // 1 wei at peg 1.0 needs 1.5 wei, truncated to 1
        let required = calculate_required_collateral(Wad::from_raw(U256::one()), Wad::ONE).unwrap();
        assert_eq!(required.raw(), U256::one());
    }

    #[test]
    fn test_mint_fee() {
        let fee = calculate_mint_fee(Wad::from_units(15)).unwrap();
        assert_eq!(fee, Wad::from_units_str("0.075").unwrap());
        assert_eq!(calculate_mint_fee(Wad::ZERO).unwrap(), Wad::ZERO);
    }

    #[test]
    fn test_health_scenario() {
        let health = calculate_health(Wad::from_units(150), Wad::from_units(100), Wad::ONE);
        assert_eq!(health, 150);
    }

    #[test]
    fn test_health_empty_vault() {
        assert_eq!(calculate_health(Wad::from_units(150), Wad::ZERO, Wad::ONE), 0);
        assert_eq!(calculate_health(Wad::from_units(150), Wad::from_units(10), Wad::ZERO), 0);
    }

    #[test]
    fn test_health_saturates() {
        let health = calculate_health(Wad::from_raw(U256::MAX), Wad::from_raw(U256::one()), Wad::from_raw(U256::one()));
        assert_eq!(health, u64::MAX);
    }

    proptest! {
        #[test]
        fn prop_zero_supply_health_is_zero(collateral in any::<u128>(), peg in any::<u128>()) {
            let health = calculate_health(
                Wad::from_raw(U256::from(collateral)),
                Wad::ZERO,
                Wad::from_raw(U256::from(peg)),
            );
            prop_assert_eq!(health, 0);
        }

        #[test]
        fn prop_fee_is_half_percent(required in any::<u128>()) {
            let required = U256::from(required);
            let fee = calculate_mint_fee(Wad::from_raw(required)).unwrap().raw();
            prop_assert_eq!(fee, required * U256::from(5u64) / U256::from(1_000u64));
        }
    }
}
