//! Peg and supply-cap formulas
//!
//! Two peg formulas have been deployed over the vault's lifetime:
//!
//! ```text
//! Linear:       peg = 0.3 + 2.7 * aura / 200                 (0.3 - 3.0)
//! Exponential:  peg = P0 * (1 + k * (aura / A_ref - 1))      clamped to [P_min, P_max]
//!               P0 = 0.001, k = 0.5, A_ref = 100, P_min = 0.0001, P_max = 0.01
//! ```
//!
//! The model is chosen explicitly through configuration so a deployment
//! cannot silently pick up the wrong formula.
//!
//! Supply cap: `cap = base_cap * clamp(1 + 0.75 * (aura - 100) / 100, 0.25, 4)`.

use std::fmt;
use std::str::FromStr;

use auravault_common::{AuraScore, MathError, Wad, U256, WAD};

use crate::fixed_point::{aura_multiplier, clamp, mul_div};

/// 0.3 in wad
pub const LINEAR_MIN_PEG: U256 = U256([300_000_000_000_000_000, 0, 0, 0]);

/// 3.0 in wad
pub const LINEAR_MAX_PEG: U256 = U256([3_000_000_000_000_000_000, 0, 0, 0]);

/// 2.7 in wad, the linear peg's span over the full aura range
const LINEAR_SPAN: U256 = U256([2_700_000_000_000_000_000, 0, 0, 0]);

/// 0.75 in wad
pub const SUPPLY_CAP_SLOPE: U256 = U256([750_000_000_000_000_000, 0, 0, 0]);

/// 0.25 in wad
pub const SUPPLY_CAP_MIN_MULTIPLIER: U256 = U256([250_000_000_000_000_000, 0, 0, 0]);

/// 4.0 in wad
pub const SUPPLY_CAP_MAX_MULTIPLIER: U256 = U256([4_000_000_000_000_000_000, 0, 0, 0]);

/// Parameters of the exponential-sensitivity peg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialPricing {
    /// Peg at the reference aura (P0)
    pub base_price: Wad,
    /// Sensitivity k, in wad
    pub sensitivity: Wad,
    /// A_ref
    pub reference_aura: u8,
    pub min_peg: Wad,
    pub max_peg: Wad,
}

impl Default for ExponentialPricing {
    fn default() -> Self {
        Self {
            base_price: Wad::from_raw(U256::exp10(15)),
            sensitivity: Wad::from_raw(U256::exp10(17) * U256::from(5u64)),
            reference_aura: 100,
            min_peg: Wad::from_raw(U256::exp10(14)),
            max_peg: Wad::from_raw(U256::exp10(16)),
        }
    }
}

/// Peg formula matching a deployed vault version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingModel {
    Linear,
    Exponential(ExponentialPricing),
}

impl Default for PricingModel {
    fn default() -> Self {
        PricingModel::Exponential(ExponentialPricing::default())
    }
}

impl PricingModel {
    pub fn name(&self) -> &'static str {
        match self {
            PricingModel::Linear => "linear",
            PricingModel::Exponential(_) => "exponential",
        }
    }

    /// Inclusive peg bounds for this model
    pub fn bounds(&self) -> (Wad, Wad) {
        match self {
            PricingModel::Linear => (Wad::from_raw(LINEAR_MIN_PEG), Wad::from_raw(LINEAR_MAX_PEG)),
            PricingModel::Exponential(params) => (params.min_peg, params.max_peg),
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PricingModel {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(PricingModel::Linear),
            "exponential" => Ok(PricingModel::default()),
            other => Err(MathError::InvalidState(format!(
                "unknown pricing model {:?} (expected linear or exponential)",
                other
            ))),
        }
    }
}

/// Token peg for an aura under the given pricing model
pub fn calculate_peg(model: &PricingModel, aura: AuraScore) -> Result<Wad, MathError> {
    let peg = match model {
        PricingModel::Linear => {
            let step = mul_div(LINEAR_SPAN, U256::from(aura.value()), U256::from(200u64))?;
            clamp(LINEAR_MIN_PEG + step, LINEAR_MIN_PEG, LINEAR_MAX_PEG)
        }
        PricingModel::Exponential(params) => {
            let multiplier =
                aura_multiplier(params.sensitivity.raw(), aura.value(), params.reference_aura)?;
            let raw = mul_div(params.base_price.raw(), multiplier, WAD)?;
            clamp(raw, params.min_peg.raw(), params.max_peg.raw())
        }
    };
    Ok(Wad::from_raw(peg))
}

/// Supply-cap multiplier in wad, clamped to `[0.25, 4]`
pub fn supply_cap_multiplier(aura: AuraScore) -> Result<U256, MathError> {
    let raw = aura_multiplier(SUPPLY_CAP_SLOPE, aura.value(), auravault_common::NEUTRAL_AURA)?;
    Ok(clamp(raw, SUPPLY_CAP_MIN_MULTIPLIER, SUPPLY_CAP_MAX_MULTIPLIER))
}

/// Aura-adjusted supply cap
pub fn calculate_supply_cap(aura: AuraScore, base_cap: Wad) -> Result<Wad, MathError> {
    let multiplier = supply_cap_multiplier(aura)?;
    mul_div(base_cap.raw(), multiplier, WAD).map(Wad::from_raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn aura(value: u64) -> AuraScore {
        AuraScore::new(value).unwrap()
    }

    fn units(s: &str) -> Wad {
        Wad::from_units_str(s).unwrap()
    }

    #[test]
    fn test_linear_peg_endpoints() {
        let model = PricingModel::Linear;
        assert_eq!(calculate_peg(&model, aura(0)).unwrap(), units("0.3"));
        assert_eq!(calculate_peg(&model, aura(100)).unwrap(), units("1.65"));
        assert_eq!(calculate_peg(&model, aura(200)).unwrap(), units("3"));
    }

    #[test]
    fn test_exponential_peg() {
        let model = PricingModel::default();
        assert_eq!(calculate_peg(&model, aura(100)).unwrap(), units("0.001"));
        assert_eq!(calculate_peg(&model, aura(0)).unwrap(), units("0.0005"));
        assert_eq!(calculate_peg(&model, aura(200)).unwrap(), units("0.0015"));
        assert_eq!(calculate_peg(&model, aura(150)).unwrap(), units("0.00125"));
    }

    #[test]
    fn test_exponential_peg_clamps() {
        let steep = PricingModel::Exponential(ExponentialPricing {
            sensitivity: Wad::from_units(20),
            ..ExponentialPricing::default()
        });
        assert_eq!(calculate_peg(&steep, aura(200)).unwrap(), units("0.01"));
        assert_eq!(calculate_peg(&steep, aura(0)).unwrap(), units("0.0001"));
    }

    #[test]
    fn test_model_from_str() {
        assert_eq!("linear".parse::<PricingModel>().unwrap(), PricingModel::Linear);
        assert_eq!(" Exponential ".parse::<PricingModel>().unwrap(), PricingModel::default());
        assert!("quadratic".parse::<PricingModel>().is_err());
        assert_eq!(PricingModel::default().to_string(), "exponential");
    }

    #[test]
    fn test_supply_cap_neutral_is_identity() {
        let base_cap = Wad::from_raw(U256::from(123_456_789_012_345_678_901u128));
        assert_eq!(calculate_supply_cap(AuraScore::NEUTRAL, base_cap).unwrap(), base_cap);
    }

    #[test]
    fn test_supply_cap_range() {
        let base_cap = Wad::from_units(1_000);
        assert_eq!(calculate_supply_cap(aura(0), base_cap).unwrap(), Wad::from_units(250));
        assert_eq!(calculate_supply_cap(aura(200), base_cap).unwrap(), Wad::from_units(1_750));
        assert_eq!(calculate_supply_cap(aura(120), base_cap).unwrap(), Wad::from_units(1_150));
    }

    proptest! {
        #[test]
        fn prop_peg_within_bounds(value in 0u64..=200, linear in any::<bool>()) {
            let model = if linear { PricingModel::Linear } else { PricingModel::default() };
            let (min, max) = model.bounds();
            let peg = calculate_peg(&model, aura(value)).unwrap();
            prop_assert!(peg >= min && peg <= max);
        }

        #[test]
        fn prop_peg_non_decreasing(value in 0u64..200) {
            for model in [PricingModel::Linear, PricingModel::default()] {
                let lower = calculate_peg(&model, aura(value)).unwrap();
                let higher = calculate_peg(&model, aura(value + 1)).unwrap();
                prop_assert!(higher >= lower);
            }
        }

        #[test]
        fn prop_supply_cap_multiplier_clamped(value in 0u64..=200) {
            let multiplier = supply_cap_multiplier(aura(value)).unwrap();
            prop_assert!(multiplier >= SUPPLY_CAP_MIN_MULTIPLIER);
            prop_assert!(multiplier <= SUPPLY_CAP_MAX_MULTIPLIER);
        }
    }
}
