//! Liquidation sizing
//!
//! A liquidator injects collateral; the vault then burns enough supply to
//! bring health back to 150% and pays the liquidator a 1% bounty on the
//! injected amount.
//!
//! ```text
//! new_collateral   = collateral + injected
//! target_supply    = new_collateral * 1e18 / (peg * 1.5)
//! tokens_to_remove = max(0, supply - target_supply)
//! bounty           = injected / 100
//! ```
//!
//! Results are previews; the contract's own rounding is authoritative.

use auravault_common::{MathError, Wad, U256, WAD};
use serde::Serialize;

use crate::collateral::{calculate_health, COLLATERAL_RATIO_DENOMINATOR, COLLATERAL_RATIO_NUMERATOR};
use crate::fixed_point::mul_div;

/// Health the liquidation restores (and the mint/liquidation threshold)
pub const TARGET_HEALTH: u64 = 150;

/// Bounty denominator (1% of injected collateral)
pub const LIQUIDATION_BOUNTY_DENOMINATOR: u64 = 100;

/// Outcome of a liquidation preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationResult {
    pub tokens_to_remove: Wad,
    pub bounty: Wad,
    pub health_after: u64,
}

/// Size a liquidation that injects `injected_amount` collateral
pub fn calculate_liquidation(
    total_collateral: Wad,
    total_supply: Wad,
    peg: Wad,
    injected_amount: Wad,
) -> Result<LiquidationResult, MathError> {
    let new_collateral = total_collateral
        .checked_add(injected_amount)
        .ok_or(MathError::Overflow)?;

    // peg * 1.5, truncated the same way the contract scales it
    let target_peg = mul_div(
        peg.raw(),
        U256::from(COLLATERAL_RATIO_NUMERATOR),
        U256::from(COLLATERAL_RATIO_DENOMINATOR),
    )?;

    // A zero peg puts no bound on supply
    let tokens_to_remove = if target_peg.is_zero() {
        Wad::ZERO
    } else {
        let target_supply = Wad::from_raw(mul_div(new_collateral.raw(), WAD, target_peg)?);
        total_supply.saturating_sub(target_supply)
    };

    let bounty = Wad::from_raw(injected_amount.raw() / U256::from(LIQUIDATION_BOUNTY_DENOMINATOR));
    let health_after = calculate_health(
        new_collateral,
        total_supply.saturating_sub(tokens_to_remove),
        peg,
    );

    Ok(LiquidationResult {
        tokens_to_remove,
        bounty,
        health_after,
    })
}

/// Whether a vault sits below the liquidation threshold
///
/// Empty vaults report health 0 but have nothing to liquidate.
pub fn is_liquidatable(total_collateral: Wad, total_supply: Wad, peg: Wad) -> bool {
    !total_supply.is_zero()
        && !peg.is_zero()
        && calculate_health(total_collateral, total_supply, peg) < TARGET_HEALTH
}
