//! Vault-level previews for the mint, liquidation and oracle-update flows
//!
//! These combine the raw formulas with a [`VaultFinancialState`] snapshot so
//! the frontend can reject inputs the contract would revert on before the
//! user pays gas.

use auravault_common::{AuraScore, MathError, VaultFinancialState, Wad};
use serde::Serialize;
use tracing::debug;

use crate::collateral::{calculate_health, calculate_mint_fee, calculate_required_collateral};
use crate::liquidation::{calculate_liquidation, is_liquidatable, LiquidationResult, TARGET_HEALTH};
use crate::pricing::{calculate_peg, calculate_supply_cap, PricingModel};

/// Why a mint would revert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MintRejection {
    ZeroQuantity,
    ExceedsSupplyCap { headroom: Wad },
    HealthBelowMinimum { projected: u64, minimum: u64 },
}

/// Cost and effect of minting `quantity` tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintPreview {
    pub quantity: Wad,
    pub required_collateral: Wad,
    pub mint_fee: Wad,
    /// Collateral plus fee, the transaction value
    pub total_cost: Wad,
    pub health_before: u64,
    pub health_after: u64,
    pub supply_after: Wad,
    pub supply_headroom: Wad,
    pub rejections: Vec<MintRejection>,
}

impl MintPreview {
    pub fn is_allowed(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// Preview a fan mint at the vault's current peg
pub fn preview_mint(state: &VaultFinancialState, quantity: Wad) -> Result<MintPreview, MathError> {
    state.validate()?;

    let required_collateral = calculate_required_collateral(quantity, state.peg)?;
    let mint_fee = calculate_mint_fee(required_collateral)?;
    let total_cost = required_collateral
        .checked_add(mint_fee)
        .ok_or(MathError::Overflow)?;

    let collateral_after = state
        .total_collateral
        .checked_add(required_collateral)
        .ok_or(MathError::Overflow)?;
    let supply_after = state
        .total_supply
        .checked_add(quantity)
        .ok_or(MathError::Overflow)?;

    let health_before = calculate_health(state.total_collateral, state.total_supply, state.peg);
    let health_after = calculate_health(collateral_after, supply_after, state.peg);
    let supply_headroom = state.supply_headroom();

    let mut rejections = Vec::new();
    if quantity.is_zero() {
        rejections.push(MintRejection::ZeroQuantity);
    }
    if quantity > supply_headroom {
        rejections.push(MintRejection::ExceedsSupplyCap {
            headroom: supply_headroom,
        });
    }
    if !quantity.is_zero() && health_after < TARGET_HEALTH {
        rejections.push(MintRejection::HealthBelowMinimum {
            projected: health_after,
            minimum: TARGET_HEALTH,
        });
    }

    debug!(
        quantity = %quantity,
        total_cost = %total_cost,
        health_after,
        rejected = !rejections.is_empty(),
        "Mint preview"
    );

    Ok(MintPreview {
        quantity,
        required_collateral,
        mint_fee,
        total_cost,
        health_before,
        health_after,
        supply_after,
        supply_headroom,
        rejections,
    })
}

/// Liquidation preview against a vault snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationPreview {
    pub is_liquidatable: bool,
    pub health_before: u64,
    #[serde(flatten)]
    pub result: LiquidationResult,
}

pub fn preview_liquidation(
    state: &VaultFinancialState,
    injected_amount: Wad,
) -> Result<LiquidationPreview, MathError> {
    state.validate()?;

    let result = calculate_liquidation(
        state.total_collateral,
        state.total_supply,
        state.peg,
        injected_amount,
    )?;

    Ok(LiquidationPreview {
        is_liquidatable: is_liquidatable(state.total_collateral, state.total_supply, state.peg),
        health_before: calculate_health(state.total_collateral, state.total_supply, state.peg),
        result,
    })
}

/// State of a vault's scheduled forced burn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForcedBurnStatus {
    None,
    #[serde(rename_all = "camelCase")]
    Pending { amount: Wad, seconds_remaining: u64 },
    #[serde(rename_all = "camelCase")]
    Overdue { amount: Wad, seconds_overdue: u64 },
}

/// Classify the pending forced burn relative to `now` (unix seconds)
pub fn forced_burn_status(state: &VaultFinancialState, now: u64) -> ForcedBurnStatus {
    if !state.has_pending_forced_burn() {
        return ForcedBurnStatus::None;
    }
    let amount = state.pending_forced_burn;
    if now < state.forced_burn_deadline {
        ForcedBurnStatus::Pending {
            amount,
            seconds_remaining: state.forced_burn_deadline - now,
        }
    } else {
        ForcedBurnStatus::Overdue {
            amount,
            seconds_overdue: now - state.forced_burn_deadline,
        }
    }
}

/// Effect of the oracle pushing a new aura
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuraChangePreview {
    pub current_aura: AuraScore,
    pub new_aura: AuraScore,
    pub current_peg: Wad,
    pub new_peg: Wad,
    pub current_supply_cap: Wad,
    pub new_supply_cap: Wad,
    /// Supply above the new cap, burned after the grace period
    pub forced_burn_required: Wad,
    pub health_at_new_peg: u64,
}

pub fn preview_aura_change(
    state: &VaultFinancialState,
    model: &PricingModel,
    new_aura: AuraScore,
) -> Result<AuraChangePreview, MathError> {
    state.validate()?;

    let new_peg = calculate_peg(model, new_aura)?;
    let new_supply_cap = calculate_supply_cap(new_aura, state.base_cap)?;

    Ok(AuraChangePreview {
        current_aura: state.aura,
        new_aura,
        current_peg: state.peg,
        new_peg,
        current_supply_cap: state.supply_cap,
        new_supply_cap,
        forced_burn_required: state.total_supply.saturating_sub(new_supply_cap),
        health_at_new_peg: calculate_health(state.total_collateral, state.total_supply, new_peg),
    })
}
