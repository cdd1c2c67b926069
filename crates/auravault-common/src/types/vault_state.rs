//! VaultFinancialState - read-only mirror of the vault's `getVaultState`
//!
//! Snapshots are fetched from the chain by the caller; nothing here mutates
//! them, previews only derive values.

use serde::{Deserialize, Serialize};

use super::aura_score::AuraScore;
use super::wad::Wad;
use crate::error::MathError;

/// Highest unlock stage the vault contract defines
pub const MAX_STAGE: u8 = 4;

/// Snapshot of a creator vault's financial state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultFinancialState {
    /// Collateral staked by the creator
    pub creator_collateral: Wad,

    /// Collateral deposited by fans when minting
    pub fan_collateral: Wad,

    /// creator + fan collateral
    pub total_collateral: Wad,

    /// Outstanding creator tokens
    pub total_supply: Wad,

    /// Current token price in native currency
    pub peg: Wad,

    /// Unlock stage (0-4)
    pub stage: u8,

    /// Aura last pushed by the oracle
    pub aura: AuraScore,

    /// Supply cap at neutral aura
    pub base_cap: Wad,

    /// Aura-adjusted supply cap
    pub supply_cap: Wad,

    /// Tokens scheduled for a forced burn
    pub pending_forced_burn: Wad,

    /// Unix timestamp (seconds) when the pending burn executes, 0 if none
    pub forced_burn_deadline: u64,
}

impl VaultFinancialState {
    /// Reject snapshots no deployed contract could have produced
    pub fn validate(&self) -> Result<(), MathError> {
        if self.stage > MAX_STAGE {
            return Err(MathError::InvalidState(format!(
                "stage {} exceeds maximum {}",
                self.stage, MAX_STAGE
            )));
        }
        Ok(())
    }

    /// Remaining mintable supply under the current cap
    pub fn supply_headroom(&self) -> Wad {
        self.supply_cap.saturating_sub(self.total_supply)
    }

    pub fn has_pending_forced_burn(&self) -> bool {
        !self.pending_forced_burn.is_zero() && self.forced_burn_deadline > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VaultFinancialState {
        VaultFinancialState {
            creator_collateral: Wad::from_units(100),
            fan_collateral: Wad::from_units(50),
            total_collateral: Wad::from_units(150),
            total_supply: Wad::from_units(100),
            peg: Wad::ONE,
            stage: 2,
            aura: AuraScore::NEUTRAL,
            base_cap: Wad::from_units(1_000),
            supply_cap: Wad::from_units(1_000),
            pending_forced_burn: Wad::ZERO,
            forced_burn_deadline: 0,
        }
    }

    #[test]
    fn test_validate_stage() {
        let mut state = sample();
        assert!(state.validate().is_ok());
        state.stage = 5;
        assert!(matches!(state.validate(), Err(MathError::InvalidState(_))));
    }

    #[test]
    fn test_supply_headroom_floors_at_zero() {
        let mut state = sample();
        assert_eq!(state.supply_headroom(), Wad::from_units(900));
        state.supply_cap = Wad::from_units(80);
        assert_eq!(state.supply_headroom(), Wad::ZERO);
    }

    #[test]
    fn test_deserialize_from_frontend_json() {
        let json = r#"{
            "creatorCollateral": "100000000000000000000",
            "fanCollateral": "50000000000000000000",
            "totalCollateral": "150000000000000000000",
            "totalSupply": "100000000000000000000",
            "peg": "1000000000000000000",
            "stage": 1,
            "aura": 120,
            "baseCap": "1000000000000000000000",
            "supplyCap": "1150000000000000000000",
            "pendingForcedBurn": "0",
            "forcedBurnDeadline": 0
        }"#;
        let state: VaultFinancialState = serde_json::from_str(json).unwrap();
        assert_eq!(state.total_collateral, Wad::from_units(150));
        assert_eq!(state.aura.value(), 120);
        assert!(!state.has_pending_forced_burn());
    }
}
