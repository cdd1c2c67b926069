//! # AuraVault Math
//!
//! Client-side mirror of the vault contracts' fixed-point formulas, used to
//! preview a transaction before the user signs it.
//!
//! ## Formulas
//!
//! ```text
//! peg        = f_model(aura)                               see [`pricing`]
//! supply_cap = base_cap * clamp(1 + 0.75 (aura-100)/100, 0.25, 4)
//! required   = quantity * peg * 15 / (10 * 1e18)
//! fee        = required * 5 / 1000
//! health     = collateral * 100 * 1e18 / (supply * peg)
//! ```
//!
//! All amounts are [`Wad`](auravault_common::Wad) integers; products are
//! taken in 512 bits and divided last. Outputs are previews: the contract's
//! own state, read through `getVaultState`, is authoritative.

pub mod collateral;
pub mod fixed_point;
pub mod liquidation;
pub mod preview;
pub mod pricing;

pub use collateral::{calculate_health, calculate_mint_fee, calculate_required_collateral};
pub use fixed_point::mul_div;
pub use liquidation::{calculate_liquidation, is_liquidatable, LiquidationResult, TARGET_HEALTH};
pub use preview::{
    forced_burn_status, preview_aura_change, preview_liquidation, preview_mint,
    AuraChangePreview, ForcedBurnStatus, LiquidationPreview, MintPreview, MintRejection,
};
pub use pricing::{
    calculate_peg, calculate_supply_cap, supply_cap_multiplier, ExponentialPricing, PricingModel,
};
