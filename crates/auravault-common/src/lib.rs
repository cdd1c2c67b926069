//! # AuraVault Common
//!
//! Shared types and errors for the AuraVault creator-token tooling.
//!
//! ## Core Types
//!
//! - [`SocialMetrics`]: engagement snapshot the aura oracle scores
//! - [`AuraScore`]: 0-200 creator reputation, integer and clamped
//! - [`Wad`]: 18-decimal fixed-point amount backed by `U256`
//! - [`VaultFinancialState`]: read-only mirror of the vault's `getVaultState`
//!
//! Amounts never pass through floating point; see [`types::wad`].

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{AuraVaultError, MathError, Result, ScoringError, SourceError};
pub use ethereum_types::{Address, U256, U512};
pub use types::{
    address::{format_address, parse_address},
    aura_score::{AuraScore, MAX_AURA, MIN_AURA, NEUTRAL_AURA},
    social_metrics::{Fid, SocialMetrics},
    vault_state::{VaultFinancialState, MAX_STAGE},
    wad::{Wad, WAD, WAD_DECIMALS},
};

/// AuraVault version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
