//! Core types for AuraVault

pub mod address;
pub mod aura_score;
pub mod social_metrics;
pub mod vault_state;
pub mod wad;
