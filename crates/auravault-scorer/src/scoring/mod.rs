//! Aura scoring

pub mod calculator;
pub mod normalize;

pub use calculator::{compute_aura, compute_breakdown, is_spam_pattern, AuraBreakdown};
pub use normalize::{normalize_log, LogRange};
