//! AuraScore - creator reputation (0-200)
//!
//! Aura sets a creator token's peg and supply cap. It is pushed on-chain as
//! a `uint256`, so the value is always an integer: the raw weighted score is
//! floored, never rounded, before clamping.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Maximum aura value
pub const MAX_AURA: u8 = 200;

/// Minimum aura value
pub const MIN_AURA: u8 = 0;

/// Neutral reference aura (peg and supply-cap multipliers equal 1.0)
pub const NEUTRAL_AURA: u8 = 100;

/// Integer aura score in `[0, 200]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct AuraScore(u8);

impl AuraScore {
    pub const MIN: AuraScore = AuraScore(MIN_AURA);
    pub const MAX: AuraScore = AuraScore(MAX_AURA);
    pub const NEUTRAL: AuraScore = AuraScore(NEUTRAL_AURA);

    /// Checked constructor
    pub fn new(value: u64) -> Result<Self, ScoringError> {
        if value > MAX_AURA as u64 {
            return Err(ScoringError::OutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    /// Clamp any integer into range
    pub fn saturating(value: u64) -> Self {
        Self(value.min(MAX_AURA as u64) as u8)
    }

    /// Floor a raw weighted score, then clamp to `[0, 200]`
    ///
    /// NaN maps to 0.
    pub fn from_raw_score(raw: f64) -> Self {
        let floored = raw.floor();
        if floored.is_nan() || floored <= 0.0 {
            Self::MIN
        } else if floored >= MAX_AURA as f64 {
            Self::MAX
        } else {
            Self(floored as u8)
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u64> for AuraScore {
    type Error = ScoringError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AuraScore> for u64 {
    fn from(score: AuraScore) -> Self {
        score.0 as u64
    }
}

impl std::fmt::Display for AuraScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, MAX_AURA)
    }
}
