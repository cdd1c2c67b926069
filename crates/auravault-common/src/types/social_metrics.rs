//! SocialMetrics - engagement snapshot used to score a creator
//!
//! Fetched fresh per scoring request and never persisted.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Farcaster ID
pub type Fid = u64;

/// Engagement metrics for one creator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMetrics {
    /// Total followers
    pub follower_count: u64,

    /// Follower change since the previous observation (may be negative)
    pub follower_delta: i64,

    /// Average likes per recent post
    pub avg_likes: u64,

    /// Whether the account carries a verification
    pub is_verified: bool,
}

impl SocialMetrics {
    pub fn new(follower_count: u64, follower_delta: i64, avg_likes: u64, is_verified: bool) -> Self {
        Self {
            follower_count,
            follower_delta,
            avg_likes,
            is_verified,
        }
    }

    /// Validate untyped numeric input (e.g. JSON numbers from an HTTP body)
    ///
    /// Counts must be finite and non-negative; the delta must be finite.
    /// Fractional values are truncated toward zero.
    pub fn from_raw(
        follower_count: f64,
        follower_delta: f64,
        avg_likes: f64,
        is_verified: bool,
    ) -> Result<Self, ScoringError> {
        Ok(Self {
            follower_count: non_negative("followerCount", follower_count)?,
            follower_delta: finite("followerDelta", follower_delta)?,
            avg_likes: non_negative("avgLikes", avg_likes)?,
            is_verified,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<i64, ScoringError> {
    if !value.is_finite() {
        return Err(ScoringError::InvalidInput {
            field,
            reason: format!("{} is not a finite number", value),
        });
    }
    if value.abs() > i64::MAX as f64 {
        return Err(ScoringError::InvalidInput {
            field,
            reason: format!("{} is out of range", value),
        });
    }
    Ok(value.trunc() as i64)
}

fn non_negative(field: &'static str, value: f64) -> Result<u64, ScoringError> {
    let truncated = finite(field, value)?;
    u64::try_from(truncated).map_err(|_| ScoringError::InvalidInput {
        field,
        reason: format!("{} must be non-negative", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_accepts_valid() {
        let metrics = SocialMetrics::from_raw(5000.0, -12.0, 35.7, true).unwrap();
        assert_eq!(metrics, SocialMetrics::new(5000, -12, 35, true));
    }

    #[test]
    fn test_from_raw_rejects_negative_counts() {
        let err = SocialMetrics::from_raw(-1.0, 0.0, 0.0, false).unwrap_err();
        assert!(err.to_string().contains("followerCount"));

        let err = SocialMetrics::from_raw(10.0, 0.0, -3.0, false).unwrap_err();
        assert!(err.to_string().contains("avgLikes"));
    }

    #[test]
    fn test_from_raw_rejects_non_finite() {
        assert!(SocialMetrics::from_raw(f64::NAN, 0.0, 0.0, false).is_err());
        assert!(SocialMetrics::from_raw(10.0, f64::INFINITY, 0.0, false).is_err());
        assert!(SocialMetrics::from_raw(10.0, 0.0, f64::NEG_INFINITY, false).is_err());
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::to_value(SocialMetrics::new(1, 2, 3, false)).unwrap();
        assert_eq!(json["followerCount"], 1);
        assert_eq!(json["followerDelta"], 2);
        assert_eq!(json["avgLikes"], 3);
        assert_eq!(json["isVerified"], false);
    }
}
