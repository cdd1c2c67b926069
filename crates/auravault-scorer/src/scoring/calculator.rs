//! Aura calculation: weighted log-normalized engagement
//!
//! ```text
//! raw  = 0.35 * norm(followers)
//!      + 0.25 * norm(max(1, follower_delta))
//!      + 0.30 * norm(avg_likes)
//!      + verification_bonus                       (0.10 * 200 if verified)
//!      - spam_penalty                             (20 if followers > 10k and likes < 10)
//! aura = clamp(floor(raw), 0, 200)
//! ```
//!
//! The bonus and penalty sit on top of the continuous score rather than
//! inside the normalization so each adjustment stays visible in the
//! breakdown.

use auravault_common::{AuraScore, SocialMetrics, MAX_AURA};
use serde::{Deserialize, Serialize};

use super::normalize::{AVG_LIKES_RANGE, FOLLOWER_DELTA_RANGE, FOLLOWER_RANGE};

/// Accounts above this many followers are checked for spam
pub const SPAM_FOLLOWER_THRESHOLD: u64 = 10_000;

/// ...and flagged when average likes fall below this
pub const SPAM_LIKES_THRESHOLD: u64 = 10;

/// Flat spam penalty in aura points
pub const SPAM_PENALTY: f64 = 20.0;

// Component weights
const FOLLOWERS_WEIGHT: f64 = 0.35;
const FOLLOWER_DELTA_WEIGHT: f64 = 0.25;
const AVG_LIKES_WEIGHT: f64 = 0.30;
const VERIFICATION_WEIGHT: f64 = 0.10;

/// Per-component view of a score, published as evidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuraBreakdown {
    /// Normalized followers (0-200)
    pub followers: f64,
    /// Normalized follower delta (0-200)
    pub follower_delta: f64,
    /// Normalized average likes (0-200)
    pub avg_likes: f64,
    pub verification_bonus: f64,
    pub spam_penalty: f64,
    /// Weighted sum before flooring and clamping
    pub raw_score: f64,
    pub aura: AuraScore,
}

impl AuraBreakdown {
    /// Weighted components without the spam penalty
    pub fn unpenalized_score(&self) -> f64 {
        self.raw_score + self.spam_penalty
    }
}

/// Whether the follower/engagement shape looks like a bot or farm account
pub fn is_spam_pattern(metrics: &SocialMetrics) -> bool {
    metrics.follower_count > SPAM_FOLLOWER_THRESHOLD && metrics.avg_likes < SPAM_LIKES_THRESHOLD
}

/// Score keeping every intermediate
pub fn compute_breakdown(metrics: &SocialMetrics) -> AuraBreakdown {
    let followers = FOLLOWER_RANGE.normalize(metrics.follower_count as f64);
    // Floor at 1 so the logarithm is defined for zero or negative growth
    let follower_delta = FOLLOWER_DELTA_RANGE.normalize(metrics.follower_delta.max(1) as f64);
    let avg_likes = AVG_LIKES_RANGE.normalize(metrics.avg_likes as f64);

    let verification_bonus = if metrics.is_verified {
        VERIFICATION_WEIGHT * MAX_AURA as f64
    } else {
        0.0
    };
    let spam_penalty = if is_spam_pattern(metrics) { SPAM_PENALTY } else { 0.0 };

    let raw_score = FOLLOWERS_WEIGHT * followers
        + FOLLOWER_DELTA_WEIGHT * follower_delta
        + AVG_LIKES_WEIGHT * avg_likes
        + verification_bonus
        - spam_penalty;

    AuraBreakdown {
        followers,
        follower_delta,
        avg_likes,
        verification_bonus,
        spam_penalty,
        raw_score,
        aura: AuraScore::from_raw_score(raw_score),
    }
}

/// Aura for a creator's metrics
pub fn compute_aura(metrics: &SocialMetrics) -> AuraScore {
    compute_breakdown(metrics).aura
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn metrics(followers: u64, delta: i64, likes: u64, verified: bool) -> SocialMetrics {
        SocialMetrics::new(followers, delta, likes, verified)
    }

    #[test]
    fn test_minimum_metrics_score_zero() {
        let breakdown = compute_breakdown(&metrics(10, 1, 1, false));
        assert_eq!(breakdown.followers, 0.0);
        assert_eq!(breakdown.follower_delta, 0.0);
        assert_eq!(breakdown.avg_likes, 0.0);
        assert_eq!(breakdown.aura, AuraScore::MIN);
    }

    #[test]
    fn test_maximum_metrics_score_200() {
        let breakdown = compute_breakdown(&metrics(100_000, 1_000, 1_000, true));
        assert_eq!(breakdown.followers, 200.0);
        assert_eq!(breakdown.follower_delta, 200.0);
        assert_eq!(breakdown.avg_likes, 200.0);
        assert_eq!(breakdown.verification_bonus, 20.0);
        assert_eq!(breakdown.aura, AuraScore::MAX);
    }

    #[test]
    fn test_weights_span_full_scale() {
        let total = FOLLOWERS_WEIGHT + FOLLOWER_DELTA_WEIGHT + AVG_LIKES_WEIGHT + VERIFICATION_WEIGHT;
        assert!((total - 1.0).abs() < 1e-12);

        let breakdown = compute_breakdown(&metrics(100_000, 1_000, 1_000, true));
        assert!((breakdown.raw_score - MAX_AURA as f64).abs() < 1e-9);
    }

    #[test]
    fn test_negative_delta_floored() {
        let shrinking = compute_breakdown(&metrics(5_000, -300, 40, false));
        let flat = compute_breakdown(&metrics(5_000, 1, 40, false));
        assert_eq!(shrinking.follower_delta, 0.0);
        assert_eq!(shrinking.aura, flat.aura);
    }

    #[test]
    fn test_spam_penalty_is_flat_twenty() {
        let spammy = compute_breakdown(&metrics(50_000, 10, 5, false));
        assert_eq!(spammy.spam_penalty, SPAM_PENALTY);
        assert_eq!(
            spammy.aura.value() as f64,
            spammy.unpenalized_score().floor() - SPAM_PENALTY
        );

        let below_threshold = compute_breakdown(&metrics(9_999, 10, 5, false));
        assert_eq!(below_threshold.spam_penalty, 0.0);
    }

    #[test]
    fn test_spam_threshold_edges() {
        assert!(!is_spam_pattern(&metrics(10_000, 0, 0, false)));
        assert!(is_spam_pattern(&metrics(10_001, 0, 9, false)));
        assert!(!is_spam_pattern(&metrics(10_001, 0, 10, false)));
    }

    #[test]
    fn test_floors_instead_of_rounding() {
        let breakdown = compute_breakdown(&metrics(1_000, 10, 10, false));
        // 0.35 * 100 + 0.25 * 66.67 + 0.30 * 66.67 = 71.67
        assert!(breakdown.raw_score > 71.0 && breakdown.raw_score < 72.0);
        assert_eq!(breakdown.aura.value(), 71);
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let json = serde_json::to_value(compute_breakdown(&metrics(1_000, 10, 10, true))).unwrap();
        assert_eq!(json["verificationBonus"], 20.0);
        assert_eq!(json["aura"], 91);
    }

    fn any_metrics() -> impl Strategy<Value = SocialMetrics> {
        (0u64..10_000_000, -10_000i64..100_000, 0u64..1_000_000, any::<bool>())
            .prop_map(|(f, d, l, v)| SocialMetrics::new(f, d, l, v))
    }

    proptest! {
        #[test]
        fn prop_bounded(m in any_metrics()) {
            let aura = compute_aura(&m);
            prop_assert!(aura <= AuraScore::MAX);
        }

        #[test]
        fn prop_verification_never_hurts(m in any_metrics()) {
            let unverified = compute_aura(&SocialMetrics { is_verified: false, ..m });
            let verified = compute_aura(&SocialMetrics { is_verified: true, ..m });
            prop_assert!(verified >= unverified);
        }

        #[test]
        fn prop_monotone_in_followers(m in any_metrics(), extra in 0u64..1_000_000) {
            // Without the spam penalty in play, more followers never lowers aura
            let m = SocialMetrics { avg_likes: m.avg_likes.max(SPAM_LIKES_THRESHOLD), ..m };
            let more = SocialMetrics { follower_count: m.follower_count + extra, ..m };
            prop_assert!(compute_aura(&more) >= compute_aura(&m));
        }

        #[test]
        fn prop_monotone_in_delta(m in any_metrics(), extra in 0i64..100_000) {
            let more = SocialMetrics { follower_delta: m.follower_delta + extra, ..m };
            prop_assert!(compute_aura(&more) >= compute_aura(&m));
        }

        #[test]
        fn prop_monotone_in_likes(m in any_metrics(), extra in 0u64..1_000_000) {
            let more = SocialMetrics { avg_likes: m.avg_likes + extra, ..m };
            prop_assert!(compute_aura(&more) >= compute_aura(&m));
        }
    }
}
