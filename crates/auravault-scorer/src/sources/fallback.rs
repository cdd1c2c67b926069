//! Mock substitution for unconfigured collaborators
//!
//! Local development runs without API keys, so a missing credential may be
//! answered from a fallback collaborator. The substitution is always logged
//! at `warn`, and under [`FallbackPolicy::Never`] (production) the
//! credential error propagates instead. Genuine failures (not found,
//! upstream errors) never fall back.

use async_trait::async_trait;
use auravault_common::{Fid, SocialMetrics, SourceError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{EvidenceStore, IdentityResolver, MetricsSource};

/// When a fallback collaborator may stand in for the primary one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Missing credentials are an error
    Never,
    /// Missing credentials switch to the fallback, with a warning
    OnMissingCredentials,
}

/// Primary collaborator with a policy-gated fallback
pub struct Fallback<P, F> {
    primary: P,
    fallback: F,
    policy: FallbackPolicy,
}

impl<P, F> Fallback<P, F> {
    pub fn new(primary: P, fallback: F, policy: FallbackPolicy) -> Self {
        Self {
            primary,
            fallback,
            policy,
        }
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    fn should_fall_back(&self, operation: &'static str, err: &SourceError) -> bool {
        if self.policy == FallbackPolicy::OnMissingCredentials && err.is_missing_credentials() {
            warn!(operation, error = %err, "Credentials missing, substituting mock data");
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl<P: IdentityResolver, F: IdentityResolver> IdentityResolver for Fallback<P, F> {
    async fn resolve_username(&self, username: &str) -> Result<Fid, SourceError> {
        match self.primary.resolve_username(username).await {
            Err(err) if self.should_fall_back("resolve_username", &err) => {
                self.fallback.resolve_username(username).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl<P: MetricsSource, F: MetricsSource> MetricsSource for Fallback<P, F> {
    async fn fetch_metrics(&self, fid: Fid) -> Result<SocialMetrics, SourceError> {
        match self.primary.fetch_metrics(fid).await {
            Err(err) if self.should_fall_back("fetch_metrics", &err) => {
                self.fallback.fetch_metrics(fid).await
            }
            other => other,
        }
    }
}

#[async_trait]
impl<P: EvidenceStore, F: EvidenceStore> EvidenceStore for Fallback<P, F> {
    async fn pin_json(&self, name: &str, payload: &serde_json::Value) -> Result<String, SourceError> {
        match self.primary.pin_json(name, payload).await {
            Err(err) if self.should_fall_back("pin_json", &err) => {
                self.fallback.pin_json(name, payload).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::{MockSocialGraph, MOCK_FID, MOCK_METRICS};

    /// Resolver that always fails with a fixed error
    struct Failing(fn() -> SourceError);

    #[async_trait]
    impl IdentityResolver for Failing {
        async fn resolve_username(&self, _username: &str) -> Result<Fid, SourceError> {
            Err((self.0)())
        }
    }

    #[async_trait]
    impl MetricsSource for Failing {
        async fn fetch_metrics(&self, _fid: Fid) -> Result<SocialMetrics, SourceError> {
            Err((self.0)())
        }
    }

    fn missing() -> SourceError {
        SourceError::MissingCredentials {
            service: "neynar",
            variable: "NEYNAR_API_KEY",
        }
    }

    fn not_found() -> SourceError {
        SourceError::NotFound("username ghost".to_string())
    }

    #[tokio::test]
    async fn test_falls_back_on_missing_credentials() {
        let source = Fallback::new(
            Failing(missing),
            MockSocialGraph::default(),
            FallbackPolicy::OnMissingCredentials,
        );
        assert_eq!(source.resolve_username("dwr").await.unwrap(), MOCK_FID);
        assert_eq!(source.fetch_metrics(1).await.unwrap(), MOCK_METRICS);
    }

    #[tokio::test]
    async fn test_never_policy_propagates() {
        let source = Fallback::new(Failing(missing), MockSocialGraph::default(), FallbackPolicy::Never);
        let err = source.fetch_metrics(1).await.unwrap_err();
        assert!(err.is_missing_credentials());
    }

    #[tokio::test]
    async fn test_not_found_never_falls_back() {
        let source = Fallback::new(
            Failing(not_found),
            MockSocialGraph::default(),
            FallbackPolicy::OnMissingCredentials,
        );
        let err = source.resolve_username("ghost").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}
