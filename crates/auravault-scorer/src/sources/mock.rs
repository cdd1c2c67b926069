//! Fixed collaborators for offline development and demos

use async_trait::async_trait;
use auravault_common::{Fid, SocialMetrics, SourceError};
use tracing::debug;

use super::{EvidenceStore, IdentityResolver, MetricsSource};

/// FID every username resolves to in mock mode
pub const MOCK_FID: Fid = 3;

/// Metrics served in mock mode (scores 132)
pub const MOCK_METRICS: SocialMetrics = SocialMetrics {
    follower_count: 5_000,
    follower_delta: 120,
    avg_likes: 35,
    is_verified: true,
};

/// Prefix marking evidence references that were never pinned
pub const MOCK_EVIDENCE_PREFIX: &str = "mock-";

/// Social graph that answers every query with the same account
#[derive(Debug, Clone)]
pub struct MockSocialGraph {
    fid: Fid,
    metrics: SocialMetrics,
}

impl MockSocialGraph {
    pub fn new(fid: Fid, metrics: SocialMetrics) -> Self {
        Self { fid, metrics }
    }
}

impl Default for MockSocialGraph {
    fn default() -> Self {
        Self::new(MOCK_FID, MOCK_METRICS)
    }
}

#[async_trait]
impl IdentityResolver for MockSocialGraph {
    async fn resolve_username(&self, username: &str) -> Result<Fid, SourceError> {
        debug!(username, fid = self.fid, "Mock username resolution");
        Ok(self.fid)
    }
}

#[async_trait]
impl MetricsSource for MockSocialGraph {
    async fn fetch_metrics(&self, fid: Fid) -> Result<SocialMetrics, SourceError> {
        debug!(fid, "Serving mock metrics");
        Ok(self.metrics)
    }
}

/// Evidence store that hashes instead of pinning
///
/// References are `mock-<blake3 of the payload>`, so identical evidence
/// always yields the same placeholder.
#[derive(Debug, Clone, Default)]
pub struct MockEvidenceStore;

#[async_trait]
impl EvidenceStore for MockEvidenceStore {
    async fn pin_json(&self, name: &str, payload: &serde_json::Value) -> Result<String, SourceError> {
        let bytes = serde_json::to_vec(payload).map_err(|e| SourceError::Decode {
            service: "mock-evidence",
            message: e.to_string(),
        })?;
        let reference = format!("{}{}", MOCK_EVIDENCE_PREFIX, blake3::hash(&bytes).to_hex());
        debug!(name, reference = %reference, "Mock evidence reference");
        Ok(reference)
    }
}
