//! External collaborators of the aura oracle
//!
//! - [`IdentityResolver`]: username -> FID
//! - [`MetricsSource`]: FID -> [`SocialMetrics`]
//! - [`EvidenceStore`]: JSON payload -> content reference
//!
//! Live implementations talk to Neynar and Pinata; [`mock`] supplies fixed
//! data for offline development, and [`fallback::Fallback`] decides when a
//! missing credential may be papered over with it.

use std::sync::Arc;

use async_trait::async_trait;
use auravault_common::{Fid, SocialMetrics, SourceError};
use serde::{Deserialize, Serialize};

pub mod fallback;
pub mod mock;
pub mod neynar;
pub mod pinata;
pub mod snapshots;

pub use fallback::{Fallback, FallbackPolicy};
pub use mock::{MockEvidenceStore, MockSocialGraph};
pub use neynar::NeynarClient;
pub use pinata::PinataStore;
pub use snapshots::FollowerSnapshots;

/// Resolves a social username to its numeric ID
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve_username(&self, username: &str) -> Result<Fid, SourceError>;
}

/// Fetches current engagement metrics for an account
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch_metrics(&self, fid: Fid) -> Result<SocialMetrics, SourceError>;
}

/// Content-addressed storage for scoring evidence
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Store `payload` and return its content reference (CID)
    async fn pin_json(&self, name: &str, payload: &serde_json::Value) -> Result<String, SourceError>;
}

#[async_trait]
impl<T: IdentityResolver + ?Sized> IdentityResolver for Arc<T> {
    async fn resolve_username(&self, username: &str) -> Result<Fid, SourceError> {
        (**self).resolve_username(username).await
    }
}

#[async_trait]
impl<T: MetricsSource + ?Sized> MetricsSource for Arc<T> {
    async fn fetch_metrics(&self, fid: Fid) -> Result<SocialMetrics, SourceError> {
        (**self).fetch_metrics(fid).await
    }
}

#[async_trait]
impl<T: EvidenceStore + ?Sized> EvidenceStore for Arc<T> {
    async fn pin_json(&self, name: &str, payload: &serde_json::Value) -> Result<String, SourceError> {
        (**self).pin_json(name, payload).await
    }
}

/// Who to score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    Fid(Fid),
    Username(String),
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identity::Fid(fid) => write!(f, "fid:{}", fid),
            Identity::Username(name) => write!(f, "@{}", name),
        }
    }
}
