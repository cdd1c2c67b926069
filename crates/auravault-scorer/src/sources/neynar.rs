//! Neynar (Farcaster) API client
//!
//! Resolves usernames and assembles [`SocialMetrics`] from three endpoints:
//! - `GET /v2/farcaster/user/by_username` for username -> FID
//! - `GET /v2/farcaster/user/bulk` for follower count and verifications
//! - `GET /v2/farcaster/feed/user/casts` for recent likes
//!
//! Neynar does not report follower growth, so the client keeps the last
//! follower count it saw per FID in [`FollowerSnapshots`] and reports the
//! difference. Without a usable earlier snapshot the delta is reported as 0.

use std::time::Duration;

use async_trait::async_trait;
use auravault_common::{Fid, SocialMetrics, SourceError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::snapshots::FollowerSnapshots;
use super::{IdentityResolver, MetricsSource};
use crate::config::NeynarSettings;

const SERVICE: &str = "neynar";
const API_KEY_VARIABLE: &str = "NEYNAR_API_KEY";

/// Neynar HTTP client
pub struct NeynarClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    cast_sample_size: usize,
    follower_snapshots: FollowerSnapshots,
}

#[derive(Debug, Deserialize)]
struct UserByUsernameResponse {
    user: NeynarUser,
}

#[derive(Debug, Deserialize)]
struct BulkUsersResponse {
    #[serde(default)]
    users: Vec<NeynarUser>,
}

#[derive(Debug, Deserialize)]
struct NeynarUser {
    fid: Fid,
    #[serde(default)]
    follower_count: u64,
    #[serde(default)]
    power_badge: bool,
    #[serde(default)]
    verifications: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CastsResponse {
    #[serde(default)]
    casts: Vec<Cast>,
}

#[derive(Debug, Deserialize)]
struct Cast {
    #[serde(default)]
    reactions: Reactions,
}

#[derive(Debug, Default, Deserialize)]
struct Reactions {
    #[serde(default)]
    likes_count: u64,
}

impl NeynarClient {
    pub fn new(settings: &NeynarSettings, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Upstream {
                service: SERVICE,
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cast_sample_size: settings.cast_sample_size,
            follower_snapshots: settings
                .follower_state
                .as_deref()
                .map(FollowerSnapshots::open)
                .unwrap_or_default(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, SourceError> {
        self.api_key
            .as_deref()
            .ok_or(SourceError::MissingCredentials {
                service: SERVICE,
                variable: API_KEY_VARIABLE,
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let api_key = self.api_key()?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .header("x-api-key", api_key)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await
            .map_err(|e| SourceError::Upstream {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(format!("{} {:?}", path, query)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Upstream {
                service: SERVICE,
                message: format!("{} returned {}: {}", path, status, body),
            });
        }

        response.json::<T>().await.map_err(|e| SourceError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })
    }

    /// Record the latest follower count and return the change since the last one
    fn record_followers(&self, fid: Fid, follower_count: u64) -> i64 {
        match self.follower_snapshots.record(fid, follower_count) {
            Some(delta) => delta,
            None => {
                warn!(fid, "No earlier follower snapshot, follower delta unknown and reported as 0");
                0
            }
        }
    }
}

/// Floor of the mean like count, 0 for an empty feed
fn average_likes(casts: &[Cast]) -> u64 {
    if casts.is_empty() {
        return 0;
    }
    let total: u64 = casts.iter().map(|c| c.reactions.likes_count).sum();
    total / casts.len() as u64
}

#[async_trait]
impl IdentityResolver for NeynarClient {
    #[instrument(skip(self))]
    async fn resolve_username(&self, username: &str) -> Result<Fid, SourceError> {
        let response: UserByUsernameResponse = self
            .get_json(
                "/v2/farcaster/user/by_username",
                &[("username", username.to_string())],
            )
            .await
            .map_err(|e| match e {
                SourceError::NotFound(_) => SourceError::NotFound(format!("username {}", username)),
                other => other,
            })?;

        debug!(username, fid = response.user.fid, "Resolved username");
        Ok(response.user.fid)
    }
}

#[async_trait]
impl MetricsSource for NeynarClient {
    #[instrument(skip(self))]
    async fn fetch_metrics(&self, fid: Fid) -> Result<SocialMetrics, SourceError> {
        let users: BulkUsersResponse = self
            .get_json("/v2/farcaster/user/bulk", &[("fids", fid.to_string())])
            .await?;
        let user = users
            .users
            .into_iter()
            .find(|u| u.fid == fid)
            .ok_or_else(|| SourceError::NotFound(format!("fid {}", fid)))?;

        let feed: CastsResponse = self
            .get_json(
                "/v2/farcaster/feed/user/casts",
                &[
                    ("fid", fid.to_string()),
                    ("limit", self.cast_sample_size.to_string()),
                ],
            )
            .await?;

        let metrics = SocialMetrics {
            follower_count: user.follower_count,
            follower_delta: self.record_followers(fid, user.follower_count),
            avg_likes: average_likes(&feed.casts),
            is_verified: user.power_badge || !user.verifications.is_empty(),
        };

        debug!(fid, ?metrics, casts = feed.casts.len(), "Fetched metrics");
        Ok(metrics)
    }
}
