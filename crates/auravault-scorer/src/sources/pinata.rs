//! Pinata IPFS pinning

use std::time::Duration;

use async_trait::async_trait;
use auravault_common::SourceError;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::EvidenceStore;
use crate::config::PinataSettings;

const SERVICE: &str = "pinata";
const JWT_VARIABLE: &str = "PINATA_JWT";

/// Evidence store backed by Pinata's `pinJSONToIPFS`
pub struct PinataStore {
    http: reqwest::Client,
    jwt: Option<String>,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PinRequest<'a> {
    pinata_content: &'a serde_json::Value,
    pinata_metadata: PinMetadata<'a>,
}

#[derive(Debug, Serialize)]
struct PinMetadata<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

impl PinataStore {
    pub fn new(settings: &PinataSettings, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Upstream {
                service: SERVICE,
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            jwt: settings.jwt.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.jwt.is_some()
    }
}

#[async_trait]
impl EvidenceStore for PinataStore {
    #[instrument(skip(self, payload))]
    async fn pin_json(&self, name: &str, payload: &serde_json::Value) -> Result<String, SourceError> {
        let jwt = self.jwt.as_deref().ok_or(SourceError::MissingCredentials {
            service: SERVICE,
            variable: JWT_VARIABLE,
        })?;

        let request = PinRequest {
            pinata_content: payload,
            pinata_metadata: PinMetadata { name },
        };

        let response = self
            .http
            .post(format!("{}/pinning/pinJSONToIPFS", self.base_url))
            .bearer_auth(jwt)
            .json(&request)
            .send()
            .await
            .map_err(|e| SourceError::Upstream {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Upstream {
                service: SERVICE,
                message: format!("pinJSONToIPFS returned {}: {}", status, body),
            });
        }

        let pinned: PinResponse = response.json().await.map_err(|e| SourceError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })?;

        info!(name, cid = %pinned.ipfs_hash, "Pinned evidence");
        Ok(pinned.ipfs_hash)
    }
}
