//! Resolve -> fetch -> score -> evidence -> publish tuple
//!
//! The oracle CLI and the HTTP gateway both drive this pipeline; they differ
//! only in which collaborators they plug in.

use std::sync::Arc;

use auravault_common::{
    format_address, Address, AuraScore, AuraVaultError, Fid, Result, SocialMetrics,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::OracleConfig;
use crate::publish::AuraUpdate;
use crate::scoring::{compute_breakdown, AuraBreakdown};
use crate::sources::{
    EvidenceStore, Fallback, Identity, IdentityResolver, MetricsSource, MockEvidenceStore,
    MockSocialGraph, NeynarClient, PinataStore,
};

/// Evidence document schema version
pub const EVIDENCE_VERSION: u32 = 1;

/// One scoring run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRequest {
    pub identity: Identity,
    /// Vault to publish for; without one no update tuple is produced
    pub vault: Option<Address>,
}

impl ScoreRequest {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            vault: None,
        }
    }

    pub fn with_vault(mut self, vault: Address) -> Self {
        self.vault = Some(vault);
        self
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreOutcome {
    pub fid: Fid,
    pub metrics: SocialMetrics,
    pub breakdown: AuraBreakdown,
    pub aura: AuraScore,
    pub evidence_hash: String,
    pub computed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<AuraUpdate>,
}

/// Document pinned as scoring evidence
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidencePayload<'a> {
    pub version: u32,
    pub fid: Fid,
    pub metrics: &'a SocialMetrics,
    pub breakdown: &'a AuraBreakdown,
    pub aura: AuraScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault: Option<String>,
    pub computed_at: DateTime<Utc>,
}

/// Aura oracle pipeline
#[derive(Clone)]
pub struct AuraPipeline {
    resolver: Arc<dyn IdentityResolver>,
    metrics: Arc<dyn MetricsSource>,
    evidence: Arc<dyn EvidenceStore>,
}

impl AuraPipeline {
    pub fn new(
        resolver: Arc<dyn IdentityResolver>,
        metrics: Arc<dyn MetricsSource>,
        evidence: Arc<dyn EvidenceStore>,
    ) -> Self {
        Self {
            resolver,
            metrics,
            evidence,
        }
    }

    /// Fixed mock collaborators, no network access
    pub fn mock() -> Self {
        let graph = Arc::new(MockSocialGraph::default());
        Self::new(graph.clone(), graph, Arc::new(MockEvidenceStore))
    }

    /// Neynar and Pinata, each behind the configured fallback policy
    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        let policy = config.fallback_policy();
        let missing = config.missing_credentials();
        if !missing.is_empty() {
            warn!(
                environment = %config.environment,
                ?policy,
                ?missing,
                "Oracle credentials not configured"
            );
        }

        let neynar = Arc::new(NeynarClient::new(&config.neynar, config.http_timeout())?);
        let pinata = PinataStore::new(&config.pinata, config.http_timeout())?;

        let social = Arc::new(Fallback::new(neynar, MockSocialGraph::default(), policy));
        let evidence = Arc::new(Fallback::new(pinata, MockEvidenceStore, policy));

        Ok(Self::new(social.clone(), social, evidence))
    }

    #[instrument(skip(self), fields(identity = %request.identity))]
    pub async fn run(&self, request: &ScoreRequest) -> Result<ScoreOutcome> {
        let fid = self.resolve(&request.identity).await?;
        let metrics = self.metrics.fetch_metrics(fid).await?;

        let breakdown = compute_breakdown(&metrics);
        let aura = breakdown.aura;
        let computed_at = Utc::now();

        let payload = EvidencePayload {
            version: EVIDENCE_VERSION,
            fid,
            metrics: &metrics,
            breakdown: &breakdown,
            aura,
            vault: request.vault.as_ref().map(format_address),
            computed_at,
        };
        let document = serde_json::to_value(&payload)?;
        let evidence_hash = self
            .evidence
            .pin_json(&format!("aura-fid-{}", fid), &document)
            .await?;

        let update = request
            .vault
            .map(|vault| AuraUpdate::new(vault, aura, evidence_hash.clone()));

        info!(
            fid,
            aura = aura.value(),
            raw_score = breakdown.raw_score,
            evidence = %evidence_hash,
            publish = update.is_some(),
            "Aura computed"
        );

        Ok(ScoreOutcome {
            fid,
            metrics,
            breakdown,
            aura,
            evidence_hash,
            computed_at,
            update,
        })
    }

    async fn resolve(&self, identity: &Identity) -> Result<Fid> {
        match identity {
            Identity::Fid(fid) => Ok(*fid),
            Identity::Username(name) => {
                let name = name.trim().trim_start_matches('@');
                if name.is_empty() {
                    return Err(AuraVaultError::InvalidInput(
                        "username must not be empty".to_string(),
                    ));
                }
                Ok(self.resolver.resolve_username(name).await?)
            }
        }
    }
}
