//! Pipeline integration tests
//!
//! Drives [`AuraPipeline`] end to end with in-process collaborators:
//! - username resolution and unknown users
//! - evidence document contents
//! - publish tuple and calldata
//! - spam-pattern accounts

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use auravault_common::{parse_address, AuraVaultError, Fid, SocialMetrics, SourceError};
use auravault_scorer::sources::{EvidenceStore, Identity, IdentityResolver, MetricsSource};
use auravault_scorer::{compute_aura, AuraPipeline, ScoreRequest, PUSH_AURA_SIGNATURE};

/// Directory of known accounts
struct Directory {
    users: HashMap<String, Fid>,
    metrics: HashMap<Fid, SocialMetrics>,
}

impl Directory {
    fn new() -> Self {
        let mut users = HashMap::new();
        users.insert("alice".to_string(), 101);
        users.insert("farm".to_string(), 202);

        let mut metrics = HashMap::new();
        metrics.insert(101, SocialMetrics::new(1_000, 10, 10, true));
        metrics.insert(202, SocialMetrics::new(50_000, 10, 5, false));

        Self { users, metrics }
    }
}

#[async_trait]
impl IdentityResolver for Directory {
    async fn resolve_username(&self, username: &str) -> Result<Fid, SourceError> {
        self.users
            .get(username)
            .copied()
            .ok_or_else(|| SourceError::NotFound(format!("username {}", username)))
    }
}

#[async_trait]
impl MetricsSource for Directory {
    async fn fetch_metrics(&self, fid: Fid) -> Result<SocialMetrics, SourceError> {
        self.metrics
            .get(&fid)
            .copied()
            .ok_or_else(|| SourceError::NotFound(format!("fid {}", fid)))
    }
}

/// Evidence store that keeps every pinned document
#[derive(Default)]
struct RecordingStore {
    pinned: Mutex<Vec<(String, serde_json::Value)>>,
}

#[async_trait]
impl EvidenceStore for RecordingStore {
    async fn pin_json(&self, name: &str, payload: &serde_json::Value) -> Result<String, SourceError> {
        let mut pinned = self.pinned.lock().unwrap();
        pinned.push((name.to_string(), payload.clone()));
        Ok(format!("bafy-test-{}", pinned.len()))
    }
}

fn pipeline() -> (AuraPipeline, Arc<RecordingStore>) {
    let directory = Arc::new(Directory::new());
    let store = Arc::new(RecordingStore::default());
    let pipeline = AuraPipeline::new(directory.clone(), directory, store.clone());
    (pipeline, store)
}

#[tokio::test]
async fn test_username_to_update() {
    let (pipeline, store) = pipeline();
    let vault = parse_address("0x3333333333333333333333333333333333333333").unwrap();

    let outcome = pipeline
        .run(&ScoreRequest::new(Identity::Username("alice".to_string())).with_vault(vault))
        .await
        .unwrap();

    assert_eq!(outcome.fid, 101);
    // 0.35 * 100 + 0.55 * 66.67 + 20 = 91.67
    assert_eq!(outcome.aura.value(), 91);
    assert_eq!(outcome.evidence_hash, "bafy-test-1");

    let update = outcome.update.unwrap();
    assert_eq!(update.vault, vault);
    assert_eq!(update.aura.value(), 91);
    assert_eq!(update.evidence_hash, "bafy-test-1");
    assert_eq!(
        &update.encode_calldata()[..4],
        &auravault_scorer::publish::function_selector(PUSH_AURA_SIGNATURE)
    );

    let pinned = store.pinned.lock().unwrap();
    assert_eq!(pinned.len(), 1);
    let (name, document) = &pinned[0];
    assert_eq!(name, "aura-fid-101");
    assert_eq!(document["fid"], 101);
    assert_eq!(document["aura"], 91);
    assert_eq!(document["vault"], "0x3333333333333333333333333333333333333333");
    assert_eq!(document["metrics"]["followerCount"], 1_000);
    assert_eq!(document["breakdown"]["verificationBonus"], 20.0);
    assert!(document["computedAt"].is_string());
}

#[tokio::test]
async fn test_unknown_username_is_not_found() {
    let (pipeline, store) = pipeline();

    let err = pipeline
        .run(&ScoreRequest::new(Identity::Username("ghost".to_string())))
        .await
        .unwrap_err();

    assert!(matches!(err, AuraVaultError::Source(SourceError::NotFound(_))));
    assert!(store.pinned.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_spam_account_penalized() {
    let (pipeline, _) = pipeline();

    let outcome = pipeline
        .run(&ScoreRequest::new(Identity::Fid(202)))
        .await
        .unwrap();

    assert_eq!(outcome.breakdown.spam_penalty, 20.0);
    assert_eq!(outcome.aura, compute_aura(&SocialMetrics::new(50_000, 10, 5, false)));
    assert_eq!(outcome.aura.value(), 75);
    assert!(outcome.update.is_none());
}

#[tokio::test]
async fn test_outcome_serializes_for_clients() {
    let (pipeline, _) = pipeline();
    let outcome = pipeline
        .run(&ScoreRequest::new(Identity::Fid(101)))
        .await
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["aura"], 91);
    assert_eq!(json["evidenceHash"], "bafy-test-1");
    assert!(json.get("update").is_none());
}
