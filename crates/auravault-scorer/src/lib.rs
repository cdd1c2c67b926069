//! # AuraVault Scorer
//!
//! Turns a creator's Farcaster engagement into an aura score and the tuple
//! the oracle contract consumes.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────────┐
//! │ resolve  │──▶│  fetch   │──▶│  score   │──▶│   pin    │──▶│ AuraUpdate   │
//! │ username │   │ metrics  │   │ 0..=200  │   │ evidence │   │ + calldata   │
//! └──────────┘   └──────────┘   └──────────┘   └──────────┘   └──────────────┘
//!  IdentityResolver MetricsSource  scoring     EvidenceStore     publish
//! ```
//!
//! Scoring is pure and synchronous. Collaborators are async traits with live
//! (Neynar, Pinata) and mock implementations; [`sources::Fallback`] decides
//! whether a missing credential may be served from the mocks.

pub mod config;
pub mod pipeline;
pub mod publish;
pub mod scoring;
pub mod sources;

pub use config::{Environment, OracleConfig};
pub use pipeline::{AuraPipeline, ScoreOutcome, ScoreRequest};
pub use publish::{AuraUpdate, PUSH_AURA_SIGNATURE};
pub use scoring::{compute_aura, compute_breakdown, normalize_log, AuraBreakdown};
pub use sources::{
    EvidenceStore, Fallback, FallbackPolicy, Identity, IdentityResolver, MetricsSource,
};
