//! Error types for AuraVault
//!
//! Provides a unified error type and domain-specific error variants

use thiserror::Error;

/// Result type alias using AuraVaultError
pub type Result<T> = std::result::Result<T, AuraVaultError>;

/// Unified error type for AuraVault operations
#[derive(Debug, Error)]
pub enum AuraVaultError {
    // Scoring errors
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    // External data source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    // Fixed-point math errors
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    // Request / argument validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Aura scoring errors
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid metric {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Aura score out of range: {0} > 200")]
    OutOfRange(u64),
}

/// Errors reported by identity resolvers, metric sources and evidence stores
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Missing credentials for {service} (set {variable})")]
    MissingCredentials {
        service: &'static str,
        variable: &'static str,
    },

    #[error("{service} request failed: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned an unexpected payload: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

impl SourceError {
    /// Whether this error only means the collaborator is not configured
    pub fn is_missing_credentials(&self) -> bool {
        matches!(self, SourceError::MissingCredentials { .. })
    }
}

/// Fixed-point arithmetic errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MathError {
    #[error("Fixed-point overflow")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Invalid vault state: {0}")]
    InvalidState(String),
}

// Implement From for common external error types
impl From<serde_json::Error> for AuraVaultError {
    fn from(err: serde_json::Error) -> Self {
        AuraVaultError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for AuraVaultError {
    fn from(err: anyhow::Error) -> Self {
        AuraVaultError::Internal(err.to_string())
    }
}
