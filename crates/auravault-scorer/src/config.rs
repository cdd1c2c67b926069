//! Oracle configuration

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::sources::FallbackPolicy;

pub const DEFAULT_NEYNAR_BASE_URL: &str = "https://api.neynar.com";
pub const DEFAULT_PINATA_BASE_URL: &str = "https://api.pinata.cloud";
pub const DEFAULT_CAST_SAMPLE_SIZE: usize = 25;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Aura oracle configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OracleConfig {
    pub environment: Environment,
    pub neynar: NeynarSettings,
    pub pinata: PinataSettings,
    /// Per-request timeout for upstream APIs
    pub http_timeout_secs: u64,
    /// Deployed oracle contract, the `to` of published transactions
    pub oracle_contract: Option<String>,
}

impl OracleConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut cfg = Self {
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            ..Self::default()
        };

        if let Some(env) = var("AURA_ENV") {
            cfg.environment = env.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(val) = var("HTTP_TIMEOUT_SECS") {
            cfg.http_timeout_secs = parse_positive("HTTP_TIMEOUT_SECS", &val)?;
        }
        cfg.oracle_contract = var("AURA_ORACLE_ADDRESS");

        // Neynar
        cfg.neynar.api_key = var("NEYNAR_API_KEY");
        if let Some(url) = var("NEYNAR_BASE_URL") {
            cfg.neynar.base_url = url;
        }
        if let Some(val) = var("NEYNAR_CAST_SAMPLE_SIZE") {
            cfg.neynar.cast_sample_size = parse_positive("NEYNAR_CAST_SAMPLE_SIZE", &val)?;
        }
        cfg.neynar.follower_state = var("AURA_FOLLOWER_STATE").map(PathBuf::from);

        // Pinata
        cfg.pinata.jwt = var("PINATA_JWT");
        if let Some(url) = var("PINATA_BASE_URL") {
            cfg.pinata.base_url = url;
        }

        Ok(cfg)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Production never substitutes mock data
    pub fn fallback_policy(&self) -> FallbackPolicy {
        match self.environment {
            Environment::Production => FallbackPolicy::Never,
            Environment::Development => FallbackPolicy::OnMissingCredentials,
        }
    }

    /// Names of credential variables that are not set
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.neynar.api_key.is_none() {
            missing.push("NEYNAR_API_KEY");
        }
        if self.pinata.jwt.is_none() {
            missing.push("PINATA_JWT");
        }
        missing
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Numeric setting that must be at least 1
fn parse_positive<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr + PartialEq + Default,
    T::Err: fmt::Display,
{
    let parsed: T = value
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{}: {}", name, e))?;
    if parsed == T::default() {
        anyhow::bail!("{} must be greater than zero", name);
    }
    Ok(parsed)
}

/// Neynar API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct NeynarSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Recent casts averaged for the likes metric
    pub cast_sample_size: usize,
    /// JSON file keeping follower snapshots between runs
    pub follower_state: Option<PathBuf>,
}

impl Default for NeynarSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_NEYNAR_BASE_URL.to_string(),
            cast_sample_size: DEFAULT_CAST_SAMPLE_SIZE,
            follower_state: None,
        }
    }
}

impl fmt::Debug for NeynarSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeynarSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("cast_sample_size", &self.cast_sample_size)
            .field("follower_state", &self.follower_state)
            .finish()
    }
}

/// Pinata API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct PinataSettings {
    pub jwt: Option<String>,
    pub base_url: String,
}

impl Default for PinataSettings {
    fn default() -> Self {
        Self {
            jwt: None,
            base_url: DEFAULT_PINATA_BASE_URL.to_string(),
        }
    }
}

impl fmt::Debug for PinataSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinataSettings")
            .field("jwt", &self.jwt.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}
