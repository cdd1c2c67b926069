//! AuraVault API Gateway
//!
//! HTTP surface for the creator-token frontend:
//! - Aura: score a Farcaster account, optionally preparing the oracle update
//! - Pricing: peg and supply cap for an aura under the configured model
//! - Previews: mint, liquidation, oracle update and forced burn against a
//!   vault snapshot read from `getVaultState`

use auravault_common::{
    parse_address, AuraScore, AuraVaultError, Fid, MathError, ScoringError, SocialMetrics,
    SourceError, VaultFinancialState, Wad,
};
use auravault_math::{
    calculate_peg, calculate_supply_cap, forced_burn_status, preview_aura_change,
    preview_liquidation, preview_mint, AuraChangePreview, ForcedBurnStatus, LiquidationPreview,
    MintPreview, PricingModel,
};
use auravault_scorer::{
    compute_breakdown, AuraBreakdown, AuraPipeline, Identity, OracleConfig, ScoreOutcome,
    ScoreRequest,
};
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

// ============ CONFIG ============

#[derive(Debug, Clone)]
struct GatewayConfig {
    host: String,
    port: u16,
    pricing: PricingModel,
}

impl GatewayConfig {
    fn load() -> anyhow::Result<Self> {
        let mut cfg = Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            pricing: PricingModel::default(),
        };

        if let Ok(host) = std::env::var("HOST") {
            cfg.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse::<u16>() {
                cfg.port = p;
            }
        }
        if let Ok(model) = std::env::var("PRICING_MODEL") {
            cfg.pricing = model.parse()?;
        }

        Ok(cfg)
    }
}

// ============ STATE ============

#[derive(Clone)]
struct AppState {
    pipeline: AuraPipeline,
    mock_pipeline: AuraPipeline,
    pricing: PricingModel,
    /// Mock scores never carry a publishable update in production
    production: bool,
}

impl AppState {
    fn new(pipeline: AuraPipeline, pricing: PricingModel, production: bool) -> Self {
        Self {
            pipeline,
            mock_pipeline: AuraPipeline::mock(),
            pricing,
            production,
        }
    }
}

// ============ ERRORS ============

#[derive(Debug, Error)]
enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Domain(#[from] AuraVaultError),
}

impl From<MathError> for ApiError {
    fn from(err: MathError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl From<ScoringError> for ApiError {
    fn from(err: ScoringError) -> Self {
        ApiError::Domain(err.into())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Domain(err) => match err {
                AuraVaultError::InvalidInput(_)
                | AuraVaultError::Scoring(_)
                | AuraVaultError::Math(_) => StatusCode::BAD_REQUEST,
                AuraVaultError::Source(SourceError::NotFound(_)) => StatusCode::NOT_FOUND,
                AuraVaultError::Source(SourceError::MissingCredentials { .. }) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                AuraVaultError::Source(_) => StatusCode::BAD_GATEWAY,
                AuraVaultError::Config(_)
                | AuraVaultError::Serialization(_)
                | AuraVaultError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

// ============ REQUEST TYPES ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateAuraRequest {
    fid: Option<Fid>,
    username: Option<String>,
    vault_address: Option<String>,
    #[serde(default)]
    mock: bool,
}

impl CalculateAuraRequest {
    fn into_score_request(self) -> Result<ScoreRequest, ApiError> {
        let identity = match (self.fid, self.username) {
            (Some(fid), None) => Identity::Fid(fid),
            (None, Some(username)) => Identity::Username(username),
            _ => {
                return Err(ApiError::BadRequest(
                    "provide exactly one of fid or username".to_string(),
                ))
            }
        };

        let vault = self
            .vault_address
            .as_deref()
            .map(parse_address)
            .transpose()?;

        Ok(ScoreRequest { identity, vault })
    }
}

/// Raw metrics as the frontend sends them
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeAuraRequest {
    follower_count: f64,
    #[serde(default)]
    follower_delta: f64,
    avg_likes: f64,
    #[serde(default)]
    is_verified: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingPreviewRequest {
    aura: AuraScore,
    base_cap: Option<Wad>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MintPreviewRequest {
    vault: VaultFinancialState,
    quantity: Wad,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiquidationPreviewRequest {
    vault: VaultFinancialState,
    injected_amount: Wad,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuraChangePreviewRequest {
    vault: VaultFinancialState,
    new_aura: AuraScore,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForcedBurnRequest {
    vault: VaultFinancialState,
    /// Unix seconds, defaults to the server clock
    now: Option<u64>,
}

// ============ RESPONSE TYPES ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculateAuraResponse {
    request_id: String,
    mock: bool,
    #[serde(flatten)]
    outcome: ScoreOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    calldata: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricingPreviewResponse {
    model: &'static str,
    aura: AuraScore,
    peg: Wad,
    min_peg: Wad,
    max_peg: Wad,
    #[serde(skip_serializing_if = "Option::is_none")]
    supply_cap: Option<Wad>,
}

// ============ HANDLERS ============

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "pricingModel": state.pricing.name(),
    }))
}

async fn calculate_aura(
    State(state): State<AppState>,
    Json(req): Json<CalculateAuraRequest>,
) -> Result<Json<CalculateAuraResponse>, ApiError> {
    let mock = req.mock;
    let request = req.into_score_request()?;
    let request_id = uuid::Uuid::now_v7().to_string();

    info!(request_id = %request_id, identity = %request.identity, mock, "Calculating aura");

    let pipeline = if mock {
        &state.mock_pipeline
    } else {
        &state.pipeline
    };
    let mut outcome = pipeline.run(&request).await?;
    if mock && state.production && outcome.update.take().is_some() {
        warn!(request_id = %request_id, "Mock score in production, oracle update withheld");
    }
    let calldata = outcome.update.as_ref().map(|u| u.calldata_hex());

    Ok(Json(CalculateAuraResponse {
        request_id,
        mock,
        outcome,
        calldata,
    }))
}

async fn compute_aura(Json(req): Json<ComputeAuraRequest>) -> Result<Json<AuraBreakdown>, ApiError> {
    let metrics = SocialMetrics::from_raw(
        req.follower_count,
        req.follower_delta,
        req.avg_likes,
        req.is_verified,
    )?;
    Ok(Json(compute_breakdown(&metrics)))
}

async fn preview_pricing(
    State(state): State<AppState>,
    Json(req): Json<PricingPreviewRequest>,
) -> Result<Json<PricingPreviewResponse>, ApiError> {
    let (min_peg, max_peg) = state.pricing.bounds();
    let supply_cap = req
        .base_cap
        .map(|base_cap| calculate_supply_cap(req.aura, base_cap))
        .transpose()?;

    Ok(Json(PricingPreviewResponse {
        model: state.pricing.name(),
        aura: req.aura,
        peg: calculate_peg(&state.pricing, req.aura)?,
        min_peg,
        max_peg,
        supply_cap,
    }))
}

async fn mint_preview(Json(req): Json<MintPreviewRequest>) -> Result<Json<MintPreview>, ApiError> {
    Ok(Json(preview_mint(&req.vault, req.quantity)?))
}

async fn liquidation_preview(
    Json(req): Json<LiquidationPreviewRequest>,
) -> Result<Json<LiquidationPreview>, ApiError> {
    Ok(Json(preview_liquidation(&req.vault, req.injected_amount)?))
}

async fn aura_change_preview(
    State(state): State<AppState>,
    Json(req): Json<AuraChangePreviewRequest>,
) -> Result<Json<AuraChangePreview>, ApiError> {
    Ok(Json(preview_aura_change(&req.vault, &state.pricing, req.new_aura)?))
}

async fn forced_burn_preview(
    Json(req): Json<ForcedBurnRequest>,
) -> Result<Json<ForcedBurnStatus>, ApiError> {
    req.vault.validate()?;
    let now = req
        .now
        .unwrap_or_else(|| Utc::now().timestamp().max(0) as u64);
    Ok(Json(forced_burn_status(&req.vault, now)))
}

// ============ ROUTER ============

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))
        // Aura
        .route("/api/calculate-aura", post(calculate_aura))
        .route("/api/aura/compute", post(compute_aura))
        // Protocol previews
        .route("/api/preview/pricing", post(preview_pricing))
        .route("/api/preview/mint", post(mint_preview))
        .route("/api/preview/liquidation", post(liquidation_preview))
        .route("/api/preview/aura-change", post(aura_change_preview))
        .route("/api/preview/forced-burn", post(forced_burn_preview))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

// ============ MAIN ============

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_gateway=info".parse()?)
                .add_directive("auravault_scorer=info".parse()?),
        )
        .json()
        .init();

    let gateway = GatewayConfig::load()?;
    let oracle = OracleConfig::load()?;

    info!(
        environment = %oracle.environment,
        pricing_model = %gateway.pricing,
        fallback = ?oracle.fallback_policy(),
        "Loaded configuration"
    );

    let state = AppState::new(
        AuraPipeline::from_config(&oracle)?,
        gateway.pricing,
        oracle.is_production(),
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Received shutdown signal");
    };

    let addr = format!("{}:{}", gateway.host, gateway.port);
    info!("AuraVault API Gateway starting on {}", addr);
    info!("Endpoints: /health, /api/calculate-aura, /api/aura/compute, /api/preview/*");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Shutting down API gateway");
    Ok(())
}
