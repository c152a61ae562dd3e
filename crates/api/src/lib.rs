//! Market Forecast API Server
//!
//! REST API serving LMP predictions from the latest processed market data.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod routes;

pub use error::ApiError;
pub use routes::predict::{PredictionRequest, PredictionResponse};

use feature_engine::FeatureConfig;
use regressor::Forecaster;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address to bind, host and port
    pub bind_addr: String,
    /// Directory holding processed CSV files
    pub processed_dir: PathBuf,
    /// File-name prefix of processed files
    pub processed_prefix: String,
    /// Path of the model coefficient artifact
    pub model_path: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            processed_dir: PathBuf::from("data/processed"),
            processed_prefix: "pjm_processed_".to_string(),
            model_path: PathBuf::from("data/models/lmp_linear.json"),
        }
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Loaded scoring model
    pub forecaster: Forecaster,
    /// Feature pipeline settings used at serve time
    pub feature_config: FeatureConfig,
    /// Server configuration
    pub config: ApiConfig,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state, loading the model artifact up front so a
    /// broken deployment fails at startup instead of on the first request
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let forecaster = Forecaster::load(&config.model_path)?;
        Ok(Self {
            forecaster,
            feature_config: FeatureConfig::default(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        })
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub metrics: SystemMetrics,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub processed_data: ComponentHealth,
    pub model: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub detail: Option<String>,
}

/// System metrics
#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    pub processed_files: usize,
    pub model_features: usize,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/predict", post(routes::predict::predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let files = ingestion::processed_files(
        &state.config.processed_dir,
        &state.config.processed_prefix,
    )
    .unwrap_or_default();
    let processed_data = match files.last().and_then(|p| p.file_name()).and_then(|n| n.to_str()) {
        Some(name) => ComponentHealth {
            status: "ok".to_string(),
            detail: Some(name.to_string()),
        },
        None => ComponentHealth {
            status: "empty".to_string(),
            detail: None,
        },
    };

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            processed_data,
            model: ComponentHealth {
                status: "ok".to_string(),
                detail: Some(format!("{} features", state.forecaster.columns().len())),
            },
        },
        metrics: SystemMetrics {
            processed_files: files.len(),
            model_features: state.forecaster.columns().len(),
        },
    };

    Json(response)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(config: ApiConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config)?);
    let app = create_router(state.clone());

    info!("Starting API server on {}", state.config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
