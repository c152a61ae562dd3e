//! Market Forecast Service - Main Entry Point

use api::{init_logging, run_server, ApiConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== Market Forecast Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Starting LMP forecast API...");

    run_server(ApiConfig::default()).await
}
