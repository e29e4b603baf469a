//! Mokai - Essential Eight compliance tracking service
//!
//! Main entry point for the HTTP server. `--seed` provisions the demo
//! organization and exits.

use std::sync::Arc;

use mokai_api::{router, AppContext};
use mokai_domain::Config;
use mokai_infra::seed::seed_demo_data;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging first so config loading is visible
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,mokai=debug".to_string()),
        )
        .with_target(true)
        .init();

    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env file found"),
    }

    let config = mokai_infra::config::load().unwrap_or_else(|err| {
        warn!(error = %err, "no usable configuration source, using defaults");
        Config::default()
    });

    let ctx = Arc::new(AppContext::new_with_config(config.clone())?);

    if std::env::args().any(|arg| arg == "--seed") {
        let organization = seed_demo_data(&ctx.compliance).await?;
        info!(organization_id = %organization.id, "seed complete");
        return Ok(());
    }

    let app = router(Arc::clone(&ctx));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, db_path = %ctx.db.path().display(), "mokai listening");

    axum::serve(listener, app).await?;

    Ok(())
}
