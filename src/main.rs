use anyhow::Context;
use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use salon_backend::{
    app::create_router,
    app_state::AppState,
    config, db, i18n,
    telemetry::{self, TelemetryConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = config::init().context("Failed to load configuration")?;
    let telemetry = telemetry::init_telemetry(TelemetryConfig::for_app(&config.app))?;

    let store = db::init_store(config).await?;

    let localizer = i18n::init_i18n(config.app.locales_dir.as_deref().map(Path::new))
        .context("Failed to load translations")?;

    let state = AppState::new(store, config.clone(), Arc::new(localizer));
    let app = create_router(state);

    let addr = config.server_addr();
    info!("{} ({:?}) listening on {}", config.app.name, config.app.environment, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Failed to serve application")?;

    telemetry.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
