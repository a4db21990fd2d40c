//! # Storefront API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront API Server                            │
//! │                                                                         │
//! │  Browser ───► HTTP (5000) ───► router ───► storefront-db ───► SQLite   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use storefront_api::{router, AppConfig, AppState};
use storefront_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,storefront=debug,sqlx=warn")),
        )
        .with_target(true)
        .init();

    info!("Starting Storefront API server...");

    let config = AppConfig::load().context("loading configuration")?;
    info!(
        addr = %config.listen_addr(),
        db_url = %config.database_url,
        token_ttl = config.jwt_exp_seconds,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(config.database_url.clone()).max_connections(config.db_max_connections),
    )
    .await
    .context("opening database")?;
    info!("Database ready");

    let state = AppState::new(db.clone(), config);

    let listen_addr = state.config.listen_addr();
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("binding {listen_addr}"))?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
