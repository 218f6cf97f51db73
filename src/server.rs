//! HTTP server startup.
//!
//! [`serve`] opens the database, builds the [`api::router`](crate::api::router), and
//! runs it until ctrl-c.

use anyhow::{Context, Result};

use crate::api::{self, AppState};
use crate::config::ChainerConfig;
use crate::db;

/// Open the database and wrap it in shared handler state.
pub fn setup_state(config: ChainerConfig) -> Result<AppState> {
    let db_path = config.resolved_db_path();
    let conn = db::open_database(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let health = db::check_database_health(&conn)?;
    if !health.malformed_rules.is_empty() {
        tracing::warn!(
            rules = ?health.malformed_rules,
            "stored rules with malformed definitions will be skipped during inference"
        );
    }

    Ok(AppState::new(conn, config))
}

/// Serve the JSON API on the configured host and port.
pub async fn serve(config: ChainerConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    tracing::info!(addr = %bind_addr, "starting chainer API server");

    let state = setup_state(config)?;
    let router = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}{}", api::BASE_PATH);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down API server");
        })
        .await?;

    Ok(())
}
