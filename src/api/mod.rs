//! HTTP JSON API.
//!
//! Every endpoint answers with an [`Envelope`]: `code` is `"0"` on success and `"-1"`
//! when the request was rejected, with the reason in `message`. Database work runs on
//! the blocking pool against the shared connection.

pub mod knowledge;
pub mod process;
pub mod rule;

use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::config::ChainerConfig;

pub const BASE_PATH: &str = "/api";

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: Arc<ChainerConfig>,
}

impl AppState {
    pub fn new(conn: Connection, config: ChainerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config: Arc::new(config),
        }
    }

    /// Run `f` with the connection locked, on the blocking pool.
    pub async fn with_conn<T, F>(&self, f: F) -> anyhow::Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> anyhow::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = db
                .lock()
                .map_err(|e| anyhow::anyhow!("db lock poisoned: {e}"))?;
            f(&conn)
        })
        .await
        .map_err(|e| anyhow::anyhow!("db task failed: {e}"))?
    }
}

/// Response wrapper shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    pub fn success() -> Self {
        Self {
            code: "0",
            message: "success".into(),
            data: None,
        }
    }

    pub fn with_data<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self {
                data: Some(value),
                ..Self::success()
            },
            Err(e) => Self::failure(format!("serialization failed: {e}")),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: "-1",
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == "0"
    }
}

impl From<anyhow::Error> for Envelope {
    fn from(err: anyhow::Error) -> Self {
        tracing::warn!(error = %format!("{err:#}"), "request rejected");
        Self::failure(err.to_string())
    }
}

/// Collapse a handler result into the envelope.
pub(crate) fn respond(result: anyhow::Result<Envelope>) -> Json<Envelope> {
    Json(result.unwrap_or_else(Envelope::from))
}

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({"message": "Hello World"}))
}

/// All routes under [`BASE_PATH`].
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(root))
        .route("/knowledge/save", post(knowledge::save))
        .route("/knowledge/select", post(knowledge::select))
        .route("/knowledge/update", post(knowledge::update))
        .route("/knowledge/delete", post(knowledge::delete))
        .route("/knowledge/all", post(knowledge::all))
        .route("/rule/save", post(rule::save))
        .route("/rule/select", post(rule::select))
        .route("/rule/update", post(rule::update))
        .route("/rule/delete", post(rule::delete))
        .route("/rule/all", post(rule::all))
        .route("/process", post(process::process))
        .with_state(state);

    Router::new().nest(BASE_PATH, api)
}
