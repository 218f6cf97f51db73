use anyhow::{anyhow, Result};
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use super::{respond, AppState, Envelope};
use crate::engine::InferenceDriver;

/// Request body for `/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessParams {
    /// `+`-joined input tokens, e.g. `"1+9+12"`.
    #[serde(alias = "tokens")]
    pub rule: String,
    /// Include the per-pass trace in the response.
    #[serde(default)]
    pub trace: bool,
}

pub async fn process(
    State(state): State<AppState>,
    Json(params): Json<ProcessParams>,
) -> Json<Envelope> {
    respond(run_inference(&state, params).await)
}

async fn run_inference(state: &AppState, params: ProcessParams) -> Result<Envelope> {
    let limits = state.config.inference.limits();
    tracing::info!(input = %params.rule, "process called");

    let ProcessParams { rule: input, trace } = params;
    // The connection is locked per collaborator call, not for the whole run.
    let db = Arc::clone(&state.db);
    let run = tokio::task::spawn_blocking(move || {
        InferenceDriver::new(&*db, &*db)
            .with_limits(limits)
            .run(&input)
    })
    .await
    .map_err(|e| anyhow!("inference task failed: {e}"))?;

    Ok(match run {
        Ok(run) if trace => Envelope::with_data(&run),
        Ok(run) => Envelope::with_data(&run.outcome),
        Err(err) => {
            tracing::warn!(error = %err, "inference failed");
            Envelope::failure(err.to_string())
        }
    })
}
