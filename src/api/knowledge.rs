use anyhow::{anyhow, Context, Result};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{respond, AppState, Envelope};
use crate::engine::types::Knowledge;
use crate::store::knowledge::{self as store, KnowledgeFilter};

/// Request body for every `/knowledge/*` endpoint. Which fields are required depends
/// on the endpoint.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct KnowledgeParams {
    pub code: Option<i64>,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub classification: Option<i64>,
}

impl KnowledgeParams {
    fn code(&self) -> Result<i64> {
        self.code.ok_or_else(|| anyhow!("code is required"))
    }

    fn name(&self) -> Result<String> {
        self.name.clone().ok_or_else(|| anyhow!("name is required"))
    }
}

pub async fn save(
    State(state): State<AppState>,
    Json(params): Json<KnowledgeParams>,
) -> Json<Envelope> {
    respond(save_entry(&state, params).await)
}

async fn save_entry(state: &AppState, params: KnowledgeParams) -> Result<Envelope> {
    let name = params.name()?;
    let classification = params.classification.unwrap_or(0);
    let code = state
        .with_conn(move |conn| store::save_knowledge(conn, &name, classification))
        .await?;
    Ok(Envelope::with_data(&serde_json::json!({ "code": code })))
}

pub async fn select(
    State(state): State<AppState>,
    Json(params): Json<KnowledgeParams>,
) -> Json<Envelope> {
    respond(select_entry(&state, params).await)
}

async fn select_entry(state: &AppState, params: KnowledgeParams) -> Result<Envelope> {
    let code = params.code()?;
    let found = state
        .with_conn(move |conn| store::select_knowledge(conn, code))
        .await?
        .context("record is not exist")?;
    Ok(Envelope::with_data(&found))
}

pub async fn update(
    State(state): State<AppState>,
    Json(params): Json<KnowledgeParams>,
) -> Json<Envelope> {
    respond(update_entry(&state, params).await)
}

async fn update_entry(state: &AppState, params: KnowledgeParams) -> Result<Envelope> {
    let knowledge = Knowledge {
        code: params.code()?,
        name: params.name()?,
        classification: params.classification.unwrap_or(0),
    };
    state
        .with_conn(move |conn| store::update_knowledge(conn, &knowledge))
        .await?;
    Ok(Envelope::success())
}

pub async fn delete(
    State(state): State<AppState>,
    Json(params): Json<KnowledgeParams>,
) -> Json<Envelope> {
    respond(delete_entry(&state, params).await)
}

async fn delete_entry(state: &AppState, params: KnowledgeParams) -> Result<Envelope> {
    let code = params.code()?;
    state
        .with_conn(move |conn| store::delete_knowledge(conn, code))
        .await?;
    Ok(Envelope::success())
}

pub async fn all(
    State(state): State<AppState>,
    Json(params): Json<KnowledgeParams>,
) -> Json<Envelope> {
    respond(list_entries(&state, params).await)
}

async fn list_entries(state: &AppState, params: KnowledgeParams) -> Result<Envelope> {
    let filter = KnowledgeFilter {
        name: params.name,
        classification: params.classification,
    };
    let rows = state
        .with_conn(move |conn| store::list_knowledge(conn, &filter))
        .await?;
    Ok(Envelope::with_data(&rows))
}
