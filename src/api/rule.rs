use anyhow::{anyhow, Context, Result};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Deserializer, Serialize};

use super::{respond, AppState, Envelope};
use crate::engine::types::RuleKind;
use crate::store::rules::{self as store, NewRule, RuleFilter};

/// Request body for every `/rule/*` endpoint.
///
/// `kind` takes either the stored integer (`1` = terminal) or the name returned by
/// `/rule/select`, and also accepts the legacy `type` field; `rule` is the `a+b=c`
/// definition.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RuleParams {
    pub code: Option<i64>,
    pub name: Option<String>,
    pub position: Option<i64>,
    #[serde(default, alias = "type", deserialize_with = "kind_from_code_or_name")]
    pub kind: Option<RuleKind>,
    pub rule: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KindValue {
    Code(i64),
    Name(String),
}

fn kind_from_code_or_name<'de, D>(deserializer: D) -> Result<Option<RuleKind>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<KindValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(KindValue::Code(code)) => Ok(Some(RuleKind::from_code(code))),
        Some(KindValue::Name(name)) => name.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Owned fields of a rule write, so they can move onto the blocking pool.
struct RuleFields {
    name: String,
    position: i64,
    kind: RuleKind,
    definition: String,
}

impl RuleFields {
    fn as_new_rule(&self) -> NewRule<'_> {
        NewRule {
            name: &self.name,
            position: self.position,
            kind: self.kind,
            definition: &self.definition,
        }
    }
}

impl RuleParams {
    fn code(&self) -> Result<i64> {
        self.code.ok_or_else(|| anyhow!("code is required"))
    }

    fn fields(&self) -> Result<RuleFields> {
        Ok(RuleFields {
            name: self.name.clone().ok_or_else(|| anyhow!("name is required"))?,
            position: self.position.unwrap_or(0),
            kind: self.kind.unwrap_or(RuleKind::Intermediate),
            definition: self.rule.clone().ok_or_else(|| anyhow!("rule is required"))?,
        })
    }
}

pub async fn save(State(state): State<AppState>, Json(params): Json<RuleParams>) -> Json<Envelope> {
    respond(save_rule(&state, params).await)
}

async fn save_rule(state: &AppState, params: RuleParams) -> Result<Envelope> {
    let fields = params.fields()?;
    let code = state
        .with_conn(move |conn| store::save_rule(conn, &fields.as_new_rule()))
        .await?;
    Ok(Envelope::with_data(&serde_json::json!({ "code": code })))
}

pub async fn select(
    State(state): State<AppState>,
    Json(params): Json<RuleParams>,
) -> Json<Envelope> {
    respond(select_rule(&state, params).await)
}

async fn select_rule(state: &AppState, params: RuleParams) -> Result<Envelope> {
    let code = params.code()?;
    let found = state
        .with_conn(move |conn| store::select_rule(conn, code))
        .await?
        .context("record is not exist")?;
    Ok(Envelope::with_data(&found))
}

pub async fn update(
    State(state): State<AppState>,
    Json(params): Json<RuleParams>,
) -> Json<Envelope> {
    respond(update_rule(&state, params).await)
}

async fn update_rule(state: &AppState, params: RuleParams) -> Result<Envelope> {
    let code = params.code()?;
    let fields = params.fields()?;
    state
        .with_conn(move |conn| store::update_rule(conn, code, &fields.as_new_rule()))
        .await?;
    Ok(Envelope::success())
}

pub async fn delete(
    State(state): State<AppState>,
    Json(params): Json<RuleParams>,
) -> Json<Envelope> {
    respond(delete_rule(&state, params).await)
}

async fn delete_rule(state: &AppState, params: RuleParams) -> Result<Envelope> {
    let code = params.code()?;
    state
        .with_conn(move |conn| store::delete_rule(conn, code))
        .await?;
    Ok(Envelope::success())
}

pub async fn all(State(state): State<AppState>, Json(params): Json<RuleParams>) -> Json<Envelope> {
    respond(list_rules(&state, params).await)
}

async fn list_rules(state: &AppState, params: RuleParams) -> Result<Envelope> {
    let filter = RuleFilter {
        name: params.name,
        kind: params.kind,
    };
    let rows = state
        .with_conn(move |conn| store::list_rules(conn, &filter))
        .await?;
    Ok(Envelope::with_data(&rows))
}
