use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::auth::Requester;
use super::error::ApiError;
use super::AppState;
use crate::matching::service;
use crate::profile::ScoredCandidate;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn collaborators(
    State(state): State<AppState>,
    requester: Requester,
) -> Result<Json<Vec<ScoredCandidate>>, ApiError> {
    let ranked =
        service::ranked_collaborators(&state.store, &state.matchmaker, &requester.user_id)
            .await?;
    Ok(Json(ranked))
}

pub async fn search(
    State(state): State<AppState>,
    requester: Requester,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ScoredCandidate>>, ApiError> {
    // Blank queries are rejected, but a valid one is embedded as given.
    let query = params
        .q
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Search query is required.".into()))?;

    let results = service::search_collaborators(
        &state.store,
        &state.matchmaker,
        Some(&requester.user_id),
        query,
    )
    .await?;
    Ok(Json(results))
}
