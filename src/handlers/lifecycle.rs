use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::messages;

#[derive(Debug, Deserialize)]
pub struct LifecycleTarget {
    /// Entity family: "business" or "contact".
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: String,
}

/// DELETE /api/data/soft
pub async fn soft_delete(
    State(state): State<AppState>,
    Json(body): Json<LifecycleTarget>,
) -> Result<Json<Value>, ApiError> {
    state.lifecycle.soft_delete(&body.kind, &body.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::lifecycle::SOFT_DELETED,
    })))
}

/// PUT /api/data/restore
pub async fn restore(
    State(state): State<AppState>,
    Json(body): Json<LifecycleTarget>,
) -> Result<Json<Value>, ApiError> {
    state.lifecycle.restore(&body.kind, &body.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::lifecycle::RESTORED,
    })))
}

/// DELETE /api/data/purge
pub async fn purge(
    State(state): State<AppState>,
    Json(body): Json<LifecycleTarget>,
) -> Result<Json<Value>, ApiError> {
    state.lifecycle.purge(&body.kind, &body.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::lifecycle::PURGED,
    })))
}

/// DELETE /api/data/purge-all
pub async fn purge_all(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let summary = state.lifecycle.purge_all().await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::lifecycle::PURGED_ALL,
        "purged": summary,
    })))
}
