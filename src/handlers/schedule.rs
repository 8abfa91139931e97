use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::messages;
use crate::middleware::AuthUser;
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleCallsRequest {
    #[serde(default)]
    pub contact_ids: Vec<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduledListQuery {
    pub status: Option<String>,
    pub timeframe: Option<String>,
}

/// POST /api/schedule/calls
pub async fn schedule_calls(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<ScheduleCallsRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let scheduled_date = body
        .scheduled_date
        .ok_or_else(|| ServiceError::validation(messages::schedule::DATE_REQUIRED))?;

    let calls = state
        .schedule
        .schedule_calls(&body.contact_ids, scheduled_date, body.notes, auth.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": messages::schedule::CREATED,
            "scheduledCalls": calls,
        })),
    ))
}

/// GET /api/schedule/calls
pub async fn list_scheduled_calls(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ScheduledListQuery>,
) -> Result<Json<Value>, ApiError> {
    let calls = state
        .schedule
        .list_scheduled(
            auth.user_id,
            query.status.as_deref(),
            query.timeframe.as_deref(),
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::schedule::RETRIEVED,
        "scheduledCalls": calls,
    })))
}

/// DELETE /api/schedule/calls/:id
pub async fn delete_scheduled_call(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.schedule.delete_scheduled(&id, auth.user_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::schedule::REMOVED,
    })))
}
