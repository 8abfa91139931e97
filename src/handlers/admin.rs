use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::messages;

#[derive(Debug, Deserialize)]
pub struct ChangeUserStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// PUT /api/admin/users/:id/status
pub async fn change_user_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<ChangeUserStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let change = state.users.change_status(&user_id, &body.status).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::user::STATUS_UPDATED,
        "user": change,
    })))
}
