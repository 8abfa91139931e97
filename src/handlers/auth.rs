use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::messages;
use crate::services::user_service::RegisterInput;
use crate::validators;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 4, message = "Username must be at least 4 characters"))]
    pub username: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email; the shape of the value decides which column is
    /// matched.
    #[serde(alias = "email")]
    #[validate(length(min = 1, message = "An identifier is required"))]
    pub identifier: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Current password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validators::check(&body)?;
    validators::require_password_policy(&body.password)?;

    state
        .users
        .register(RegisterInput {
            username: body.username,
            email: body.email,
            password: body.password,
            role: body.role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": messages::registration::SIGNUP_SUCCESS,
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    validators::check(&body)?;
    validators::require_password_policy(&body.password)?;

    let outcome = state.users.login(&body.identifier, &body.password).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::login::LOGIN_SUCCESS,
        "username": outcome.user.username,
        "role": outcome.user.role,
        "email": outcome.user.email,
        "lastLogin": outcome.last_login,
        "status": outcome.user.status,
        "token": outcome.token,
        "expiresIn": outcome.expires_in,
    })))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, ApiError> {
    validators::check(&body)?;
    validators::require_password_policy(&body.new_password)?;

    state
        .users
        .reset_password(&body.username, &body.old_password, &body.new_password)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::user::PASSWORD_UPDATED,
    })))
}
