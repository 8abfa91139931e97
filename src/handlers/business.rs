use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::messages;
use crate::middleware::AuthUser;
use crate::services::business_service::{CreateBusinessInput, UpdateBusinessInput};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    pub business_name: String,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub website: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    pub business_name: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchByNameRequest {
    #[serde(default)]
    pub business_name: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: String,
}

/// POST /api/representative/businesses
pub async fn add_business(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateBusinessRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let business = state
        .businesses
        .create(
            CreateBusinessInput {
                business_name: body.business_name,
                industry: body.industry,
                company_size: body.company_size,
                location: body.location,
                website: body.website,
                status: body.status,
            },
            auth.user_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": messages::business::CREATED,
            "business": business,
        })),
    ))
}

/// PUT /api/representative/businesses/:id
pub async fn update_business(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBusinessRequest>,
) -> Result<Json<Value>, ApiError> {
    let business = state
        .businesses
        .update(
            &id,
            UpdateBusinessInput {
                business_name: body.business_name,
                industry: body.industry,
                company_size: body.company_size,
                location: body.location,
                website: body.website,
                status: body.status,
            },
            auth.user_id,
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::business::UPDATED,
        "business": business,
    })))
}

/// GET /api/representative/businesses
pub async fn get_all_businesses(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let businesses = state.businesses.list().await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::business::RETRIEVED,
        "businesses": businesses,
    })))
}

/// GET /api/representative/businesses/:id
pub async fn get_business_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let business = state.businesses.get(&id).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::business::RETRIEVED,
        "business": business,
    })))
}

/// POST /api/representative/businesses/search
pub async fn search_businesses_by_name(
    State(state): State<AppState>,
    Json(body): Json<SearchByNameRequest>,
) -> Result<Json<Value>, ApiError> {
    let businesses = state.businesses.search_by_name(&body.business_name).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::business::MATCHING_RETRIEVED,
        "businesses": businesses,
    })))
}

/// POST /api/representative/businesses/by-status
pub async fn get_businesses_by_status(
    State(state): State<AppState>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let businesses = state.businesses.find_by_status(&body.status).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::business::RETRIEVED,
        "businesses": businesses,
    })))
}

/// PUT /api/representative/businesses/:id/status
pub async fn change_business_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let business = state.businesses.change_status(&id, &body.status).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::business::STATUS_UPDATED,
        "business": business,
    })))
}

/// PUT /api/representative/businesses/:id/interaction
pub async fn change_business_last_interaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let business = state.businesses.touch_last_interaction(&id).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::business::INTERACTION_UPDATED,
        "business": business,
    })))
}
