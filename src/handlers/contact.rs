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
use crate::services::contact_service::{
    ContactListParams, CreateContactInput, NewHistoryEntry, UpdateContactInput,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    pub full_name: String,
    pub role_title: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactRequest {
    pub full_name: Option<String>,
    pub role_title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub filter_field: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByOwnerRequest {
    pub owner_id: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub contact_id: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddNoteRequest {
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub outcome: String,
    pub next_action: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
}

/// POST /api/representative/contacts
pub async fn add_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let contact = state
        .contacts
        .create(
            CreateContactInput {
                full_name: body.full_name,
                role_title: body.role_title,
                company: body.company,
                email: body.email,
                phone: body.phone,
                department: body.department,
                status: body.status,
                assigned_to: body.assigned_to,
            },
            auth.user_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": messages::contact::CREATED,
            "contact": contact,
        })),
    ))
}

/// PUT /api/representative/contacts/:id
pub async fn update_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateContactRequest>,
) -> Result<Json<Value>, ApiError> {
    let contact = state
        .contacts
        .update(
            &id,
            UpdateContactInput {
                full_name: body.full_name,
                role_title: body.role_title,
                company: body.company,
                email: body.email,
                phone: body.phone,
                department: body.department,
                status: body.status,
                assigned_to: body.assigned_to,
            },
            auth.user_id,
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::UPDATED,
        "contact": contact,
    })))
}

/// GET /api/representative/contacts
pub async fn get_all_contacts(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let contacts = state.contacts.list().await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::RETRIEVED,
        "contacts": contacts,
    })))
}

/// POST /api/representative/contacts/by-email
pub async fn get_contact_by_email(
    State(state): State<AppState>,
    Json(body): Json<EmailRequest>,
) -> Result<Json<Value>, ApiError> {
    let contact = state.contacts.get_by_email(&body.email).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::RETRIEVED,
        "contact": contact,
    })))
}

/// PUT /api/representative/contacts/:id/status
pub async fn change_contact_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let contact = state.contacts.change_status(&id, &body.status).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::STATUS_UPDATED,
        "contact": contact,
    })))
}

/// POST /api/representative/contacts/by-status
pub async fn get_contacts_by_status(
    State(state): State<AppState>,
    Json(body): Json<StatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let contacts = state.contacts.find_by_status(&body.status).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::RETRIEVED,
        "contacts": contacts,
    })))
}

/// GET /api/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<Value>, ApiError> {
    let (contacts, pagination) = state
        .contacts
        .list_paginated(ContactListParams {
            page: query.page,
            limit: query.limit,
            search: query.search,
            filter_field: query.filter_field,
            date: query.date,
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::RETRIEVED,
        "contacts": contacts,
        "pagination": pagination,
    })))
}

/// POST /api/contacts/by-owner
pub async fn get_contacts_by_owner(
    State(state): State<AppState>,
    Json(body): Json<ByOwnerRequest>,
) -> Result<Json<Value>, ApiError> {
    let (contacts, pagination) = state
        .contacts
        .list_by_owner(&body.owner_id, body.page, body.limit)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::RETRIEVED,
        "contacts": contacts,
        "pagination": pagination,
    })))
}

/// POST /api/contacts/status
pub async fn update_contact_status(
    State(state): State<AppState>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, ApiError> {
    let contact = state
        .contacts
        .update_status(&body.contact_id, &body.status)
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::STATUS_UPDATED,
        "contact": contact,
    })))
}

/// DELETE /api/contacts/:id
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.contacts.hard_delete(&id).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::REMOVED,
    })))
}

/// POST /api/contacts/:id/notes
pub async fn add_note_to_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AddNoteRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let contact = state
        .contacts
        .add_history_entry(
            &id,
            NewHistoryEntry {
                notes: body.notes,
                outcome: body.outcome,
                next_action: body.next_action,
                scheduled_date: body.scheduled_date,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": messages::contact::NOTE_ADDED,
            "contact": contact,
        })),
    ))
}

/// DELETE /api/contacts/:id/history/:sequence_id
pub async fn delete_contact_history(
    State(state): State<AppState>,
    Path((id, sequence_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let contact = state.contacts.delete_history_entry(&id, &sequence_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": messages::contact::HISTORY_ENTRY_REMOVED,
        "contact": contact,
    })))
}
