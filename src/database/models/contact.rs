use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Valid contact statuses. This is the merged scheme across schema
/// revisions; older rows may still carry values outside it, which the
/// registry repairs back to [`DEFAULT_CONTACT_STATUS`] on write.
pub const CONTACT_STATUSES: &[&str] = &["UNASSIGNED", "ASSIGNED", "ACTIVE", "PROSPECT", "LEAD"];

pub const DEFAULT_CONTACT_STATUS: &str = "UNASSIGNED";

pub fn is_valid_contact_status(status: &str) -> bool {
    CONTACT_STATUSES.contains(&status)
}

/// Returns the replacement status for a drifted value, or `None` when the
/// stored status is already valid.
pub fn repaired_status(status: &str) -> Option<&'static str> {
    if is_valid_contact_status(status) {
        None
    } else {
        Some(DEFAULT_CONTACT_STATUS)
    }
}

/// One entry of the append-only contact history log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub sequence_id: i64,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub full_name: String,
    pub role_title: String,
    pub company: Uuid,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub status: String,
    pub assigned_to: Option<Uuid>,
    pub is_deleted: bool,
    pub added_date: DateTime<Utc>,
    pub first_contact: DateTime<Utc>,
    /// `None` means no contact has been scheduled yet.
    pub last_contact: Option<DateTime<Utc>>,
    pub contact_history: Json<Vec<HistoryEntry>>,
    /// Monotonic counter backing history sequence ids; never reused after
    /// an entry is deleted.
    pub history_seq: i64,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
