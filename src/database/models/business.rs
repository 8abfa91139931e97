use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Status values accepted when a business is created. Status *changes* go
/// through a looser path that only requires a non-empty value, mirroring
/// the historical update behavior, so stored statuses are not guaranteed
/// to stay inside this set.
pub const BUSINESS_STATUSES: &[&str] = &["ACTIVE", "PROSPECT", "LEAD", "CONVERTED"];

pub const DEFAULT_BUSINESS_STATUS: &str = "ACTIVE";

pub fn is_valid_business_status(status: &str) -> bool {
    BUSINESS_STATUSES.contains(&status)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    pub business_name: String,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub website: Option<String>,
    pub status: String,
    /// Derived: count of non-deleted contacts referencing this business.
    /// Maintained by the reconciler, eventually consistent under
    /// concurrent writers.
    pub contact_count: i64,
    pub is_deleted: bool,
    pub last_interaction: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
