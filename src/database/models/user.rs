use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Role;

/// Account lifecycle status. Deleting an account is a status value, not a
/// row deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Blocked,
    Deleted,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown user status: {0}")]
pub struct ParseUserStatusError(String);

impl UserStatus {
    pub const ALL: [UserStatus; 4] = [
        UserStatus::Active,
        UserStatus::Inactive,
        UserStatus::Blocked,
        UserStatus::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Blocked => "BLOCKED",
            UserStatus::Deleted => "DELETED",
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = ParseUserStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(UserStatus::Active),
            "INACTIVE" => Ok(UserStatus::Inactive),
            "BLOCKED" => Ok(UserStatus::Blocked),
            "DELETED" => Ok(UserStatus::Deleted),
            other => Err(ParseUserStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for UserStatus {
    type Error = ParseUserStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[sqlx(try_from = "String")]
    pub status: UserStatus,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub last_login: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public projection used in API payloads.
    pub fn serialize_public(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "username": self.username,
            "email": self.email,
            "role": self.role,
            "status": self.status,
            "lastLogin": self.last_login,
            "createdAt": self.created_at,
            "updatedAt": self.updated_at,
        })
    }
}
