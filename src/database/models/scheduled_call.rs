use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Scheduled,
    Completed,
    Cancelled,
    Missed,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown call status: {0}")]
pub struct ParseCallStatusError(String);

impl CallStatus {
    pub const ALL: [CallStatus; 4] = [
        CallStatus::Scheduled,
        CallStatus::Completed,
        CallStatus::Cancelled,
        CallStatus::Missed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Scheduled => "scheduled",
            CallStatus::Completed => "completed",
            CallStatus::Cancelled => "cancelled",
            CallStatus::Missed => "missed",
        }
    }
}

impl std::str::FromStr for CallStatus {
    type Err = ParseCallStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(CallStatus::Scheduled),
            "completed" => Ok(CallStatus::Completed),
            "cancelled" => Ok(CallStatus::Cancelled),
            "missed" => Ok(CallStatus::Missed),
            other => Err(ParseCallStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for CallStatus {
    type Error = ParseCallStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call scheduled against a contact by its owning admin.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledCall {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub admin_id: Uuid,
    pub scheduled_date: DateTime<Utc>,
    pub notes: String,
    #[sqlx(try_from = "String")]
    pub status: CallStatus,
    pub outcome: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_status_round_trips() {
        for status in CallStatus::ALL {
            assert_eq!(status.as_str().parse::<CallStatus>().unwrap(), status);
        }
        assert!("SCHEDULED".parse::<CallStatus>().is_err());
        assert!("done".parse::<CallStatus>().is_err());
    }
}
