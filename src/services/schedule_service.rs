use chrono::{DateTime, Duration, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::scheduled_call::{CallStatus, ScheduledCall};
use crate::database::Db;
use crate::messages;
use crate::services::{parse_id, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timeframe {
    Today,
    Upcoming,
}

impl Timeframe {
    fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw {
            "today" => Ok(Timeframe::Today),
            "upcoming" => Ok(Timeframe::Upcoming),
            _ => Err(ServiceError::validation(messages::schedule::INVALID_TIMEFRAME)),
        }
    }
}

/// Scheduling sub-registry: batch call creation against owned contacts,
/// owner-scoped listings and owner-only deletion.
#[derive(Clone)]
pub struct ScheduleService {
    db: Db,
}

impl ScheduleService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Insert one scheduled call per contact id, all-or-nothing.
    ///
    /// Every requested contact must resolve to a non-deleted contact owned
    /// by the caller (assignee or uploader). A single miss fails the whole
    /// batch before anything is inserted.
    pub async fn schedule_calls(
        &self,
        contact_ids: &[String],
        scheduled_date: DateTime<Utc>,
        notes: Option<String>,
        admin_id: Uuid,
    ) -> Result<Vec<ScheduledCall>, ServiceError> {
        if contact_ids.is_empty() {
            return Err(ServiceError::validation(messages::schedule::CONTACTS_REQUIRED));
        }

        let mut ids: Vec<Uuid> = Vec::with_capacity(contact_ids.len());
        for raw in contact_ids {
            let id = parse_id(raw, messages::lifecycle::INVALID_ID)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        let owned: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM contacts \
             WHERE id = ANY($1) AND is_deleted = FALSE \
               AND (assigned_to = $2 OR created_by = $2)",
        )
        .bind(&ids)
        .bind(admin_id)
        .fetch_all(self.db.pool())
        .await?;

        if owned.len() != ids.len() {
            return Err(ServiceError::forbidden(messages::schedule::NOT_PERMITTED));
        }

        let notes = notes.unwrap_or_default();
        let mut tx = self.db.pool().begin().await?;

        let mut calls = Vec::with_capacity(ids.len());
        for contact_id in &ids {
            let call: ScheduledCall = sqlx::query_as(
                "INSERT INTO scheduled_calls (contact_id, admin_id, scheduled_date, notes) \
                 VALUES ($1, $2, $3, $4) RETURNING *",
            )
            .bind(contact_id)
            .bind(admin_id)
            .bind(scheduled_date)
            .bind(&notes)
            .fetch_one(&mut *tx)
            .await?;
            calls.push(call);
        }

        sqlx::query(
            "UPDATE contacts SET last_contact = now(), updated_at = now() WHERE id = ANY($1)",
        )
        .bind(&ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(calls)
    }

    /// Calls owned by an admin, optionally narrowed by status and a date
    /// window, ordered by scheduled date ascending.
    pub async fn list_scheduled(
        &self,
        admin_id: Uuid,
        status: Option<&str>,
        timeframe: Option<&str>,
    ) -> Result<Vec<ScheduledCall>, ServiceError> {
        let status = match status {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<CallStatus>().map_err(|_| {
                ServiceError::validation(messages::schedule::INVALID_STATUS_FILTER)
            })?),
        };
        let timeframe = match timeframe {
            None | Some("") => None,
            Some(raw) => Some(Timeframe::parse(raw)?),
        };

        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM scheduled_calls WHERE admin_id = ");
        query.push_bind(admin_id);

        if let Some(status) = status {
            query.push(" AND status = ");
            query.push_bind(status.as_str());
        }

        match timeframe {
            Some(Timeframe::Today) => {
                let start = Utc::now().date_naive().and_time(chrono::NaiveTime::MIN).and_utc();
                query.push(" AND scheduled_date >= ");
                query.push_bind(start);
                query.push(" AND scheduled_date < ");
                query.push_bind(start + Duration::days(1));
            }
            Some(Timeframe::Upcoming) => {
                query.push(" AND scheduled_date >= now() AND status = ");
                query.push_bind(CallStatus::Scheduled.as_str());
            }
            None => {}
        }

        query.push(" ORDER BY scheduled_date ASC");

        let calls: Vec<ScheduledCall> = query.build_query_as().fetch_all(self.db.pool()).await?;
        Ok(calls)
    }

    /// Delete a scheduled call; only its owning admin may do so.
    pub async fn delete_scheduled(&self, id: &str, admin_id: Uuid) -> Result<(), ServiceError> {
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;

        let owner: Uuid = sqlx::query_scalar("SELECT admin_id FROM scheduled_calls WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| ServiceError::not_found(messages::schedule::NOT_FOUND))?;

        if owner != admin_id {
            return Err(ServiceError::forbidden(messages::schedule::NOT_OWNER));
        }

        sqlx::query("DELETE FROM scheduled_calls WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }
}
