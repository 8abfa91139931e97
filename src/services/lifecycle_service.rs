use serde::Serialize;
use uuid::Uuid;

use crate::database::Db;
use crate::messages;
use crate::services::{parse_id, BusinessService, ServiceError};

/// Entity families the generic lifecycle machine can operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Business,
    Contact,
}

impl EntityKind {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw {
            "business" => Ok(EntityKind::Business),
            "contact" => Ok(EntityKind::Contact),
            _ => Err(ServiceError::validation(messages::lifecycle::INVALID_TYPE)),
        }
    }

    fn not_found_message(&self) -> &'static str {
        match self {
            EntityKind::Business => messages::business::NOT_FOUND,
            EntityKind::Contact => messages::contact::NOT_FOUND,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeAllSummary {
    pub purged_businesses: u64,
    pub purged_contacts: u64,
}

/// Generic soft-delete / restore / purge state machine applied uniformly
/// to businesses and contacts.
///
/// States: active -> soft-deleted -> purged (terminal). Re-deleting a
/// soft-deleted record, restoring an active one, or purging anything not
/// currently soft-deleted all fail with a conflict rather than silently
/// succeeding.
#[derive(Clone)]
pub struct LifecycleService {
    db: Db,
    businesses: BusinessService,
}

/// Current lifecycle position of a record, plus the company linkage for
/// contacts so the reconciler can run after the transition.
struct RecordState {
    is_deleted: bool,
    company: Option<Uuid>,
}

impl LifecycleService {
    pub fn new(db: Db) -> Self {
        let businesses = BusinessService::new(db.clone());
        Self { db, businesses }
    }

    pub async fn soft_delete(&self, kind: &str, id: &str) -> Result<(), ServiceError> {
        let (kind, id) = self.parse_target(kind, id)?;
        let state = self.load_state(kind, id).await?;
        if state.is_deleted {
            return Err(ServiceError::conflict(messages::lifecycle::ALREADY_DELETED));
        }

        self.set_deleted_flag(kind, id, true).await?;
        self.reconcile(state.company).await;
        Ok(())
    }

    pub async fn restore(&self, kind: &str, id: &str) -> Result<(), ServiceError> {
        let (kind, id) = self.parse_target(kind, id)?;
        let state = self.load_state(kind, id).await?;
        if !state.is_deleted {
            return Err(ServiceError::conflict(messages::lifecycle::NOT_DELETED));
        }

        self.set_deleted_flag(kind, id, false).await?;
        self.reconcile(state.company).await;
        Ok(())
    }

    /// Physically remove a record. Requires a prior soft-delete; hard
    /// deleting an active record is not permitted through this path.
    pub async fn purge(&self, kind: &str, id: &str) -> Result<(), ServiceError> {
        let (kind, id) = self.parse_target(kind, id)?;
        let state = self.load_state(kind, id).await?;
        if !state.is_deleted {
            return Err(ServiceError::conflict(
                messages::lifecycle::PURGE_REQUIRES_SOFT_DELETE,
            ));
        }

        let table = Self::table(kind);
        sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
            .bind(id)
            .execute(self.db.pool())
            .await?;

        self.reconcile(state.company).await;
        Ok(())
    }

    /// Sweep every collection that carries the soft-delete flag and
    /// physically remove the flagged records, in one operation.
    pub async fn purge_all(&self) -> Result<PurgeAllSummary, ServiceError> {
        // Collect affected businesses before the contacts disappear.
        let companies: Vec<Uuid> =
            sqlx::query_scalar("SELECT DISTINCT company FROM contacts WHERE is_deleted = TRUE")
                .fetch_all(self.db.pool())
                .await?;

        let purged_contacts = sqlx::query("DELETE FROM contacts WHERE is_deleted = TRUE")
            .execute(self.db.pool())
            .await?
            .rows_affected();

        let purged_businesses = sqlx::query("DELETE FROM businesses WHERE is_deleted = TRUE")
            .execute(self.db.pool())
            .await?
            .rows_affected();

        for company in companies {
            self.businesses.recompute_contact_count(company).await;
        }

        Ok(PurgeAllSummary {
            purged_businesses,
            purged_contacts,
        })
    }

    fn parse_target(&self, kind: &str, id: &str) -> Result<(EntityKind, Uuid), ServiceError> {
        let kind = EntityKind::parse(kind)?;
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;
        Ok((kind, id))
    }

    async fn load_state(&self, kind: EntityKind, id: Uuid) -> Result<RecordState, ServiceError> {
        let state = match kind {
            EntityKind::Business => {
                sqlx::query_scalar::<_, bool>("SELECT is_deleted FROM businesses WHERE id = $1")
                    .bind(id)
                    .fetch_optional(self.db.pool())
                    .await?
                    .map(|is_deleted| RecordState {
                        is_deleted,
                        company: None,
                    })
            }
            EntityKind::Contact => {
                sqlx::query_as::<_, (bool, Uuid)>(
                    "SELECT is_deleted, company FROM contacts WHERE id = $1",
                )
                .bind(id)
                .fetch_optional(self.db.pool())
                .await?
                .map(|(is_deleted, company)| RecordState {
                    is_deleted,
                    company: Some(company),
                })
            }
        };

        state.ok_or_else(|| ServiceError::not_found(kind.not_found_message()))
    }

    async fn set_deleted_flag(
        &self,
        kind: EntityKind,
        id: Uuid,
        deleted: bool,
    ) -> Result<(), ServiceError> {
        let table = Self::table(kind);
        sqlx::query(&format!(
            "UPDATE {table} SET is_deleted = $1, updated_at = now() WHERE id = $2"
        ))
        .bind(deleted)
        .bind(id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn reconcile(&self, company: Option<Uuid>) {
        if let Some(company) = company {
            self.businesses.recompute_contact_count(company).await;
        }
    }

    fn table(kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::Business => "businesses",
            EntityKind::Contact => "contacts",
        }
    }
}
