use tracing::warn;
use uuid::Uuid;

use crate::database::models::business::{
    is_valid_business_status, Business, DEFAULT_BUSINESS_STATUS,
};
use crate::database::Db;
use crate::messages;
use crate::services::{escape_like, parse_id, ServiceError};

#[derive(Debug, Clone)]
pub struct CreateBusinessInput {
    pub business_name: String,
    pub industry: String,
    pub company_size: String,
    pub location: String,
    pub website: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateBusinessInput {
    pub business_name: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub status: Option<String>,
}

/// Business registry: CRUD, status transitions, interaction tracking and
/// the derived contact-count reconciler.
#[derive(Clone)]
pub struct BusinessService {
    db: Db,
}

impl BusinessService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        input: CreateBusinessInput,
        actor_id: Uuid,
    ) -> Result<Business, ServiceError> {
        let status = match input.status.as_deref() {
            None | Some("") => DEFAULT_BUSINESS_STATUS,
            Some(s) if is_valid_business_status(s) => s,
            Some(_) => return Err(ServiceError::validation(messages::business::INVALID_STATUS)),
        };

        let business: Business = sqlx::query_as(
            "INSERT INTO businesses \
               (business_name, industry, company_size, location, website, status, \
                last_interaction, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, now(), $7) \
             RETURNING *",
        )
        .bind(&input.business_name)
        .bind(&input.industry)
        .bind(&input.company_size)
        .bind(&input.location)
        .bind(&input.website)
        .bind(status)
        .bind(actor_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(business)
    }

    /// Fetch a business by id regardless of its soft-delete state.
    pub async fn fetch(&self, id: Uuid) -> Result<Business, ServiceError> {
        sqlx::query_as("SELECT * FROM businesses WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| ServiceError::not_found(messages::business::NOT_FOUND))
    }

    /// Fetch a business by id, rejecting soft-deleted records.
    pub async fn fetch_active(&self, id: Uuid) -> Result<Business, ServiceError> {
        let business = self.fetch(id).await?;
        if business.is_deleted {
            return Err(ServiceError::conflict(messages::business::DELETED));
        }
        Ok(business)
    }

    pub async fn get(&self, id: &str) -> Result<Business, ServiceError> {
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;
        self.fetch_active(id).await
    }

    pub async fn update(
        &self,
        id: &str,
        input: UpdateBusinessInput,
        actor_id: Uuid,
    ) -> Result<Business, ServiceError> {
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;
        self.fetch_active(id).await?;

        let business: Business = sqlx::query_as(
            "UPDATE businesses SET \
               business_name = COALESCE($1, business_name), \
               industry = COALESCE($2, industry), \
               company_size = COALESCE($3, company_size), \
               location = COALESCE($4, location), \
               website = COALESCE($5, website), \
               status = COALESCE($6, status), \
               updated_by = $7, \
               updated_at = now() \
             WHERE id = $8 \
             RETURNING *",
        )
        .bind(&input.business_name)
        .bind(&input.industry)
        .bind(&input.company_size)
        .bind(&input.location)
        .bind(&input.website)
        .bind(&input.status)
        .bind(actor_id)
        .bind(id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(business)
    }

    /// Change a business status. Also clears the soft-delete flag as part
    /// of the transition; soft-deleted input records are still rejected
    /// beforehand, so the clear only ever re-affirms an active record.
    pub async fn change_status(&self, id: &str, status: &str) -> Result<Business, ServiceError> {
        if status.trim().is_empty() {
            return Err(ServiceError::validation(messages::business::STATUS_REQUIRED));
        }
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;
        self.fetch_active(id).await?;

        let business: Business = sqlx::query_as(
            "UPDATE businesses SET status = $1, is_deleted = FALSE, updated_at = now() \
             WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(business)
    }

    pub async fn touch_last_interaction(&self, id: &str) -> Result<Business, ServiceError> {
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;
        self.fetch_active(id).await?;

        let business: Business = sqlx::query_as(
            "UPDATE businesses SET last_interaction = now(), updated_at = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(business)
    }

    pub async fn list(&self) -> Result<Vec<Business>, ServiceError> {
        let businesses = sqlx::query_as(
            "SELECT * FROM businesses WHERE is_deleted = FALSE ORDER BY created_at DESC",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(businesses)
    }

    pub async fn search_by_name(&self, pattern: &str) -> Result<Vec<Business>, ServiceError> {
        if pattern.trim().is_empty() {
            return Err(ServiceError::validation(messages::business::NAME_QUERY_REQUIRED));
        }

        let businesses: Vec<Business> = sqlx::query_as(
            "SELECT * FROM businesses \
             WHERE business_name ILIKE $1 AND is_deleted = FALSE \
             ORDER BY created_at DESC",
        )
        .bind(format!("%{}%", escape_like(pattern)))
        .fetch_all(self.db.pool())
        .await?;

        if businesses.is_empty() {
            return Err(ServiceError::not_found(messages::business::NONE_MATCHING));
        }
        Ok(businesses)
    }

    pub async fn find_by_status(&self, status: &str) -> Result<Vec<Business>, ServiceError> {
        if status.trim().is_empty() {
            return Err(ServiceError::validation(messages::business::STATUS_REQUIRED));
        }

        let businesses: Vec<Business> = sqlx::query_as(
            "SELECT * FROM businesses \
             WHERE status = $1 AND is_deleted = FALSE \
             ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(self.db.pool())
        .await?;

        if businesses.is_empty() {
            return Err(ServiceError::not_found(messages::business::NONE_WITH_STATUS));
        }
        Ok(businesses)
    }

    /// Recompute the derived contact count for a business from the
    /// authoritative contact rows.
    ///
    /// Best-effort: runs after the triggering contact write has committed,
    /// and a missing business or a transient failure is logged, never
    /// propagated to the caller.
    pub async fn recompute_contact_count(&self, business_id: Uuid) {
        if let Err(e) = self.try_recompute_contact_count(business_id).await {
            warn!("Contact count reconciliation failed for business {}: {}", business_id, e);
        }
    }

    async fn try_recompute_contact_count(&self, business_id: Uuid) -> Result<(), sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contacts WHERE company = $1 AND is_deleted = FALSE",
        )
        .bind(business_id)
        .fetch_one(self.db.pool())
        .await?;

        let result = sqlx::query(
            "UPDATE businesses SET contact_count = $1, updated_at = now() WHERE id = $2",
        )
        .bind(count)
        .bind(business_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            warn!(
                "Business {} no longer exists; skipping contact count reconciliation",
                business_id
            );
        }
        Ok(())
    }

    /// Existence check used by the contact registry when resolving the
    /// company reference. Soft-deleted businesses still count as existing.
    pub async fn exists(&self, business_id: Uuid) -> Result<bool, ServiceError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM businesses WHERE id = $1)")
                .bind(business_id)
                .fetch_one(self.db.pool())
                .await?;
        Ok(exists)
    }
}
