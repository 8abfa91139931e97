use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use tracing::warn;
use uuid::Uuid;

use crate::database::models::contact::{
    is_valid_contact_status, repaired_status, Contact, HistoryEntry, DEFAULT_CONTACT_STATUS,
};
use crate::database::Db;
use crate::messages;
use crate::services::{
    escape_like, map_unique_violation, normalize_page, parse_id, BusinessService, PageMeta,
    ServiceError,
};

const UNIQUE_MAPPINGS: &[(&str, &'static str)] =
    &[("contacts_email_key", messages::contact::EMAIL_EXISTS)];

#[derive(Debug, Clone)]
pub struct CreateContactInput {
    pub full_name: String,
    pub role_title: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateContactInput {
    pub full_name: Option<String>,
    pub role_title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub notes: String,
    pub outcome: String,
    pub next_action: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub filter_field: Option<String>,
    /// Restrict to a single calendar day (YYYY-MM-DD, UTC) of addedDate.
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterField {
    Name,
    Company,
    Email,
}

impl FilterField {
    fn parse(raw: Option<&str>) -> Result<Self, ServiceError> {
        match raw {
            None | Some("") | Some("name") => Ok(FilterField::Name),
            Some("company") => Ok(FilterField::Company),
            Some("email") => Ok(FilterField::Email),
            Some(_) => Err(ServiceError::validation("Invalid filter field")),
        }
    }
}

/// Contact registry: CRUD, status transitions, the append-only history
/// log and the paginated listings. Every write that can change which
/// business a contact counts toward ends with a reconciliation pass.
#[derive(Clone)]
pub struct ContactService {
    db: Db,
    businesses: BusinessService,
}

impl ContactService {
    pub fn new(db: Db) -> Self {
        let businesses = BusinessService::new(db.clone());
        Self { db, businesses }
    }

    pub async fn create(
        &self,
        input: CreateContactInput,
        actor_id: Uuid,
    ) -> Result<Contact, ServiceError> {
        let company_id = parse_id(&input.company, messages::contact::INVALID_BUSINESS_ID)?;
        if !self.businesses.exists(company_id).await? {
            return Err(ServiceError::not_found(messages::business::NOT_FOUND));
        }

        let assigned_to = match input.assigned_to.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                let user_id = parse_id(raw, messages::contact::INVALID_USER_ID)?;
                if !self.user_exists(user_id).await? {
                    return Err(ServiceError::not_found(messages::contact::ASSIGNEE_NOT_FOUND));
                }
                Some(user_id)
            }
        };

        let status = match input.status.as_deref() {
            None | Some("") => DEFAULT_CONTACT_STATUS,
            Some(s) if is_valid_contact_status(s) => s,
            Some(_) => return Err(ServiceError::validation(messages::contact::INVALID_STATUS)),
        };

        let contact: Contact = sqlx::query_as(
            "INSERT INTO contacts \
               (full_name, role_title, company, email, phone, department, status, \
                assigned_to, added_date, first_contact, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now(), $9) \
             RETURNING *",
        )
        .bind(&input.full_name)
        .bind(&input.role_title)
        .bind(company_id)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.department)
        .bind(status)
        .bind(assigned_to)
        .bind(actor_id)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| map_unique_violation(e, UNIQUE_MAPPINGS))?;

        self.businesses.recompute_contact_count(company_id).await;

        Ok(contact)
    }

    /// Fetch a contact by id regardless of its soft-delete state.
    pub async fn fetch(&self, id: Uuid) -> Result<Contact, ServiceError> {
        sqlx::query_as("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| ServiceError::not_found(messages::contact::NOT_FOUND))
    }

    /// Fetch a contact by id, rejecting soft-deleted records.
    pub async fn fetch_active(&self, id: Uuid) -> Result<Contact, ServiceError> {
        let contact = self.fetch(id).await?;
        if contact.is_deleted {
            return Err(ServiceError::conflict(messages::contact::DELETED));
        }
        Ok(contact)
    }

    pub async fn update(
        &self,
        id: &str,
        input: UpdateContactInput,
        actor_id: Uuid,
    ) -> Result<Contact, ServiceError> {
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;
        let old = self.fetch_active(id).await?;

        let new_company = match input.company.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                let company_id = parse_id(raw, messages::contact::INVALID_BUSINESS_ID)?;
                if !self.businesses.exists(company_id).await? {
                    return Err(ServiceError::not_found(messages::business::NOT_FOUND));
                }
                Some(company_id)
            }
        };

        let assigned_to = match input.assigned_to.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                let user_id = parse_id(raw, messages::contact::INVALID_USER_ID)?;
                if !self.user_exists(user_id).await? {
                    return Err(ServiceError::not_found(messages::contact::ASSIGNEE_NOT_FOUND));
                }
                Some(user_id)
            }
        };

        if let Some(status) = input.status.as_deref() {
            if !status.is_empty() && !is_valid_contact_status(status) {
                return Err(ServiceError::validation(messages::contact::INVALID_STATUS));
            }
        }

        let contact: Contact = sqlx::query_as(
            "UPDATE contacts SET \
               full_name = COALESCE($1, full_name), \
               role_title = COALESCE($2, role_title), \
               company = COALESCE($3, company), \
               email = COALESCE($4, email), \
               phone = COALESCE($5, phone), \
               department = COALESCE($6, department), \
               status = COALESCE($7, status), \
               assigned_to = COALESCE($8, assigned_to), \
               updated_by = $9, \
               updated_at = now() \
             WHERE id = $10 \
             RETURNING *",
        )
        .bind(&input.full_name)
        .bind(&input.role_title)
        .bind(new_company)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.department)
        .bind(input.status.as_deref().filter(|s| !s.is_empty()))
        .bind(assigned_to)
        .bind(actor_id)
        .bind(id)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| map_unique_violation(e, UNIQUE_MAPPINGS))?;

        // Reconcile both sides of a linkage change.
        match new_company {
            Some(company) if company != old.company => {
                self.businesses.recompute_contact_count(old.company).await;
                self.businesses.recompute_contact_count(company).await;
            }
            _ => self.businesses.recompute_contact_count(old.company).await,
        }

        Ok(contact)
    }

    pub async fn list(&self) -> Result<Vec<Contact>, ServiceError> {
        let contacts = sqlx::query_as(
            "SELECT * FROM contacts WHERE is_deleted = FALSE ORDER BY added_date DESC",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(contacts)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Contact, ServiceError> {
        if email.trim().is_empty() {
            return Err(ServiceError::validation(messages::contact::EMAIL_REQUIRED));
        }
        sqlx::query_as("SELECT * FROM contacts WHERE email = $1 AND is_deleted = FALSE")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| ServiceError::not_found(messages::contact::NOT_FOUND))
    }

    pub async fn find_by_status(&self, status: &str) -> Result<Vec<Contact>, ServiceError> {
        if status.trim().is_empty() {
            return Err(ServiceError::validation(messages::contact::STATUS_REQUIRED));
        }

        let contacts: Vec<Contact> = sqlx::query_as(
            "SELECT * FROM contacts WHERE status = $1 AND is_deleted = FALSE \
             ORDER BY added_date DESC",
        )
        .bind(status)
        .fetch_all(self.db.pool())
        .await?;

        if contacts.is_empty() {
            return Err(ServiceError::not_found(messages::contact::NONE_WITH_STATUS));
        }
        Ok(contacts)
    }

    pub async fn change_status(&self, id: &str, status: &str) -> Result<Contact, ServiceError> {
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;
        self.set_status(id, status, false).await
    }

    /// Status-update variant that also stamps `lastContact = now`.
    pub async fn update_status(
        &self,
        contact_id: &str,
        status: &str,
    ) -> Result<Contact, ServiceError> {
        let id = parse_id(contact_id, messages::lifecycle::INVALID_ID)?;
        self.set_status(id, status, true).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: &str,
        touch_last_contact: bool,
    ) -> Result<Contact, ServiceError> {
        if status.trim().is_empty() {
            return Err(ServiceError::validation(messages::contact::STATUS_REQUIRED));
        }
        if !is_valid_contact_status(status) {
            return Err(ServiceError::validation(messages::contact::INVALID_STATUS));
        }
        self.fetch_active(id).await?;

        let sql = if touch_last_contact {
            "UPDATE contacts SET status = $1, last_contact = now(), updated_at = now() \
             WHERE id = $2 RETURNING *"
        } else {
            "UPDATE contacts SET status = $1, updated_at = now() WHERE id = $2 RETURNING *"
        };

        let contact: Contact = sqlx::query_as(sql)
            .bind(status)
            .bind(id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(contact)
    }

    /// Append a history entry. Sequence ids come from the per-contact
    /// monotonic counter, so deleting an entry never frees its id for
    /// reuse. A drifted status value is repaired to the default as part of
    /// the same write.
    pub async fn add_history_entry(
        &self,
        id: &str,
        entry: NewHistoryEntry,
    ) -> Result<Contact, ServiceError> {
        if entry.notes.trim().is_empty() || entry.outcome.trim().is_empty() {
            return Err(ServiceError::validation(messages::contact::NOTES_REQUIRED));
        }
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;
        let contact = self.fetch_active(id).await?;

        let status = self.repair_status_if_needed(&contact);
        let sequence_id = contact.history_seq + 1;

        let mut history = contact.contact_history.0;
        history.push(HistoryEntry {
            sequence_id,
            date: Utc::now(),
            notes: entry.notes,
            outcome: entry.outcome,
            next_action: entry.next_action,
            scheduled_date: entry.scheduled_date,
        });

        let contact: Contact = sqlx::query_as(
            "UPDATE contacts SET contact_history = $1, history_seq = $2, status = $3, \
               last_contact = now(), updated_at = now() \
             WHERE id = $4 RETURNING *",
        )
        .bind(Json(&history))
        .bind(sequence_id)
        .bind(&status)
        .bind(id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(contact)
    }

    /// Remove one history entry by sequence id. The remaining entries keep
    /// their sequence ids.
    pub async fn delete_history_entry(
        &self,
        contact_id: &str,
        sequence_id: &str,
    ) -> Result<Contact, ServiceError> {
        let id = parse_id(contact_id, messages::lifecycle::INVALID_ID)?;
        let sequence_id: i64 = sequence_id
            .parse()
            .map_err(|_| ServiceError::validation(messages::contact::HISTORY_ID_NOT_NUMERIC))?;

        let contact = self.fetch_active(id).await?;

        let mut history = contact.contact_history.0.clone();
        let position = history
            .iter()
            .position(|e| e.sequence_id == sequence_id)
            .ok_or_else(|| ServiceError::not_found(messages::contact::HISTORY_ENTRY_NOT_FOUND))?;
        history.remove(position);

        let status = self.repair_status_if_needed(&contact);

        let contact: Contact = sqlx::query_as(
            "UPDATE contacts SET contact_history = $1, status = $2, updated_at = now() \
             WHERE id = $3 RETURNING *",
        )
        .bind(Json(&history))
        .bind(&status)
        .bind(id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(contact)
    }

    fn repair_status_if_needed(&self, contact: &Contact) -> String {
        match repaired_status(&contact.status) {
            Some(fixed) => {
                warn!(
                    "Contact {} carried invalid status {:?}; repairing to {}",
                    contact.id, contact.status, fixed
                );
                fixed.to_string()
            }
            None => contact.status.clone(),
        }
    }

    /// Paginated listing, newest first, with optional substring filtering
    /// on one field and an optional single-calendar-day constraint.
    pub async fn list_paginated(
        &self,
        params: ContactListParams,
    ) -> Result<(Vec<Contact>, PageMeta), ServiceError> {
        let (page, limit) = normalize_page(params.page, params.limit);
        let field = FilterField::parse(params.filter_field.as_deref())?;

        let day = match params.date.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| ServiceError::validation("Invalid date filter"))?;
                let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
                Some((start, start + Duration::days(1)))
            }
        };

        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let mut count_query: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM contacts c");
        Self::push_filters(&mut count_query, &search, field, &day);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await?;

        let mut query: QueryBuilder<Postgres> = QueryBuilder::new("SELECT c.* FROM contacts c");
        Self::push_filters(&mut query, &search, field, &day);
        query.push(" ORDER BY c.added_date DESC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind((page - 1) * limit);

        let contacts: Vec<Contact> = query.build_query_as().fetch_all(self.db.pool()).await?;

        Ok((contacts, PageMeta::compute(page, limit, total_count)))
    }

    fn push_filters(
        query: &mut QueryBuilder<Postgres>,
        search: &Option<String>,
        field: FilterField,
        day: &Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) {
        query.push(" WHERE c.is_deleted = FALSE");

        if let Some(pattern) = search {
            match field {
                FilterField::Name => {
                    query.push(" AND c.full_name ILIKE ");
                    query.push_bind(pattern.clone());
                }
                FilterField::Email => {
                    query.push(" AND c.email ILIKE ");
                    query.push_bind(pattern.clone());
                }
                FilterField::Company => {
                    query.push(
                        " AND EXISTS (SELECT 1 FROM businesses b \
                           WHERE b.id = c.company AND b.business_name ILIKE ",
                    );
                    query.push_bind(pattern.clone());
                    query.push(")");
                }
            }
        }

        if let Some((start, end)) = day {
            query.push(" AND c.added_date >= ");
            query.push_bind(*start);
            query.push(" AND c.added_date < ");
            query.push_bind(*end);
        }
    }

    /// Contacts uploaded by one owner, non-deleted, newest first.
    pub async fn list_by_owner(
        &self,
        owner_id: &str,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<Contact>, PageMeta), ServiceError> {
        let owner_id = parse_id(owner_id, messages::lifecycle::INVALID_ID)?;
        let (page, limit) = normalize_page(page, limit);

        let total_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contacts WHERE created_by = $1 AND is_deleted = FALSE",
        )
        .bind(owner_id)
        .fetch_one(self.db.pool())
        .await?;

        let contacts: Vec<Contact> = sqlx::query_as(
            "SELECT * FROM contacts WHERE created_by = $1 AND is_deleted = FALSE \
             ORDER BY added_date DESC LIMIT $2 OFFSET $3",
        )
        .bind(owner_id)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok((contacts, PageMeta::compute(page, limit, total_count)))
    }

    /// Privileged direct hard delete: removes the row regardless of its
    /// soft-delete state. Distinct from the lifecycle purge, which demands
    /// a prior soft-delete.
    pub async fn hard_delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id, messages::lifecycle::INVALID_ID)?;

        let company: Uuid = sqlx::query_scalar("SELECT company FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| ServiceError::not_found(messages::contact::NOT_FOUND))?;

        sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        self.businesses.recompute_contact_count(company).await;
        Ok(())
    }

    async fn user_exists(&self, user_id: Uuid) -> Result<bool, ServiceError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(exists)
    }
}
