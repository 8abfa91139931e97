//! Registry layer: one service per entity family, each holding an injected
//! [`Db`](crate::database::Db) handle. Services own the business rules and
//! map every persistence failure into the [`ServiceError`] taxonomy at
//! their own boundary; handlers only translate these into HTTP responses.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub mod business_service;
pub mod contact_service;
pub mod lifecycle_service;
pub mod schedule_service;
pub mod user_service;

pub use business_service::BusinessService;
pub use contact_service::ContactService;
pub use lifecycle_service::LifecycleService;
pub use schedule_service::ScheduleService;
pub use user_service::UserService;

/// Registry error taxonomy. Messages are client-facing and drawn from the
/// message catalog; raw database errors stay in the `Database` variant and
/// are logged, never surfaced.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Authentication {
        message: String,
        reason: &'static str,
    },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<crate::auth::password::PasswordError> for ServiceError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        tracing::error!("Password hashing error: {}", err);
        ServiceError::Internal("An error occurred while processing your request".to_string())
    }
}

impl From<crate::auth::JwtError> for ServiceError {
    fn from(err: crate::auth::JwtError) -> Self {
        tracing::error!("JWT error: {}", err);
        ServiceError::Internal("An error occurred while processing your request".to_string())
    }
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ServiceError::Forbidden(message.into())
    }
}

/// Parse a path/body identifier, failing with a `Validation` error carrying
/// the given catalog message.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<Uuid, ServiceError> {
    raw.trim()
        .parse::<Uuid>()
        .map_err(|_| ServiceError::validation(message))
}

/// Translate a unique-constraint violation into a `Conflict` with the
/// message registered for the violated constraint. Uniqueness is enforced
/// by the database, not by application-level locking, so writers that lose
/// a race land here.
pub(crate) fn map_unique_violation(
    err: sqlx::Error,
    mappings: &[(&str, &'static str)],
) -> ServiceError {
    if let sqlx::Error::Database(ref db_err) = err {
        if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            if let Some(constraint) = db_err.constraint() {
                for (name, message) in mappings {
                    if *name == constraint {
                        return ServiceError::conflict(*message);
                    }
                }
            }
            return ServiceError::conflict("Duplicate value for a unique field");
        }
    }
    ServiceError::Database(err)
}

/// Escape LIKE/ILIKE wildcards so user input only ever matches literally.
pub(crate) fn escape_like(pattern: &str) -> String {
    pattern
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Pagination metadata returned next to every paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PageMeta {
    pub fn compute(page: i64, limit: i64, total_count: i64) -> Self {
        let total_pages = if total_count == 0 {
            0
        } else {
            (total_count + limit - 1) / limit
        };
        Self {
            current_page: page,
            total_pages,
            total_count,
            has_next: page < total_pages,
            has_prev: page > 1 && total_count > 0,
        }
    }
}

/// Clamp raw page/limit inputs to sane bounds.
pub(crate) fn normalize_page(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let api = &crate::config::config().api;
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .unwrap_or(api.default_page_size)
        .clamp(1, api.max_page_size);
    (page, limit)
}
