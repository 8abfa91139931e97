use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::{self, password, Claims, Role};
use crate::config;
use crate::database::models::user::{User, UserStatus};
use crate::database::Db;
use crate::messages;
use crate::services::{map_unique_violation, parse_id, ServiceError};
use crate::validators;

const UNIQUE_MAPPINGS: &[(&str, &'static str)] = &[
    ("users_username_key", messages::registration::USERNAME_EXISTS),
    ("users_email_key", messages::registration::EMAIL_EXISTS),
];

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Everything the login endpoint returns on success.
#[derive(Debug)]
pub struct LoginSuccess {
    pub user: User,
    pub last_login: DateTime<Utc>,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusChange {
    pub id: Uuid,
    pub username: String,
    pub status: UserStatus,
}

/// Identity and credential registry: registration, login, password reset
/// and the admin-only status switch.
#[derive(Clone)]
pub struct UserService {
    db: Db,
}

impl UserService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<(), ServiceError> {
        input
            .role
            .parse::<Role>()
            .map_err(|_| ServiceError::validation("Invalid role"))?;

        // Pre-checks give the friendly catalog messages; the unique indexes
        // still backstop concurrent registrations.
        let username_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(&input.username)
                .fetch_one(self.db.pool())
                .await?;
        if username_taken {
            return Err(ServiceError::conflict(messages::registration::USERNAME_EXISTS));
        }

        let email_taken: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&input.email)
                .fetch_one(self.db.pool())
                .await?;
        if email_taken {
            return Err(ServiceError::conflict(messages::registration::EMAIL_EXISTS));
        }

        let password_hash = password::hash_password(&input.password)?;

        sqlx::query(
            "INSERT INTO users (username, email, role, status, password_hash) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.role)
        .bind(UserStatus::Active.as_str())
        .bind(&password_hash)
        .execute(self.db.pool())
        .await
        .map_err(|e| map_unique_violation(e, UNIQUE_MAPPINGS))?;

        Ok(())
    }

    /// Authenticate by username or email. The identifier's shape decides
    /// which column is matched.
    ///
    /// lastLogin is stamped as soon as the account is identified, before
    /// the password check, unless `touch_last_login_after_verify` is set —
    /// a failed password attempt still advances the timestamp by default.
    pub async fn login(
        &self,
        identifier: &str,
        password_plain: &str,
    ) -> Result<LoginSuccess, ServiceError> {
        let column = if validators::looks_like_email(identifier) {
            "email"
        } else {
            "username"
        };
        let sql = format!("SELECT * FROM users WHERE {column} = $1");

        let user: User = sqlx::query_as(&sql)
            .bind(identifier)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| ServiceError::not_found(messages::login::USER_NOT_FOUND))?;

        let after_verify = config::config().security.touch_last_login_after_verify;

        let mut last_login = user.last_login;
        if !after_verify {
            last_login = self.touch_last_login(user.id).await?;
        }

        if !password::verify_password(password_plain, &user.password_hash)? {
            return Err(ServiceError::Authentication {
                message: messages::login::WRONG_PASSWORD.to_string(),
                reason: "password",
            });
        }

        if after_verify {
            last_login = self.touch_last_login(user.id).await?;
        }

        let claims = Claims::for_user(&user, last_login);
        let token = auth::generate_jwt(&claims)?;

        Ok(LoginSuccess {
            user,
            last_login,
            token,
            expires_in: auth::token_expiry_secs(),
        })
    }

    async fn touch_last_login(&self, user_id: Uuid) -> Result<DateTime<Utc>, ServiceError> {
        let stamped: DateTime<Utc> = sqlx::query_scalar(
            "UPDATE users SET last_login = now(), updated_at = now() WHERE id = $1 \
             RETURNING last_login",
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;
        Ok(stamped)
    }

    pub async fn reset_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let user: User = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| ServiceError::not_found(messages::user::NOT_FOUND))?;

        if !password::verify_password(old_password, &user.password_hash)? {
            return Err(ServiceError::Authentication {
                message: messages::user::WRONG_CURRENT_PASSWORD.to_string(),
                reason: "password",
            });
        }

        let new_hash = password::hash_password(new_password)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(&new_hash)
            .bind(user.id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    pub async fn change_status(
        &self,
        user_id: &str,
        status: &str,
    ) -> Result<UserStatusChange, ServiceError> {
        let user_id = parse_id(user_id, messages::lifecycle::INVALID_ID)?;
        if status.trim().is_empty() {
            return Err(ServiceError::validation(messages::user::STATUS_REQUIRED));
        }
        let status = status
            .parse::<UserStatus>()
            .map_err(|_| ServiceError::validation(messages::user::INVALID_STATUS))?;

        let row: Option<(Uuid, String)> = sqlx::query_as(
            "UPDATE users SET status = $1, updated_at = now() WHERE id = $2 \
             RETURNING id, username",
        )
        .bind(status.as_str())
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        let (id, username) =
            row.ok_or_else(|| ServiceError::not_found(messages::user::NOT_FOUND))?;

        Ok(UserStatusChange {
            id,
            username,
            status,
        })
    }

    /// Existence check used when other registries validate an assignee.
    pub async fn exists(&self, user_id: Uuid) -> Result<bool, ServiceError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(exists)
    }
}
