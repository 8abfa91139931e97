mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;

    // We consider OK or SERVICE_UNAVAILABLE acceptable as a basic liveness check
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );

    // Should be valid JSON
    let _body = res.json::<Value>().await?;
    Ok(())
}

#[tokio::test]
async fn signup_login_and_conflict_flow() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let username = format!("alice_{}", &suffix[..12]);
    let email = format!("{}@test.example", username);

    // Register
    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({
            "username": username,
            "email": email,
            "password": "password123",
            "role": "ADMIN",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);

    // Re-register the same username -> conflict with the catalog message
    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({
            "username": username,
            "email": format!("other_{}", email),
            "password": "password123",
            "role": "ADMIN",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Username is already taken.");

    // Wrong password -> authentication error, reason=password, no token
    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "identifier": username, "password": "wrongpass" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["reason"], "password");
    assert!(body.get("token").is_none());

    // Correct password -> token and expiry
    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "identifier": username, "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["role"], "ADMIN");
    assert!(body["token"].as_str().is_some());
    assert!(body["expiresIn"].as_i64().unwrap() > 0);

    // Login by email works the same way
    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "identifier": email, "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

/// Documented behavior, not an accident: identification stamps lastLogin
/// before the password check runs, so even a rejected attempt advances it.
/// Only a direct database read can observe this, since every successful
/// login stamps afresh.
#[tokio::test]
async fn failed_login_still_advances_last_login() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let account = common::register_and_login(server, "ADMIN").await?;

    let _ = dotenvy::dotenv();
    let pool = sqlx::PgPool::connect(&std::env::var("DATABASE_URL")?).await?;
    let last_login = |username: String| {
        let pool = pool.clone();
        async move {
            let stamped: chrono::DateTime<chrono::Utc> =
                sqlx::query_scalar("SELECT last_login FROM users WHERE username = $1")
                    .bind(username)
                    .fetch_one(&pool)
                    .await?;
            anyhow::Ok(stamped)
        }
    };

    let before = last_login(account.username.clone()).await?;

    // Wrong password: rejected, but identification already stamped lastLogin.
    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "identifier": account.username, "password": "wrongpass" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let after = last_login(account.username.clone()).await?;
    assert!(
        after > before,
        "lastLogin should have advanced across the failed attempt"
    );
    Ok(())
}

#[tokio::test]
async fn unknown_identifier_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "identifier": "nobody-here", "password": "password123" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn invalid_signup_shapes_are_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // Username too short
    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({
            "username": "abc",
            "email": "abc@test.example",
            "password": "password123",
            "role": "ADMIN",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unknown role
    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({
            "username": "validname",
            "email": "validname@test.example",
            "password": "password123",
            "role": "SUPERUSER",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Password outside the allowed alphabet
    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({
            "username": "validname2",
            "email": "validname2@test.example",
            "password": "has spaces not ok",
            "role": "ADMIN",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

#[tokio::test]
async fn reset_password_flow() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let account = common::register_and_login(server, "ADMIN").await?;

    // Wrong current password
    let res = client
        .post(format!("{}/api/auth/reset-password", server.base_url))
        .json(&json!({
            "username": account.username,
            "oldPassword": "not-the-password",
            "newPassword": "newpassword456",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Correct current password
    let res = client
        .post(format!("{}/api/auth/reset-password", server.base_url))
        .json(&json!({
            "username": account.username,
            "oldPassword": account.password,
            "newPassword": "newpassword456",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Old password no longer works, new one does
    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "identifier": account.username, "password": account.password }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "identifier": account.username, "password": "newpassword456" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn role_gate_denies_wrong_role_and_missing_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No token at all
    let res = client
        .get(format!("{}/api/representative/businesses", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Marketing staff may not use the representative surface
    let staff = common::register_and_login(server, "MARKETING_STAFF").await?;
    let res = client
        .get(format!("{}/api/representative/businesses", server.base_url))
        .bearer_auth(&staff.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // A representative may not restore records (admin only)
    let rep = common::register_and_login(server, "COMPANY_REPRESENTATIVE").await?;
    let res = client
        .put(format!("{}/api/data/restore", server.base_url))
        .bearer_auth(&rep.token)
        .json(&json!({ "type": "contact", "id": uuid::Uuid::new_v4().to_string() }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}
