mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn business_crud_and_search() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let account = common::register_and_login(server, "COMPANY_REPRESENTATIVE").await?;

    let marker = uuid::Uuid::new_v4().simple().to_string();
    let name = format!("Acme {}", &marker[..8]);
    let business = common::create_business(server, &account.token, &name).await?;
    let id = business["id"].as_str().unwrap().to_string();

    assert_eq!(business["status"], "LEAD");
    assert_eq!(business["contactCount"], 0);
    assert_eq!(business["isDeleted"], false);

    // Update mutable fields
    let res = client
        .put(format!(
            "{}/api/representative/businesses/{}",
            server.base_url, id
        ))
        .bearer_auth(&account.token)
        .json(&json!({ "industry": "Aerospace" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["business"]["industry"], "Aerospace");
    // Untouched fields survive partial updates
    assert_eq!(body["business"]["businessName"], name.as_str());

    // Case-insensitive substring search
    let res = client
        .post(format!(
            "{}/api/representative/businesses/search",
            server.base_url
        ))
        .bearer_auth(&account.token)
        .json(&json!({ "businessName": format!("acme {}", &marker[..8]) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert!(body["businesses"].as_array().unwrap().iter().any(|b| b["id"] == id.as_str()));

    // Zero matches is a not-found
    let res = client
        .post(format!(
            "{}/api/representative/businesses/search",
            server.base_url
        ))
        .bearer_auth(&account.token)
        .json(&json!({ "businessName": format!("no-such-business-{}", marker) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Status change
    let res = client
        .put(format!(
            "{}/api/representative/businesses/{}/status",
            server.base_url, id
        ))
        .bearer_auth(&account.token)
        .json(&json!({ "status": "CONVERTED" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["business"]["status"], "CONVERTED");

    // Empty status is rejected
    let res = client
        .put(format!(
            "{}/api/representative/businesses/{}/status",
            server.base_url, id
        ))
        .bearer_auth(&account.token)
        .json(&json!({ "status": "" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Interaction touch bumps the timestamp
    let before = common::fetch_business(server, &account.token, &id).await?;
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let res = client
        .put(format!(
            "{}/api/representative/businesses/{}/interaction",
            server.base_url, id
        ))
        .bearer_auth(&account.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let after: Value = res.json().await?;
    assert_ne!(before["lastInteraction"], after["business"]["lastInteraction"]);

    Ok(())
}

#[tokio::test]
async fn contact_count_follows_contact_lifecycle() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let admin = common::register_and_login(server, "ADMIN").await?;

    let marker = uuid::Uuid::new_v4().simple().to_string();
    let business = common::create_business(server, &admin.token, &format!("Reconcile {}", &marker[..8])).await?;
    let business_id = business["id"].as_str().unwrap().to_string();
    assert_eq!(business["contactCount"], 0);

    // Creating a linked contact raises the derived count to 1
    let contact = common::create_contact(server, &admin.token, &business_id, "Grace Hopper").await?;
    let contact_id = contact["id"].as_str().unwrap().to_string();
    let fetched = common::fetch_business(server, &admin.token, &business_id).await?;
    assert_eq!(fetched["contactCount"], 1);

    // Soft-deleting the contact drops it back to 0
    let res = client
        .delete(format!("{}/api/data/soft", server.base_url))
        .bearer_auth(&admin.token)
        .json(&json!({ "type": "contact", "id": contact_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = common::fetch_business(server, &admin.token, &business_id).await?;
    assert_eq!(fetched["contactCount"], 0);

    // Restoring brings it back to 1
    let res = client
        .put(format!("{}/api/data/restore", server.base_url))
        .bearer_auth(&admin.token)
        .json(&json!({ "type": "contact", "id": contact_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = common::fetch_business(server, &admin.token, &business_id).await?;
    assert_eq!(fetched["contactCount"], 1);

    Ok(())
}

#[tokio::test]
async fn invalid_status_on_create_is_rejected() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();
    let account = common::register_and_login(server, "COMPANY_REPRESENTATIVE").await?;

    let res = client
        .post(format!("{}/api/representative/businesses", server.base_url))
        .bearer_auth(&account.token)
        .json(&json!({
            "businessName": "Bad Status Inc",
            "industry": "Software",
            "companySize": "1-10",
            "location": "Berlin",
            "status": "NOT_A_STATUS",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
