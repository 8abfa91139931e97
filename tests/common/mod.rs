use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/crm-api-rust");
        cmd.env("PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL and JWT_SECRET
        // from .env (loaded by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            match client.get(&url).send().await {
                Ok(resp) => {
                    // Consider server ready on any non-404 response
                    if resp.status() == StatusCode::OK
                        || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                    {
                        return Ok(());
                    }
                }
                Err(_) => {}
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// A registered account plus its bearer token.
#[allow(dead_code)]
pub struct TestAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Register a fresh account with the given role and log it in.
#[allow(dead_code)]
pub async fn register_and_login(server: &TestServer, role: &str) -> Result<TestAccount> {
    let client = reqwest::Client::new();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let username = format!("it_{}_{}", role.to_lowercase(), &suffix[..12]);
    let email = format!("{}@test.example", username);
    let password = "password123".to_string();

    let res = client
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&json!({
            "username": username,
            "email": email,
            "password": password,
            "role": role,
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "signup failed: {}",
        res.text().await?
    );

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "identifier": username, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed");
    let body: Value = res.json().await?;
    let token = body["token"]
        .as_str()
        .context("login response carried no token")?
        .to_string();

    Ok(TestAccount {
        username,
        email,
        password,
        token,
    })
}

/// Create a business through the API, returning its JSON representation.
#[allow(dead_code)]
pub async fn create_business(server: &TestServer, token: &str, name: &str) -> Result<Value> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/api/representative/businesses", server.base_url))
        .bearer_auth(token)
        .json(&json!({
            "businessName": name,
            "industry": "Software",
            "companySize": "11-50",
            "location": "Berlin",
            "status": "LEAD",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "business creation failed: {}",
        res.text().await?
    );
    let body: Value = res.json().await?;
    Ok(body["business"].clone())
}

/// Create a contact linked to a business, returning its JSON representation.
#[allow(dead_code)]
pub async fn create_contact(
    server: &TestServer,
    token: &str,
    business_id: &str,
    full_name: &str,
) -> Result<Value> {
    let client = reqwest::Client::new();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let res = client
        .post(format!("{}/api/representative/contacts", server.base_url))
        .bearer_auth(token)
        .json(&json!({
            "fullName": full_name,
            "roleTitle": "CTO",
            "company": business_id,
            "email": format!("contact_{}@test.example", &suffix[..12]),
            "phone": "+49301234567",
            "department": "Engineering",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "contact creation failed: {}",
        res.text().await?
    );
    let body: Value = res.json().await?;
    Ok(body["contact"].clone())
}

/// Fetch a business by id.
#[allow(dead_code)]
pub async fn fetch_business(server: &TestServer, token: &str, id: &str) -> Result<Value> {
    let client = reqwest::Client::new();
    let res = client
        .get(format!(
            "{}/api/representative/businesses/{}",
            server.base_url, id
        ))
        .bearer_auth(token)
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "business fetch failed");
    let body: Value = res.json().await?;
    Ok(body["business"].clone())
}
