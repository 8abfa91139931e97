use crm_api_rust::app::{app, AppState};
use crm_api_rust::config;
use crm_api_rust::database::Db;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting CRM API in {:?} mode", config.environment);

    // Block on the database; connection failures retry indefinitely with a
    // fixed backoff instead of terminating the process.
    let db = Db::connect_with_retry().await;
    let state = AppState::new(db);

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("🚀 CRM API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
