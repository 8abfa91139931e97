use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::routing::{delete, get, post, put};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::roles::allow;
use crate::database::Db;
use crate::handlers::{admin, auth, business, contact, lifecycle, schedule};
use crate::middleware::{jwt_auth_middleware, require_role};
use crate::services::{
    BusinessService, ContactService, LifecycleService, ScheduleService, UserService,
};

/// Shared application state: the injected database handle plus one
/// registry per entity family.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub users: UserService,
    pub businesses: BusinessService,
    pub contacts: ContactService,
    pub lifecycle: LifecycleService,
    pub schedule: ScheduleService,
}

impl AppState {
    pub fn new(db: Db) -> Self {
        Self {
            users: UserService::new(db.clone()),
            businesses: BusinessService::new(db.clone()),
            contacts: ContactService::new(db.clone()),
            lifecycle: LifecycleService::new(db.clone()),
            schedule: ScheduleService::new(db.clone()),
            db,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .merge(auth_routes())
        // Role-gated groups
        .merge(admin_routes())
        .merge(representative_routes())
        .merge(contact_routes())
        .merge(schedule_routes())
        .merge(data_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/reset-password", post(auth::reset_password))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/users/:id/status", put(admin::change_user_status))
        .layer(axum::middleware::from_fn(|req: Request, next: Next| {
            require_role(allow::ADMIN_ONLY, req, next)
        }))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

/// Business and contact management surface for company representatives
/// (admins included).
fn representative_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/representative/businesses",
            post(business::add_business).get(business::get_all_businesses),
        )
        .route(
            "/api/representative/businesses/search",
            post(business::search_businesses_by_name),
        )
        .route(
            "/api/representative/businesses/by-status",
            post(business::get_businesses_by_status),
        )
        .route(
            "/api/representative/businesses/:id",
            put(business::update_business).get(business::get_business_by_id),
        )
        .route(
            "/api/representative/businesses/:id/status",
            put(business::change_business_status),
        )
        .route(
            "/api/representative/businesses/:id/interaction",
            put(business::change_business_last_interaction),
        )
        .route(
            "/api/representative/contacts",
            post(contact::add_contact).get(contact::get_all_contacts),
        )
        .route(
            "/api/representative/contacts/by-email",
            post(contact::get_contact_by_email),
        )
        .route(
            "/api/representative/contacts/by-status",
            post(contact::get_contacts_by_status),
        )
        .route("/api/representative/contacts/:id", put(contact::update_contact))
        .route(
            "/api/representative/contacts/:id/status",
            put(contact::change_contact_status),
        )
        .layer(axum::middleware::from_fn(|req: Request, next: Next| {
            require_role(allow::REPRESENTATIVE, req, next)
        }))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

/// Staff-facing contact surface: pagination, ownership listings, history
/// log maintenance and the privileged hard delete.
fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/api/contacts", get(contact::list_contacts))
        .route("/api/contacts/by-owner", post(contact::get_contacts_by_owner))
        .route("/api/contacts/status", post(contact::update_contact_status))
        .route("/api/contacts/:id", delete(contact::delete_contact))
        .route("/api/contacts/:id/notes", post(contact::add_note_to_contact))
        .route(
            "/api/contacts/:id/history/:sequence_id",
            delete(contact::delete_contact_history),
        )
        .layer(axum::middleware::from_fn(|req: Request, next: Next| {
            require_role(allow::STAFF, req, next)
        }))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/schedule/calls",
            post(schedule::schedule_calls).get(schedule::list_scheduled_calls),
        )
        .route("/api/schedule/calls/:id", delete(schedule::delete_scheduled_call))
        .layer(axum::middleware::from_fn(|req: Request, next: Next| {
            require_role(allow::STAFF, req, next)
        }))
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

/// Lifecycle operations. Soft delete is open to representatives; restore
/// and both purge paths are admin-only.
fn data_routes() -> Router<AppState> {
    let admin_only = Router::new()
        .route("/api/data/restore", put(lifecycle::restore))
        .route("/api/data/purge", delete(lifecycle::purge))
        .route("/api/data/purge-all", delete(lifecycle::purge_all))
        .layer(axum::middleware::from_fn(|req: Request, next: Next| {
            require_role(allow::ADMIN_ONLY, req, next)
        }));

    let representative = Router::new()
        .route("/api/data/soft", delete(lifecycle::soft_delete))
        .layer(axum::middleware::from_fn(|req: Request, next: Next| {
            require_role(allow::REPRESENTATIVE, req, next)
        }));

    admin_only
        .merge(representative)
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "CRM API (Rust)",
            "version": version,
            "description": "Multi-role CRM backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/api/auth/signup, /api/auth/login, /api/auth/reset-password (public)",
                "admin": "/api/admin/* (ADMIN)",
                "representative": "/api/representative/* (ADMIN, COMPANY_REPRESENTATIVE)",
                "contacts": "/api/contacts/* (ADMIN, MANAGEMENT, MARKETING_STAFF)",
                "schedule": "/api/schedule/* (ADMIN, MANAGEMENT, MARKETING_STAFF)",
                "data": "/api/data/* (lifecycle operations, role-gated per route)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
