// Eventdesk Control Plane Library
// Decision: Shared library for binaries (API server, OpenAPI export) and router tests

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Authentication module
pub mod auth;

// Server configuration
pub mod config;

// Services layer
pub mod services;
pub use services::{AccountService, EventService};

// Storage layer
pub mod storage;

// OpenAPI spec generation
pub mod openapi;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{AuthConfig, AuthState};
use crate::openapi::ApiDoc;
use crate::storage::{Argon2PasswordEncoder, StorageBackend};

/// Services wired over one storage backend
#[derive(Clone)]
pub struct AppServices {
    pub accounts: Arc<AccountService>,
    pub events: Arc<EventService>,
    storage_kind: &'static str,
}

impl AppServices {
    pub fn new(storage: StorageBackend) -> Self {
        let storage_kind = storage.kind();
        let storage = Arc::new(storage);
        Self {
            accounts: Arc::new(AccountService::new(
                storage.clone(),
                Arc::new(Argon2PasswordEncoder),
            )),
            events: Arc::new(EventService::new(storage)),
            storage_kind,
        }
    }

    pub fn storage_kind(&self) -> &'static str {
        self.storage_kind
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    auth_mode: &'static str,
    storage: &'static str,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    auth_mode: &'static str,
    storage: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        auth_mode: state.auth_mode,
        storage: state.storage,
    })
}

/// Build the application router: health (not prefixed), API routes under
/// `api_prefix`, and Swagger UI. Transport layers (CORS, tracing) are added
/// by the caller.
pub fn build_app(services: &AppServices, auth_config: AuthConfig, api_prefix: &str) -> Router {
    let health_state = HealthState {
        auth_mode: auth_config.mode.as_str(),
        storage: services.storage_kind(),
    };
    let auth_state = AuthState::new(auth_config, services.accounts.clone());

    let events_state = api::events::AppState::new(services.events.clone(), auth_state.clone());
    let accounts_state = api::accounts::AppState::new(services.accounts.clone(), auth_state);

    let api_routes = Router::new()
        .merge(api::events::routes(events_state))
        .merge(api::accounts::routes(accounts_state));

    Router::new()
        .route("/health", get(health).with_state(health_state))
        .merge(build_router_with_prefix(api_routes, api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
}

/// Build router with optional API prefix (extracted for testing)
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
