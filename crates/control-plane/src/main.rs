// Eventdesk API server
// Decision: Postgres when DATABASE_URL is set, in-memory dev mode otherwise
// Decision: Auth mode comes from AUTH_MODE (none | basic)

use anyhow::{Context, Result};
use axum::http::{header, Method};
use eventdesk_control_plane::auth::AuthConfig;
use eventdesk_control_plane::config::{ServerConfig, DEFAULT_LOG_FILTER};
use eventdesk_control_plane::storage::StorageBackend;
use eventdesk_control_plane::{build_app, AppServices};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    // RUST_LOG overrides the default filter
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let dotenv = dotenvy::dotenv();

    init_tracing();
    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    tracing::info!("eventdesk-control-plane starting...");

    let server_config = ServerConfig::from_env();

    // Initialize storage
    let storage = match &server_config.database_url {
        Some(url) => {
            let storage = StorageBackend::postgres(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database, migrations applied");
            storage
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            StorageBackend::in_memory()
        }
    };
    let services = AppServices::new(storage);

    // Load authentication configuration
    let auth_config = AuthConfig::from_env();
    tracing::info!(
        mode = auth_config.mode.as_str(),
        enabled = auth_config.is_enabled(),
        "Authentication configured"
    );

    // Seed admin account if configured
    if let Some(admin) = &auth_config.admin {
        let created = services
            .accounts
            .ensure_admin(&admin.email, &admin.password)
            .await
            .context("Failed to seed admin account")?;
        if created {
            tracing::info!(email = %admin.email, "Admin account created");
        } else {
            tracing::debug!(email = %admin.email, "Admin account already present");
        }
    }

    if !server_config.api_prefix.is_empty() {
        tracing::info!(prefix = %server_config.api_prefix, "API prefix configured");
    }

    let app = build_app(&services, auth_config, &server_config.api_prefix);

    // Add CORS layer only if origins are configured
    let app = if !server_config.cors_origins.is_empty() {
        tracing::info!(origins = ?server_config.cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(server_config.cors_origins.clone()))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .expose_headers([header::LOCATION])
                .allow_credentials(true),
        )
    } else {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(&server_config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_config.bind_addr))?;
    tracing::info!("HTTP server listening on {}", server_config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
