// Server configuration loaded from environment variables
//
// Authentication settings live in crate::auth::config.

use axum::http::HeaderValue;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";
pub const DEFAULT_LOG_FILTER: &str = "eventdesk_control_plane=debug,tower_http=debug";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen address
    pub bind_addr: String,
    /// Postgres URL; `None` selects the in-memory backend
    pub database_url: Option<String>,
    /// Optional prefix nested in front of the API routes, e.g. "/v2"
    pub api_prefix: String,
    /// Origins allowed by CORS; empty disables the CORS layer
    pub cors_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: None,
            api_prefix: String::new(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("BIND_ADDR")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.is_empty());

        // Example: API_PREFIX="/v2" results in routes like /v2/api/events
        let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();

        // Only needed when the UI is served from a different origin than the API
        // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
        let cors_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|s| parse_origins(&s))
            .unwrap_or_default();

        Self {
            bind_addr,
            database_url,
            api_prefix,
            cors_origins,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks and invalid values
pub fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}
