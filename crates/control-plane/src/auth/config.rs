// Authentication configuration loaded from environment variables.
// Decision: Default to "none" mode for local development
// Decision: ADMIN_EMAIL/ADMIN_PASSWORD seed an account at startup, they are never compared directly

/// Authentication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No authentication required (local development)
    #[default]
    None,
    /// HTTP Basic credentials checked against stored accounts
    Basic,
}

impl AuthMode {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "basic" => AuthMode::Basic,
            _ => AuthMode::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::None => "none",
            AuthMode::Basic => "basic",
        }
    }
}

/// Admin account to seed at startup
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Authentication mode
    pub mode: AuthMode,
    /// Admin account created on startup if missing
    pub admin: Option<AdminConfig>,
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mode = std::env::var("AUTH_MODE")
            .map(|s| AuthMode::from_str(&s))
            .unwrap_or_default();

        let admin = admin_from(
            std::env::var("ADMIN_EMAIL").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        );

        if mode == AuthMode::Basic && admin.is_none() {
            tracing::warn!(
                "AUTH_MODE=basic without ADMIN_EMAIL/ADMIN_PASSWORD; only existing accounts can sign in"
            );
        }

        Self { mode, admin }
    }

    /// Check if authentication is enabled
    pub fn is_enabled(&self) -> bool {
        self.mode != AuthMode::None
    }
}

fn admin_from(email: Option<String>, password: Option<String>) -> Option<AdminConfig> {
    match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Some(AdminConfig { email, password })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_mode_parsing() {
        assert_eq!(AuthMode::from_str("none"), AuthMode::None);
        assert_eq!(AuthMode::from_str("NONE"), AuthMode::None);
        assert_eq!(AuthMode::from_str("basic"), AuthMode::Basic);
        assert_eq!(AuthMode::from_str(" Basic "), AuthMode::Basic);
        assert_eq!(AuthMode::from_str("invalid"), AuthMode::None);
    }

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.mode, AuthMode::None);
        assert_eq!(config.mode.as_str(), "none");
        assert!(!config.is_enabled());
        assert!(config.admin.is_none());
    }

    #[test]
    fn test_basic_mode_enabled() {
        let config = AuthConfig {
            mode: AuthMode::Basic,
            ..Default::default()
        };
        assert!(config.is_enabled());
        assert_eq!(config.mode.as_str(), "basic");
    }

    #[test]
    fn test_admin_requires_both_values() {
        assert!(admin_from(Some("admin@example.com".into()), None).is_none());
        assert!(admin_from(None, Some("secret".into())).is_none());
        assert!(admin_from(Some("".into()), Some("secret".into())).is_none());

        let admin = admin_from(Some("admin@example.com".into()), Some("secret".into())).unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(admin.password, "secret");
    }
}
