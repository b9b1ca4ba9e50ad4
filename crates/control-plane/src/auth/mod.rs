// Authentication module
// Decision: Basic credentials resolved through AccountService, anonymous admin when disabled

pub mod config;
pub mod middleware;

pub use config::{AdminConfig, AuthConfig, AuthMode};
pub use middleware::{AdminUser, AuthError, AuthMethod, AuthState, AuthUser, FromRef};
