// Authentication extractors
// Decision: Credentials travel as HTTP Basic and are checked against stored accounts
// Decision: In "none" mode, create an anonymous admin context

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};
use eventdesk_core::{AccountDetails, AccountRole, DomainError};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::config::{AuthConfig, AuthMode};
use crate::api::common::BASIC_AUTH_CHALLENGE;
use crate::services::AccountService;

/// Authentication error
#[derive(Debug, Clone, Serialize)]
pub struct AuthError {
    pub error: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl AuthError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn forbidden(message: &str) -> Self {
        Self {
            error: message.to_string(),
            status: StatusCode::FORBIDDEN,
        }
    }

    pub fn internal() -> Self {
        Self {
            error: "Internal server error".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut response = (status, Json(self)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_AUTH_CHALLENGE),
            );
        }
        response
    }
}

/// Authenticated principal extracted from request
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Account email
    pub username: String,
    /// Granted roles
    pub roles: BTreeSet<AccountRole>,
    /// Authentication method used
    pub auth_method: AuthMethod,
}

impl AuthUser {
    /// Create an anonymous user for no-auth mode
    pub fn anonymous() -> Self {
        Self {
            username: "anonymous".to_string(),
            // Full access in no-auth mode
            roles: [AccountRole::Admin, AccountRole::User].into_iter().collect(),
            auth_method: AuthMethod::None,
        }
    }

    pub fn has_role(&self, role: AccountRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(AccountRole::Admin)
    }

    /// Authority strings, e.g. `ROLE_ADMIN`
    pub fn authorities(&self) -> Vec<String> {
        self.roles.iter().map(AccountRole::authority).collect()
    }
}

impl From<AccountDetails> for AuthUser {
    fn from(details: AccountDetails) -> Self {
        Self {
            username: details.username,
            roles: details.roles,
            auth_method: AuthMethod::Basic,
        }
    }
}

/// Authentication method used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// No authentication (anonymous)
    None,
    /// HTTP Basic credentials
    Basic,
}

/// Auth state shared across routes
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub accounts: Arc<AccountService>,
}

impl AuthState {
    pub fn new(config: AuthConfig, accounts: Arc<AccountService>) -> Self {
        Self { config, accounts }
    }
}

/// Extractor for authenticated user
/// This is required - returns 401 if not authenticated
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        extract_auth_user(parts, &auth_state).await
    }
}

/// Helper trait for extracting AuthState from application state
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AuthState> for AuthState {
    fn from_ref(input: &AuthState) -> Self {
        input.clone()
    }
}

/// Extract authenticated user from request
async fn extract_auth_user(parts: &Parts, auth_state: &AuthState) -> Result<AuthUser, AuthError> {
    // In no-auth mode, always return anonymous user
    if auth_state.config.mode == AuthMode::None {
        return Ok(AuthUser::anonymous());
    }

    let Some(credentials) = parts.headers.typed_get::<Authorization<Basic>>() else {
        return Err(AuthError::unauthorized("Authentication required"));
    };

    match auth_state
        .accounts
        .authenticate(credentials.username(), credentials.password())
        .await
    {
        Ok(details) => Ok(AuthUser::from(details)),
        Err(DomainError::Unauthorized(msg)) => Err(AuthError::unauthorized(&msg)),
        Err(e) => {
            tracing::error!("Failed to authenticate account: {}", e);
            Err(AuthError::internal())
        }
    }
}

/// Require admin role extractor
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AuthError::forbidden("Admin access required"));
        }

        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Argon2PasswordEncoder, StorageBackend};
    use axum::http::Request;
    use eventdesk_core::NewAccount;

    fn auth_state(mode: AuthMode) -> AuthState {
        let accounts = Arc::new(AccountService::new(
            Arc::new(StorageBackend::in_memory()),
            Arc::new(Argon2PasswordEncoder),
        ));
        AuthState::new(
            AuthConfig {
                mode,
                ..Default::default()
            },
            accounts,
        )
    }

    fn parts_with(authorization: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/events");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_auth_user_anonymous() {
        let user = AuthUser::anonymous();
        assert!(user.is_admin());
        assert!(user.has_role(AccountRole::User));
        assert_eq!(user.auth_method, AuthMethod::None);
    }

    #[test]
    fn test_auth_error() {
        let error = AuthError::unauthorized("Test error");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert_eq!(error.error, "Test error");

        let forbidden = AuthError::forbidden("Forbidden");
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
        let response = forbidden.into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[tokio::test]
    async fn test_none_mode_is_anonymous() {
        let state = auth_state(AuthMode::None);
        let user = extract_auth_user(&parts_with(None), &state).await.unwrap();
        assert_eq!(user.username, "anonymous");
    }

    #[tokio::test]
    async fn test_basic_mode_requires_credentials() {
        let state = auth_state(AuthMode::Basic);
        let err = extract_auth_user(&parts_with(None), &state)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_basic_mode_checks_password() {
        let state = auth_state(AuthMode::Basic);
        let account = NewAccount::new("user@test.com", "secret", [AccountRole::User]).unwrap();
        state.accounts.save_account(account).await.unwrap();

        // user@test.com:secret
        let ok = parts_with(Some("Basic dXNlckB0ZXN0LmNvbTpzZWNyZXQ="));
        let user = extract_auth_user(&ok, &state).await.unwrap();
        assert_eq!(user.username, "user@test.com");
        assert_eq!(user.auth_method, AuthMethod::Basic);
        assert!(!user.is_admin());

        // user@test.com:wrong
        let bad = parts_with(Some("Basic dXNlckB0ZXN0LmNvbTp3cm9uZw=="));
        let err = extract_auth_user(&bad, &state).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
