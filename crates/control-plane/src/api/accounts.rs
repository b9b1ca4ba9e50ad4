// Account HTTP routes
// Decision: Registration is an admin operation whenever auth is enabled
// Decision: Password hashes never leave the service layer

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use eventdesk_core::{Account, AccountRole, NewAccount};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{ApiError, ErrorResponse};
use crate::auth::{AdminUser, AuthState, AuthUser, FromRef};
use crate::services::AccountService;

/// Request to register a new account
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAccountRequest {
    /// Email used as the username
    #[schema(example = "jinSeok@test.com")]
    pub email: String,
    /// Plain password; stored as an Argon2id hash
    #[schema(example = "jinSeok")]
    pub password: String,
    /// Roles granted to the account
    #[schema(example = json!(["ADMIN", "USER"]))]
    pub roles: Vec<AccountRole>,
}

/// Account as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<AccountRole>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            roles: account.roles.into_iter().collect(),
            created_at: account.created_at,
        }
    }
}

/// The authenticated principal
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrincipalResponse {
    #[schema(example = "jinSeok@test.com")]
    pub username: String,
    pub roles: Vec<AccountRole>,
    /// Authority strings derived from roles
    #[schema(example = json!(["ROLE_ADMIN", "ROLE_USER"]))]
    pub authorities: Vec<String>,
}

impl From<AuthUser> for PrincipalResponse {
    fn from(user: AuthUser) -> Self {
        let authorities = user.authorities();
        Self {
            username: user.username,
            roles: user.roles.into_iter().collect(),
            authorities,
        }
    }
}

/// App state for accounts routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<AccountService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(input: &AppState) -> Self {
        input.auth.clone()
    }
}

/// Create accounts routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/accounts", post(create_account))
        .route("/api/accounts/me", get(get_current_account))
        .with_state(state)
}

/// POST /api/accounts - Register an account
#[utoipa::path(
    post,
    path = "/api/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid account", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = [])),
    tag = "accounts"
)]
pub async fn create_account(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return Ok(ErrorResponse::new(rejection.body_text())
                .into_response(StatusCode::BAD_REQUEST)
                .into_response());
        }
    };

    let input = NewAccount::new(req.email, req.password, req.roles)?;
    let account = state.service.save_account(input).await?;
    tracing::info!(email = %account.email, by = %admin.username, "Account registered");

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))).into_response())
}

/// GET /api/accounts/me - Get the authenticated principal
#[utoipa::path(
    get,
    path = "/api/accounts/me",
    responses(
        (status = 200, description = "Current principal", body = PrincipalResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("basic_auth" = [])),
    tag = "accounts"
)]
pub async fn get_current_account(user: AuthUser) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(user))
}
