// Common DTOs for public API
//
// These types are shared across multiple API endpoints.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use eventdesk_core::{DomainError, FieldError, ValidationErrors};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Challenge sent with 401 responses
pub const BASIC_AUTH_CHALLENGE: &str = "Basic realm=\"eventdesk\"";

/// Standard error response for API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
    /// Field-level violations, present for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(error: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            error: error.into(),
            errors,
        }
    }

    /// Convert to axum response tuple
    pub fn into_response(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        (status, Json(self))
    }
}

/// Response wrapper for list endpoints.
/// All list endpoints return responses wrapped in a `data` field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListResponse<T> {
    /// Array of items returned by the list operation.
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Domain error translated into an HTTP response
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError(DomainError::BadRequest(errors))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            DomainError::NotFound(msg) => {
                ErrorResponse::new(msg).into_response(StatusCode::NOT_FOUND).into_response()
            }
            DomainError::BadRequest(errors) => {
                ErrorResponse::with_errors("Invalid request", errors.into_iter().collect())
                    .into_response(StatusCode::BAD_REQUEST)
                    .into_response()
            }
            DomainError::Conflict(msg) => {
                ErrorResponse::new(msg).into_response(StatusCode::CONFLICT).into_response()
            }
            DomainError::Unauthorized(msg) => {
                let mut response = ErrorResponse::new(msg)
                    .into_response(StatusCode::UNAUTHORIZED)
                    .into_response();
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(BASIC_AUTH_CHALLENGE),
                );
                response
            }
            err @ (DomainError::Storage(_) | DomainError::Internal(_)) => {
                tracing::error!("Request failed: {}", err);
                ErrorResponse::new("Internal server error")
                    .into_response(StatusCode::INTERNAL_SERVER_ERROR)
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_omits_empty_errors() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "boom" }));
    }

    #[test]
    fn test_status_mapping() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "required", "name is required");

        let cases = [
            (DomainError::account_not_found("x@y.z"), StatusCode::NOT_FOUND),
            (DomainError::BadRequest(errors), StatusCode::BAD_REQUEST),
            (DomainError::conflict("dup"), StatusCode::CONFLICT),
            (DomainError::unauthorized("no"), StatusCode::UNAUTHORIZED),
            (DomainError::storage("db down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_unauthorized_sends_basic_challenge() {
        let response = ApiError(DomainError::unauthorized("no")).into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"eventdesk\""
        );
    }
}
