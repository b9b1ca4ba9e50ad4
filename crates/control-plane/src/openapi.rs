// OpenAPI specification generation
//
// This module defines the OpenAPI spec for the Eventdesk API.
// It is used by both the API server (for Swagger UI)
// and the export-openapi binary (for static document export).

use crate::api;
use crate::api::{ErrorResponse, ListResponse};
use eventdesk_core::{AccountRole, Event, EventDraft, EventStatus, FieldError};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the HTTP Basic scheme referenced by protected operations
struct BasicAuthAddon;

impl Modify for BasicAuthAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

/// OpenAPI documentation for the Eventdesk API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::create_event,
        api::events::list_events,
        api::events::get_event,
        api::accounts::create_account,
        api::accounts::get_current_account,
    ),
    components(
        schemas(
            Event, EventDraft, EventStatus, FieldError,
            api::events::EventResource, api::events::EventLinks, api::events::Link,
            ListResponse<api::events::EventResource>,
            AccountRole,
            api::accounts::CreateAccountRequest,
            api::accounts::AccountResponse,
            api::accounts::PrincipalResponse,
            ErrorResponse,
        )
    ),
    modifiers(&BasicAuthAddon),
    tags(
        (name = "events", description = "Event creation and queries"),
        (name = "accounts", description = "Account registration and the current principal")
    ),
    info(
        title = "Eventdesk API",
        version = "0.1.0",
        description = "API for publishing events with enrollment windows and managing accounts",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}
