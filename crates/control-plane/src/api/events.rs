// Event HTTP routes
// Decision: Event bodies are HAL documents carrying a self link
// Decision: Creation is protected by AuthUser, reads are public

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use eventdesk_core::{DomainError, Event, EventDraft};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{ApiError, ErrorResponse, ListResponse};
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::services::EventService;

/// Media type of HAL documents
pub const HAL_JSON: &str = "application/hal+json";

/// Link to a resource
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Link {
    #[schema(example = "/api/events/0190b3a2-7c4e-7f1a-9d2b-3c4d5e6f7a8b")]
    pub href: String,
}

/// HAL `_links` section of an event
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
}

/// Event rendered as a HAL resource
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EventResource {
    #[serde(flatten)]
    pub event: Event,
    #[serde(rename = "_links")]
    pub links: EventLinks,
}

impl EventResource {
    pub fn new(event: Event, href: String) -> Self {
        Self {
            event,
            links: EventLinks {
                self_link: Link { href },
            },
        }
    }
}

/// App state for events routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<EventService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(input: &AppState) -> Self {
        input.auth.clone()
    }
}

/// Create events routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/events", post(create_event).get(list_events))
        .route("/api/events/:event_id", get(get_event))
        .with_state(state)
}

/// Collection path as seen by the client, including any API prefix
fn collection_path(uri: &OriginalUri) -> &str {
    uri.path().trim_end_matches('/')
}

fn hal_response(status: StatusCode, location: Option<&str>, body: EventResource) -> Response {
    let mut response = (status, Json(body)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON));
    if let Some(location) = location.and_then(|l| HeaderValue::from_str(l).ok()) {
        headers.insert(header::LOCATION, location);
    }
    response
}

/// POST /api/events - Create a new event
///
/// The request must not carry server-computed fields (`id`, `free`,
/// `offline`, `eventStatus`). Every violation is reported in one response.
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = EventDraft,
    responses(
        (status = 201, description = "Event created", body = EventResource, content_type = "application/hal+json",
            headers(("Location" = String, description = "URI of the created event"))),
        (status = 400, description = "Invalid event", body = ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("basic_auth" = [])),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    uri: OriginalUri,
    payload: Result<Json<EventDraft>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected event payload");
            return Ok(ErrorResponse::new(rejection.body_text())
                .into_response(StatusCode::BAD_REQUEST)
                .into_response());
        }
    };

    tracing::debug!(principal = %user.username, "Creating event");
    let event = state.service.create(draft).await?;

    let href = format!("{}/{}", collection_path(&uri), event.id);
    Ok(hal_response(
        StatusCode::CREATED,
        Some(&href),
        EventResource::new(event, href.clone()),
    ))
}

/// GET /api/events - List events, newest first
#[utoipa::path(
    get,
    path = "/api/events",
    responses(
        (status = 200, description = "List of events", body = ListResponse<EventResource>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    uri: OriginalUri,
) -> Result<Json<ListResponse<EventResource>>, ApiError> {
    let base = collection_path(&uri);
    let events = state
        .service
        .list()
        .await?
        .into_iter()
        .map(|event| {
            let href = format!("{}/{}", base, event.id);
            EventResource::new(event, href)
        })
        .collect::<Vec<_>>();

    Ok(Json(ListResponse::new(events)))
}

/// GET /api/events/{event_id} - Get event by ID
#[utoipa::path(
    get,
    path = "/api/events/{event_id}",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResource, content_type = "application/hal+json"),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    uri: OriginalUri,
) -> Result<Response, ApiError> {
    let event = state
        .service
        .get(event_id)
        .await?
        .ok_or_else(|| DomainError::event_not_found(event_id))?;

    let href = collection_path(&uri).to_string();
    Ok(hal_response(StatusCode::OK, None, EventResource::new(event, href)))
}
