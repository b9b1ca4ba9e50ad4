// Router tests for the Eventdesk API
// Run with: cargo test -p eventdesk-control-plane --test api_test
// Uses the in-memory backend; no database or running server needed.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use eventdesk_control_plane::auth::{AuthConfig, AuthMode};
use eventdesk_control_plane::storage::StorageBackend;
use eventdesk_control_plane::{build_app, AppServices};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

// admin@test.com:adminpw
const ADMIN_BASIC: &str = "Basic YWRtaW5AdGVzdC5jb206YWRtaW5wdw==";
// user@test.com:userpw
const USER_BASIC: &str = "Basic dXNlckB0ZXN0LmNvbTp1c2VycHc=";

async fn app(mode: AuthMode) -> Router {
    let services = AppServices::new(StorageBackend::in_memory());
    services
        .accounts
        .ensure_admin("admin@test.com", "adminpw")
        .await
        .unwrap();
    let config = AuthConfig {
        mode,
        ..Default::default()
    };
    build_app(&services, config, "")
}

fn valid_event() -> Value {
    json!({
        "name": "Spring",
        "description": "Rest API Development with Spring",
        "beginEnrollmentDateTime": "2021-01-20T18:47:00",
        "closeEnrollmentDateTime": "2021-01-21T18:47:00",
        "beginEventDateTime": "2021-01-22T18:47:00",
        "endEventDateTime": "2021-01-23T18:47:00",
        "basePrice": 100,
        "maxPrice": 200,
        "limitOfEnrollment": 200,
        "location": "경기도 안양시 범계"
    })
}

fn post_json(uri: &str, body: &Value, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn error_fields(body: &Value) -> Vec<(String, String)> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .map(|e| {
                    (
                        e["field"].as_str().unwrap_or_default().to_string(),
                        e["code"].as_str().unwrap_or_default().to_string(),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_create_event() {
    let app = app(AuthMode::None).await;

    let response = app
        .oneshot(post_json("/api/events", &valid_event(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/hal+json"
    );
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let body = json_body(response).await;
    let id = body["id"].as_str().unwrap();
    assert_eq!(location, format!("/api/events/{}", id));
    assert_eq!(body["free"], false);
    assert_eq!(body["offline"], true);
    assert_eq!(body["eventStatus"], "DRAFT");
    assert_eq!(body["_links"]["self"]["href"], location.as_str());
}

#[tokio::test]
async fn test_create_event_with_minute_precision_timestamps() {
    let app = app(AuthMode::None).await;
    let mut event = valid_event();
    event["beginEnrollmentDateTime"] = json!("2021-01-20T18:47");
    event["closeEnrollmentDateTime"] = json!("2021-01-21T18:47");
    event["beginEventDateTime"] = json!("2021-01-22T18:47");
    event["endEventDateTime"] = json!("2021-01-23T18:47");

    let response = app
        .oneshot(post_json("/api/events", &event, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["beginEnrollmentDateTime"], "2021-01-20T18:47:00");
    assert_eq!(body["endEventDateTime"], "2021-01-23T18:47:00");
}

#[tokio::test]
async fn test_location_resolves_to_created_event() {
    let app = app(AuthMode::None).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/events", &valid_event(), None))
        .await
        .unwrap();
    let location = response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string();
    let created = json_body(response).await;

    let response = app.oneshot(get(&location, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = json_body(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_event_with_server_computed_fields() {
    let app = app(AuthMode::None).await;
    let mut event = valid_event();
    event["free"] = json!(true);
    event["offline"] = json!(false);

    let response = app
        .oneshot(post_json("/api/events", &event, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let fields = error_fields(&json_body(response).await);
    assert!(fields.contains(&("free".to_string(), "server_computed".to_string())));
    assert!(fields.contains(&("offline".to_string(), "server_computed".to_string())));
}

#[tokio::test]
async fn test_create_event_empty_input() {
    let app = app(AuthMode::None).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/events", &json!({}), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(!error_fields(&body).is_empty());

    // Nothing was stored
    let response = app.oneshot(get("/api/events", None)).await.unwrap();
    let list = json_body(response).await;
    assert_eq!(list["data"], json!([]));
}

#[tokio::test]
async fn test_create_event_wrong_input() {
    let app = app(AuthMode::None).await;
    let mut event = valid_event();
    for field in [
        "beginEnrollmentDateTime",
        "closeEnrollmentDateTime",
        "beginEventDateTime",
        "endEventDateTime",
    ] {
        event[field] = json!("2021-01-20T18:47:00");
    }
    event["basePrice"] = json!(10000);

    let response = app
        .oneshot(post_json("/api/events", &event, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let fields = error_fields(&json_body(response).await);
    assert!(fields.contains(&("basePrice".to_string(), "exceeds_max_price".to_string())));
}

#[tokio::test]
async fn test_create_event_malformed_json() {
    let app = app(AuthMode::None).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/events")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut event = valid_event();
    event["unexpected"] = json!(1);
    let response = app
        .oneshot(post_json("/api/events", &event, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_event() {
    let app = app(AuthMode::None).await;

    let response = app
        .oneshot(get(
            "/api/events/0190b3a2-7c4e-7f1a-9d2b-3c4d5e6f7a8b",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_basic_auth_protects_event_creation() {
    let app = app(AuthMode::Basic).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/events", &valid_event(), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Basic realm=\"eventdesk\""
    );

    let response = app
        .clone()
        .oneshot(post_json("/api/events", &valid_event(), Some(ADMIN_BASIC)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Reads stay public
    let response = app.oneshot(get("/api/events", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = json_body(response).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_account_registration_and_me() {
    let app = app(AuthMode::Basic).await;
    let account = json!({
        "email": "user@test.com",
        "password": "userpw",
        "roles": ["USER"]
    });

    let response = app
        .clone()
        .oneshot(post_json("/api/accounts", &account, Some(ADMIN_BASIC)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    assert_eq!(created["email"], "user@test.com");
    assert!(created.get("password").is_none());

    // Same email again
    let response = app
        .clone()
        .oneshot(post_json("/api/accounts", &account, Some(ADMIN_BASIC)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(get("/api/accounts/me", Some(USER_BASIC)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me = json_body(response).await;
    assert_eq!(me["username"], "user@test.com");
    assert_eq!(me["authorities"], json!(["ROLE_USER"]));

    // Non-admins cannot register accounts
    let other = json!({ "email": "x@test.com", "password": "pw", "roles": ["USER"] });
    let response = app
        .oneshot(post_json("/api/accounts", &other, Some(USER_BASIC)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_account_registration_invalid_input() {
    let app = app(AuthMode::None).await;

    let response = app
        .oneshot(post_json(
            "/api/accounts",
            &json!({ "email": "not-an-email", "password": "", "roles": [] }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let fields: Vec<String> = error_fields(&json_body(response).await)
        .into_iter()
        .map(|(field, _)| field)
        .collect();
    assert!(fields.contains(&"email".to_string()));
    assert!(fields.contains(&"password".to_string()));
    assert!(fields.contains(&"roles".to_string()));
}

#[tokio::test]
async fn test_me_requires_credentials() {
    let app = app(AuthMode::Basic).await;

    let response = app
        .clone()
        .oneshot(get("/api/accounts/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // admin@test.com:wrong
    let response = app
        .oneshot(get(
            "/api/accounts/me",
            Some("Basic YWRtaW5AdGVzdC5jb206d3Jvbmc="),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_api_prefix_applies_to_links() {
    let services = AppServices::new(StorageBackend::in_memory());
    let app = build_app(&services, AuthConfig::default(), "/v2");

    let response = app
        .oneshot(post_json("/v2/api/events", &valid_event(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/v2/api/events/"));
}
