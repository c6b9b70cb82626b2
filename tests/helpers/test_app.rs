#![allow(dead_code)]
use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use waggle::api::build_router;
use waggle::api::middleware::AppState;
use waggle::database::Database;
use waggle::services::{
    register_builtin, BrokerClient, JobDispatcher, JobRunner, ProcessorRegistry, SigningKeys,
    TriggerClient,
};

pub const TEST_BROKER_TOKEN: &str = "test-broker-token";
pub const TEST_SIGNING_KEY: &str = "test-current-signing-key";
pub const TEST_NEXT_SIGNING_KEY: &str = "test-next-signing-key";
pub const TEST_CRON_SECRET: &str = "test-cron-secret";
pub const TEST_SERVICE_KEY: &str = "test-service-key";
pub const TEST_CALLBACK_URL: &str = "http://127.0.0.1:3000/jobs/process-immediate";
pub const TEST_RETENTION_DAYS: i64 = 7;

/// Build the production router against a test database, with the broker and
/// the functions host pointed at the given base URLs.
///
/// This mirrors the state construction in `bootstrap.rs` so integration tests
/// exercise the same middleware stack production uses.
pub fn build_test_app(db: Database, broker_url: &str, functions_url: &str) -> Router {
    build_router(build_test_state(db, broker_url, functions_url))
}

pub fn build_test_state(db: Database, broker_url: &str, functions_url: &str) -> AppState {
    let broker = BrokerClient::new(
        broker_url,
        TEST_BROKER_TOKEN.to_string(),
        TEST_CALLBACK_URL.to_string(),
    );
    let triggers = TriggerClient::new(functions_url, TEST_SERVICE_KEY.to_string());

    let mut registry = ProcessorRegistry::new();
    register_builtin(&mut registry);
    let registry = Arc::new(registry);

    let dispatcher = JobDispatcher::new(broker, db.clone());
    let runner = JobRunner::new(db.clone(), registry.clone(), TEST_RETENTION_DAYS);
    let signing_keys = SigningKeys::new(
        TEST_SIGNING_KEY.to_string(),
        Some(TEST_NEXT_SIGNING_KEY.to_string()),
    );

    AppState {
        db,
        dispatcher,
        registry,
        runner,
        triggers,
        signing_keys,
        cron_secret: TEST_CRON_SECRET.to_string(),
        functions_service_key: TEST_SERVICE_KEY.to_string(),
    }
}

/// One GET request through the router.
pub async fn get(app: Router, path: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// One POST request with an optional bearer token and no body.
pub async fn post(app: Router, path: &str, bearer: Option<&str>) -> Response {
    let mut builder = Request::builder().method("POST").uri(path);
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// One signed POST to the broker callback endpoint.
pub async fn post_signed(app: Router, body: &str, signature: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/jobs/process-immediate")
            .header("Content-Type", "application/json")
            .header("X-Webhook-Signature", signature)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body was not valid JSON")
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body was not valid UTF-8")
}
