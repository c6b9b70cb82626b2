mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use helpers::*;
use serde_json::json;
use tower::ServiceExt;
use waggle::services::webhook_signature::sign_payload;

#[tokio::test]
async fn test_unsigned_callback_is_rejected() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let body = serde_json::to_string(&json!({
        "name": "slack.invite",
        "data": { "email": "ada@example.com" }
    }))
    .unwrap();

    // No X-Webhook-Signature header at all
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/jobs/process-immediate")
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_bad_signature_is_rejected() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let body = serde_json::to_string(&json!({
        "name": "slack.invite",
        "data": { "email": "ada@example.com" }
    }))
    .unwrap();

    let response = post_signed(app, &body, "sha256=deadbeef").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_signature_must_cover_the_exact_body() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let body = serde_json::to_string(&json!({
        "name": "slack.invite",
        "data": { "email": "ada@example.com" }
    }))
    .unwrap();
    let other = serde_json::to_string(&json!({
        "name": "slack.invite",
        "data": { "email": "eve@example.com" }
    }))
    .unwrap();

    // Signature for a different payload must not verify
    let response = post_signed(app, &body, &sign_payload(&other, TEST_SIGNING_KEY)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_envelope_without_name_or_data_is_rejected() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    for envelope in [
        json!({ "data": { "email": "ada@example.com" } }),
        json!({ "name": "", "data": {} }),
        json!({ "name": "slack.invite" }),
        json!({ "name": "slack.invite", "data": null }),
    ] {
        let body = serde_json::to_string(&envelope).unwrap();
        let signature = sign_payload(&body, TEST_SIGNING_KEY);

        let response = post_signed(app.clone(), &body, &signature).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Invalid job data" })
        );
    }

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_valid_signed_job_is_processed() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let body = serde_json::to_string(&json!({
        "name": "slack.invite",
        "data": { "email": "ada@example.com" }
    }))
    .unwrap();
    let signature = sign_payload(&body, TEST_SIGNING_KEY);

    let response = post_signed(app, &body, &signature).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "success": true, "result": { "message": "Job slack.invite processed" } })
    );

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_rotation_key_signature_is_accepted() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let body = serde_json::to_string(&json!({
        "name": "student.birthdate.daily",
        "data": {}
    }))
    .unwrap();
    let signature = sign_payload(&body, TEST_NEXT_SIGNING_KEY);

    let response = post_signed(app, &body, &signature).await;

    assert_eq!(response.status(), StatusCode::OK);

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_unknown_job_name_reports_processing_failure() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let body = serde_json::to_string(&json!({ "name": "bogus.job", "data": {} })).unwrap();
    let signature = sign_payload(&body, TEST_SIGNING_KEY);

    let response = post_signed(app, &body, &signature).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("unknown queue `bogus`"));

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_invalid_payload_reports_processing_failure() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    // Known queue, missing required field
    let body = serde_json::to_string(&json!({ "name": "slack.invite", "data": {} })).unwrap();
    let signature = sign_payload(&body, TEST_SIGNING_KEY);

    let response = post_signed(app, &body, &signature).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("slack.invite"));

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_process_sentinel_fans_out_to_batch_function() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(
        StatusCode::OK,
        json!({ "message": "No jobs to process", "processed": 0 }),
    )
    .await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let body =
        serde_json::to_string(&json!({ "name": "scheduled.job.process", "data": {} })).unwrap();
    let signature = sign_payload(&body, TEST_SIGNING_KEY);

    let response = post_signed(app, &body, &signature).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "success": true,
            "result": { "message": "No jobs to process", "processed": 0 }
        })
    );

    let requests = functions.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/process-jobs");
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer test-service-key")
    );

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_cleanup_sentinel_fans_out_to_cleanup_function() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(
        StatusCode::OK,
        json!({ "message": "Deleted 4 old jobs", "deleted": 4 }),
    )
    .await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let body = serde_json::to_string(&json!({ "name": "cleanup.old.jobs", "data": {} })).unwrap();
    let signature = sign_payload(&body, TEST_SIGNING_KEY);

    let response = post_signed(app, &body, &signature).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "success": true,
            "result": { "message": "Deleted 4 old jobs", "deleted": 4 }
        })
    );

    let requests = functions.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/cleanup-jobs");

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_callback_endpoint_answers_get_with_info_text() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let response = get(app, "/jobs/process-immediate").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        "Immediate job processing endpoint"
    );

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_root_and_health_endpoints() {
    let db = setup_test_db().await;
    let broker = CaptureServer::spawn(StatusCode::OK, json!({ "messageId": "m" })).await;
    let functions = CaptureServer::spawn(StatusCode::OK, json!({})).await;
    let app = build_test_app(db.clone(), &broker.base_url, &functions.base_url);

    let response = get(app.clone(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "Waggle Job Dispatch Service");

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");

    teardown_test_db(db).await;
}
