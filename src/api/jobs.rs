use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::api::middleware::{ApiError, ApiResult, AppState};
use crate::models::JobRequest;

/// Broker-cron sentinel that fans out to the scheduled batch function.
pub const PROCESS_SENTINEL: &str = "scheduled.job.process";
/// Broker-cron sentinel that fans out to the cleanup function.
pub const CLEANUP_SENTINEL: &str = "cleanup.old.jobs";

/// POST /jobs/process-immediate
///
/// Broker callback delivering an immediate job envelope. The signature is
/// verified over the raw body bytes before anything is parsed or dispatched.
pub async fn process_immediate_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let payload = std::str::from_utf8(&body)
        .map_err(|_| ApiError::BadRequest("Invalid job data".to_string()))?;

    let signature = headers
        .get("X-Webhook-Signature")
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    if !state.signing_keys.verify(payload, signature) {
        return Err(ApiError::Unauthorized);
    }

    let envelope: Value = serde_json::from_str(payload)
        .map_err(|_| ApiError::BadRequest("Invalid job data".to_string()))?;

    let name = envelope
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let data = envelope.get("data").cloned().unwrap_or(Value::Null);

    if name.is_empty() || data.is_null() {
        return Err(ApiError::BadRequest("Invalid job data".to_string()));
    }

    info!("Received immediate job: {}", name);

    // The scheduler publishes two sentinel names through the broker; they
    // fan out to the batch functions instead of a queue processor.
    let result = match name.as_str() {
        PROCESS_SENTINEL => state.triggers.process_jobs().await,
        CLEANUP_SENTINEL => state.triggers.cleanup_jobs().await,
        _ => match JobRequest::parse(&name, data) {
            Ok(job) => state.registry.dispatch(&job).await,
            Err(err) => Err(err),
        },
    };

    match result {
        Ok(value) => Ok((
            StatusCode::OK,
            Json(json!({ "success": true, "result": value })),
        )),
        Err(err) => {
            error!("Immediate job {} failed: {}", name, err);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": err.to_string() })),
            ))
        }
    }
}

/// GET /jobs/process-immediate
pub async fn process_immediate_info_handler() -> &'static str {
    "Immediate job processing endpoint"
}

/// POST /jobs/process
///
/// Cron entry point. Fires the hosted batch function once and relays its
/// JSON response.
pub async fn process_scheduled_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    match state.triggers.process_jobs().await {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            error!("Scheduled job processing failed: {}", err);
            Err(ApiError::Internal(
                "Scheduled job processing failed".to_string(),
            ))
        }
    }
}
