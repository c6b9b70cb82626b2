use axum::{extract::State, Json};
use serde_json::Value;
use tracing::error;

use crate::api::middleware::{ApiError, ApiResult, AppState};

/// POST /cron/cleanup-old-jobs
///
/// Cron entry point. Fires the hosted cleanup function once and relays its
/// JSON response.
pub async fn cleanup_old_jobs_handler(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    match state.triggers.cleanup_jobs().await {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            error!("Job cleanup failed: {}", err);
            Err(ApiError::Internal("Job cleanup failed".to_string()))
        }
    }
}
