use axum::{extract::State, Json};
use serde_json::json;
use tracing::info;

use crate::api::middleware::{ApiResult, AppState};
use crate::services::runner::ProcessReport;

/// POST /functions/process-jobs
///
/// Runs one batch of due scheduled jobs in-process. This is the function the
/// trigger client points at in a self-hosted deployment.
pub async fn run_process_jobs_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<ProcessReport>> {
    let report = state.runner.process_due().await?;

    info!("{}", report.message);
    Ok(Json(report))
}

/// POST /functions/cleanup-jobs
///
/// Deletes completed and failed jobs past the retention window.
pub async fn run_cleanup_jobs_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = state.runner.cleanup().await?;

    Ok(Json(json!({
        "message": format!("Deleted {} old jobs", deleted),
        "deleted": deleted,
    })))
}
