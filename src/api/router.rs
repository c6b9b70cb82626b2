use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::api::middleware::{require_cron_secret, require_service_key, AppState};
use crate::api::{cron, functions, jobs};

pub fn build_router(state: AppState) -> Router {
    // Cron endpoints (require the scheduler's shared secret)
    let cron_routes = Router::new()
        .route("/jobs/process", post(jobs::process_scheduled_handler))
        .route(
            "/cron/cleanup-old-jobs",
            post(cron::cleanup_old_jobs_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_cron_secret,
        ));

    // Batch function endpoints (require the service key)
    let function_routes = Router::new()
        .route(
            "/functions/process-jobs",
            post(functions::run_process_jobs_handler),
        )
        .route(
            "/functions/cleanup-jobs",
            post(functions::run_cleanup_jobs_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_service_key,
        ));

    // Public routes; the broker callback authenticates by signature
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/jobs/process-immediate",
            post(jobs::process_immediate_handler).get(jobs::process_immediate_info_handler),
        )
        .merge(cron_routes)
        .merge(function_routes)
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root_handler() -> &'static str {
    "Waggle Job Dispatch Service"
}

async fn health_handler() -> &'static str {
    "OK"
}
