use crate::{api::middleware::error::ApiError, database::Database};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub dispatcher: crate::services::JobDispatcher,
    pub registry: Arc<crate::services::ProcessorRegistry>,
    pub runner: crate::services::JobRunner,
    pub triggers: crate::services::TriggerClient,
    pub signing_keys: crate::services::SigningKeys,
    pub cron_secret: String,
    pub functions_service_key: String,
}

/// Extract a bearer token from the Authorization header
fn bearer_token(request: &Request) -> Result<&str, ApiError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    if let Some(auth_value) = auth_header {
        if let Some(token) = auth_value.strip_prefix("Bearer ") {
            Ok(token)
        } else {
            Err(ApiError::Unauthorized)
        }
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Require the cron shared secret on scheduler-facing endpoints
pub async fn require_cron_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)?;

    if token != state.cron_secret {
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Require the service key on the batch function endpoints
pub async fn require_service_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)?;

    if token != state.functions_service_key {
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}
