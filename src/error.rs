use crate::models::Queue;

/// Failures surfaced by the dispatch layer.
///
/// `UnknownQueue` and `SchemaValidation` are caller bugs and must never be
/// retried. `Dispatch` means the broker (or a trigger target) rejected or
/// dropped the request; since real-time delivery is at-most-once, the job may
/// be lost. `Persistence` wraps job store failures.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("unknown queue `{prefix}` for job `{name}`")]
    UnknownQueue { name: String, prefix: String },

    #[error("invalid payload for job `{name}`: {reason}")]
    SchemaValidation { name: String, reason: String },

    #[error("dispatch failed: {0}")]
    Dispatch(String),

    #[error("job store error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("no processor registered for queue `{0}`")]
    NoProcessor(Queue),
}

impl JobError {
    /// Whether a job that failed with this error may be attempted again.
    pub fn is_retryable(&self) -> bool {
        match self {
            JobError::UnknownQueue { .. } | JobError::SchemaValidation { .. } => false,
            JobError::Dispatch(_) | JobError::Persistence(_) | JobError::NoProcessor(_) => true,
        }
    }
}
