use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::services::registry::ProcessorRegistry;
use crate::{Database, Job, JobError, JobRequest, JobStatus};

/// Rows picked up per batch.
pub const DEFAULT_BATCH_SIZE: i64 = 10;

/// Result of one job within a batch.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub id: String,
    pub name: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch summary, serialized verbatim into the function response.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub message: String,
    pub processed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<JobOutcome>,
}

/// Drains due scheduled jobs through the processor registry.
pub struct JobRunner {
    db: Database,
    registry: Arc<ProcessorRegistry>,
    retention_days: i64,
}

impl JobRunner {
    pub fn new(db: Database, registry: Arc<ProcessorRegistry>, retention_days: i64) -> Self {
        Self {
            db,
            registry,
            retention_days,
        }
    }

    /// Run one batch: claim due pending jobs and process each claimed one.
    ///
    /// A claim that affects no row means another runner got the job first;
    /// the row is skipped without an attempt charge here.
    pub async fn process_due(&self) -> Result<ProcessReport, JobError> {
        let candidates = self.db.due_jobs(DEFAULT_BATCH_SIZE).await?;

        let mut results = Vec::new();
        for job in candidates {
            if !job.has_attempts_left() {
                continue;
            }

            if !self.db.claim_job(&job.id).await? {
                debug!("Job {} claimed elsewhere, skipping", job.id);
                continue;
            }

            results.push(self.run_job(&job).await?);
        }

        let message = if results.is_empty() {
            "No jobs to process".to_string()
        } else {
            format!("Processed {} jobs", results.len())
        };

        Ok(ProcessReport {
            message,
            processed: results.len(),
            results,
        })
    }

    /// Delete completed and failed jobs past the retention window.
    pub async fn cleanup(&self) -> Result<u64, JobError> {
        let removed = self.db.delete_old_jobs(self.retention_days).await?;
        info!(
            "Cleaned up {} jobs older than {} days",
            removed, self.retention_days
        );
        Ok(removed)
    }

    async fn run_job(&self, job: &Job) -> Result<JobOutcome, JobError> {
        // The claim already bumped the attempt counter
        let attempts = job.attempts + 1;

        let outcome = match JobRequest::parse(&job.name, job.data.clone()) {
            Ok(request) => self.registry.dispatch(&request).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(result) => {
                self.db.complete_job(&job.id).await?;
                info!("Job {} ({}) completed", job.id, job.name);

                Ok(JobOutcome {
                    id: job.id.clone(),
                    name: job.name.clone(),
                    status: JobStatus::Completed,
                    result: Some(result),
                    error: None,
                })
            }
            Err(err) => {
                let retry = err.is_retryable() && attempts < job.max_attempts;
                let status = if retry {
                    JobStatus::Pending
                } else {
                    JobStatus::Failed
                };
                let message = err.to_string();

                self.db.fail_job(&job.id, status, &message).await?;

                if retry {
                    warn!(
                        "Job {} ({}) failed attempt {}/{}, re-queued: {}",
                        job.id, job.name, attempts, job.max_attempts, message
                    );
                } else {
                    error!(
                        "Job {} ({}) failed permanently after attempt {}/{}: {}",
                        job.id, job.name, attempts, job.max_attempts, message
                    );
                }

                Ok(JobOutcome {
                    id: job.id.clone(),
                    name: job.name.clone(),
                    status,
                    result: None,
                    error: Some(message),
                })
            }
        }
    }
}

impl Clone for JobRunner {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            registry: self.registry.clone(),
            retention_days: self.retention_days,
        }
    }
}
