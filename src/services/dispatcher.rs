use serde_json::{json, Value};
use tracing::info;

use crate::services::broker::BrokerClient;
use crate::{Database, Delivery, EnqueueOptions, JobError, JobRequest, NewJob};

/// Entry point for enqueuing jobs.
///
/// Immediate jobs go out through the broker; everything else becomes a row
/// for the batch runner. Callers treat enqueue as fire-and-forget.
pub struct JobDispatcher {
    broker: BrokerClient,
    db: Database,
}

impl JobDispatcher {
    pub fn new(broker: BrokerClient, db: Database) -> Self {
        Self { broker, db }
    }

    /// Validate a raw `(name, data)` pair and enqueue it.
    pub async fn enqueue_raw(
        &self,
        name: &str,
        data: Value,
        options: EnqueueOptions,
    ) -> Result<(), JobError> {
        let job = JobRequest::parse(name, data)?;
        self.enqueue(&job, options).await
    }

    /// Enqueue a typed job on its delivery path.
    pub async fn enqueue(&self, job: &JobRequest, options: EnqueueOptions) -> Result<(), JobError> {
        let immediate = job.delivery() == Delivery::Immediate && !options.force_scheduled;

        if immediate {
            let message_id = self.broker.publish(job, options.delay).await?;
            info!(
                "Enqueued immediate job {} as broker message {}",
                job.name(),
                message_id
            );
            return Ok(());
        }

        let scheduled_at =
            (chrono::Utc::now() + chrono::Duration::seconds(options.delay.unwrap_or(0)))
                .to_rfc3339();

        let envelope = serde_json::to_value(job)
            .map_err(|e| JobError::Dispatch(format!("Failed to serialize job envelope: {}", e)))?;
        let data = envelope.get("data").cloned().unwrap_or_else(|| json!({}));

        let new_job = NewJob {
            name: job.name().to_string(),
            queue_name: job.queue().as_str().to_string(),
            data,
            priority: options.priority.unwrap_or(0),
            max_attempts: options.max_attempts.unwrap_or(3),
            scheduled_at,
        };

        let created = self.db.create_job(&new_job).await?;
        info!(
            "Enqueued scheduled job {} as {} on queue {}, due {}",
            created.name, created.id, created.queue_name, created.scheduled_at
        );

        Ok(())
    }
}

impl Clone for JobDispatcher {
    fn clone(&self) -> Self {
        Self {
            broker: self.broker.clone(),
            db: self.db.clone(),
        }
    }
}
