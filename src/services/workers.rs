use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

use crate::services::registry::{JobProcessor, ProcessorRegistry};
use crate::{JobError, JobRequest, Queue};

/// Acknowledge-only processor. Logs the job and reports it processed.
///
/// Queues keep this stub until a real worker takes them over; replacing it is
/// a `register` call for that queue.
pub struct AckProcessor;

#[async_trait]
impl JobProcessor for AckProcessor {
    async fn process(&self, job: &JobRequest) -> Result<Value, JobError> {
        info!("Processing job: {}", job.name());

        Ok(json!({ "message": format!("Job {} processed", job.name()) }))
    }
}

/// Cover every queue with the builtin processor.
pub fn register_builtin(registry: &mut ProcessorRegistry) {
    let ack = Arc::new(AckProcessor);
    for queue in Queue::ALL {
        registry.register(queue, ack.clone());
    }
}
