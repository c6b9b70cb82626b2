use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{JobError, JobRequest, Queue};

/// Handles every job of one queue.
#[async_trait]
pub trait JobProcessor: Send + Sync {
    async fn process(&self, job: &JobRequest) -> Result<Value, JobError>;
}

/// Queue to processor routing table, built once at startup.
///
/// Both delivery paths go through the same table: the webhook handler for
/// immediate jobs and the batch runner for scheduled ones.
pub struct ProcessorRegistry {
    processors: HashMap<Queue, Arc<dyn JobProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self {
            processors: HashMap::new(),
        }
    }

    /// Register a processor for a queue. A later registration for the same
    /// queue replaces the earlier one.
    pub fn register(&mut self, queue: Queue, processor: Arc<dyn JobProcessor>) {
        if self.processors.insert(queue, processor).is_some() {
            warn!("Replacing processor for queue {}", queue);
        }
    }

    /// Route a job to the processor of its queue.
    pub async fn dispatch(&self, job: &JobRequest) -> Result<Value, JobError> {
        let queue = job.queue();
        let processor = self
            .processors
            .get(&queue)
            .ok_or(JobError::NoProcessor(queue))?;

        debug!("Dispatching {} on queue {}", job.name(), queue);
        processor.process(job).await
    }

    /// Startup check that every queue is covered. Run this before accepting
    /// traffic so a missing processor fails the boot instead of a request.
    pub fn assert_complete(&self) -> Result<(), JobError> {
        for queue in Queue::ALL {
            if !self.processors.contains_key(&queue) {
                return Err(JobError::NoProcessor(queue));
            }
        }
        Ok(())
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
