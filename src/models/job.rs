use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Convert from string (for SQLx)
impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "processing" => JobStatus::Processing,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }
}

/// A persisted scheduled job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub name: String,
    pub queue_name: String,
    pub data: Value,
    pub priority: i64,
    pub max_attempts: i64,
    pub attempts: i64,
    pub status: JobStatus,
    pub scheduled_at: String, // ISO8601 string from DB
    pub processed_at: Option<String>, // ISO8601 string from DB
    pub created_at: String,
    pub error: Option<String>,
}

// Helper methods for timestamps (converting String <-> DateTime<Utc>)
impl Job {
    pub fn scheduled_at_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.scheduled_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn processed_at_datetime(&self) -> Option<DateTime<Utc>> {
        self.processed_at
            .as_ref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn has_attempts_left(&self) -> bool {
        self.attempts < self.max_attempts
    }
}

/// Insert payload for the scheduled backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub name: String,
    pub queue_name: String,
    pub data: Value,
    pub priority: i64,
    pub max_attempts: i64,
    pub scheduled_at: String,
}

/// Caller-supplied enqueue knobs. All optional; `delay` is in seconds.
#[derive(Debug, Clone, Default)]
pub struct EnqueueOptions {
    pub priority: Option<i64>,
    pub max_attempts: Option<i64>,
    pub delay: Option<i64>,
    pub force_scheduled: bool,
}

/// Job counts grouped by status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStats {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub failed: i64,
    pub total: i64,
}
