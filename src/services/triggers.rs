use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

use crate::JobError;

/// Client for the externally hosted batch functions.
///
/// The cron endpoints do not run batches in-process; they fire the hosted
/// function and relay whatever JSON it returns.
pub struct TriggerClient {
    http_client: Client,
    base_url: String,
    service_key: String,
}

impl TriggerClient {
    pub fn new(base_url: &str, service_key: String) -> Self {
        // Initialize reqwest client with 30-second timeout
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    /// Fire the scheduled-batch function.
    pub async fn process_jobs(&self) -> Result<Value, JobError> {
        self.invoke("process-jobs").await
    }

    /// Fire the retention-cleanup function.
    pub async fn cleanup_jobs(&self) -> Result<Value, JobError> {
        self.invoke("cleanup-jobs").await
    }

    async fn invoke(&self, function_name: &str) -> Result<Value, JobError> {
        let url = format!("{}/{}", self.base_url, function_name);

        info!("Triggering function {}", function_name);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| {
                let error_msg = if e.is_timeout() {
                    format!("Function {} timed out: {}", function_name, e)
                } else if e.is_connect() {
                    format!("Connection to function {} failed: {}", function_name, e)
                } else {
                    format!("Network error calling function {}: {}", function_name, e)
                };
                warn!("{}", error_msg);
                JobError::Dispatch(error_msg)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_msg = match response.text().await {
                Ok(body) if body.len() > 500 => format!(
                    "Function {} returned HTTP {}: {}",
                    function_name,
                    status.as_u16(),
                    &body[..500]
                ),
                Ok(body) => format!(
                    "Function {} returned HTTP {}: {}",
                    function_name,
                    status.as_u16(),
                    body
                ),
                Err(_) => format!("Function {} returned HTTP {}", function_name, status.as_u16()),
            };
            warn!("{}", error_msg);
            return Err(JobError::Dispatch(error_msg));
        }

        response.json().await.map_err(|e| {
            JobError::Dispatch(format!(
                "Invalid response from function {}: {}",
                function_name, e
            ))
        })
    }
}

impl Clone for TriggerClient {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
            service_key: self.service_key.clone(),
        }
    }
}
