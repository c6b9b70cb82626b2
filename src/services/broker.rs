use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

use crate::{JobError, JobRequest};

/// Publish acknowledgement from the broker.
#[derive(Debug, Deserialize)]
struct PublishReceipt {
    #[serde(rename = "messageId")]
    message_id: String,
}

/// Client for the HTTP message broker that carries immediate jobs.
///
/// A published message is delivered back to this service as a signed POST to
/// the callback URL, so the broker only ever sees the `{name, data}` envelope.
pub struct BrokerClient {
    http_client: Client,
    publish_url: String,
    token: String,
    callback_url: String,
}

impl BrokerClient {
    pub fn new(broker_url: &str, token: String, callback_url: String) -> Self {
        // Initialize reqwest client with 30-second timeout
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            publish_url: format!("{}/v2/publish", broker_url.trim_end_matches('/')),
            token,
            callback_url,
        }
    }

    /// Publish a job envelope. `delay` is in seconds and maps to an absolute
    /// not-before timestamp on the message.
    ///
    /// Returns the broker message id.
    pub async fn publish(&self, job: &JobRequest, delay: Option<i64>) -> Result<String, JobError> {
        let envelope = serde_json::to_value(job)
            .map_err(|e| JobError::Dispatch(format!("Failed to serialize job envelope: {}", e)))?;

        let mut message = json!({
            "destination": self.callback_url,
            "body": envelope,
        });
        if let Some(delay) = delay {
            message["notBefore"] = json!(chrono::Utc::now().timestamp() + delay);
        }

        let response = self
            .http_client
            .post(&self.publish_url)
            .bearer_auth(&self.token)
            .json(&message)
            .send()
            .await
            .map_err(|e| {
                let error_msg = if e.is_timeout() {
                    format!("Broker connection timeout after 30 seconds: {}", e)
                } else if e.is_connect() {
                    format!("Broker connection failed: {}", e)
                } else {
                    format!("Broker network error: {}", e)
                };
                warn!("Publish of {} failed: {}", job.name(), error_msg);
                JobError::Dispatch(error_msg)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_msg = match response.text().await {
                Ok(body) if body.len() > 500 => {
                    format!("Broker returned HTTP {}: {}", status.as_u16(), &body[..500])
                }
                Ok(body) => format!("Broker returned HTTP {}: {}", status.as_u16(), body),
                Err(_) => format!("Broker returned HTTP {}", status.as_u16()),
            };
            warn!("Publish of {} failed: {}", job.name(), error_msg);
            return Err(JobError::Dispatch(error_msg));
        }

        let receipt: PublishReceipt = response
            .json()
            .await
            .map_err(|e| JobError::Dispatch(format!("Invalid broker response: {}", e)))?;

        info!(
            "Published {} to broker, message id {}",
            job.name(),
            receipt.message_id
        );

        Ok(receipt.message_id)
    }
}

impl Clone for BrokerClient {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            publish_url: self.publish_url.clone(),
            token: self.token.clone(),
            callback_url: self.callback_url.clone(),
        }
    }
}
