#![allow(dead_code)]
use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::{Json, Router};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// One request recorded by [`CaptureServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Stand-in for the broker and the hosted functions: records every request
/// and answers with a canned status and JSON body.
pub struct CaptureServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl CaptureServer {
    pub async fn spawn(status: StatusCode, response_body: Value) -> Self {
        let requests: Arc<Mutex<Vec<CapturedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let app = Router::new().fallback(move |request: Request| {
            let recorded = recorded.clone();
            let response_body = response_body.clone();
            async move {
                let (parts, body) = request.into_parts();
                let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

                recorded.lock().unwrap().push(CapturedRequest {
                    method: parts.method.to_string(),
                    path: parts.uri.path().to_string(),
                    authorization: parts
                        .headers
                        .get("Authorization")
                        .and_then(|h| h.to_str().ok())
                        .map(String::from),
                    body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
                });

                (status, Json(response_body))
            }
        });

        // Bind to an ephemeral port so tests can run in parallel
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().expect("failed to read local addr");
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            requests,
            handle,
        }
    }

    /// Everything received so far.
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for CaptureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
