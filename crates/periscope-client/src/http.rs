//! HTTP implementation of [`AgentBackend`] using the backend's REST API.

use crate::backend::AgentBackend;
use async_trait::async_trait;
use periscope_core::snapshot::AnswerSnapshot;
use periscope_core::{PeriscopeError, Result};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

/// Timeout for the small, frequent requests (health, poll, screenshot, stop).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for query submission. The backend holds the request open while
/// agents start working, so this one is generous.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(120);

/// REST client for the agent backend.
#[derive(Clone)]
pub struct HttpAgentBackend {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct QueryRequest {
    query: String,
    tts_enabled: bool,
}

impl HttpAgentBackend {
    /// Creates a client for the backend at `base_url`.
    ///
    /// A trailing slash on the base URL is tolerated and stripped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PeriscopeError::backend(status.as_u16(), error_text));
        }
        Ok(response)
    }
}

#[async_trait]
impl AgentBackend for HttpAgentBackend {
    async fn check_health(&self) -> Result<()> {
        let response = self
            .client
            .get(self.url("/health"))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn latest_answer(&self) -> Result<AnswerSnapshot> {
        let response = self
            .client
            .get(self.url("/latest_answer"))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        response.json::<AnswerSnapshot>().await.map_err(|e| {
            PeriscopeError::transport(format!("Failed to parse latest_answer response: {}", e))
        })
    }

    async fn submit_query(&self, query: &str) -> Result<AnswerSnapshot> {
        let request_body = QueryRequest {
            query: query.to_string(),
            tts_enabled: false,
        };

        let response = self
            .client
            .post(self.url("/query"))
            .json(&request_body)
            .timeout(SUBMIT_TIMEOUT)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        response.json::<AnswerSnapshot>().await.map_err(|e| {
            PeriscopeError::transport(format!("Failed to parse query response: {}", e))
        })
    }

    async fn request_stop(&self) -> Result<()> {
        let response = self
            .client
            .get(self.url("/stop"))
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_screenshot(&self, timestamp_ms: i64) -> Result<Vec<u8>> {
        let timestamp = timestamp_ms.to_string();
        let response = self
            .client
            .get(self.url("/screenshots/updated_screen.png"))
            .query(&[("timestamp", timestamp.as_str())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await.map_err(|e| {
            PeriscopeError::transport(format!("Failed to read screenshot body: {}", e))
        })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_paths() {
        let backend = HttpAgentBackend::new("http://127.0.0.1:8000");
        assert_eq!(
            backend.url("/latest_answer"),
            "http://127.0.0.1:8000/latest_answer"
        );
    }

    #[test]
    fn test_trailing_slash_is_stripped() {
        let backend = HttpAgentBackend::new("http://127.0.0.1:8000/");
        assert_eq!(backend.url("/health"), "http://127.0.0.1:8000/health");
    }

    #[test]
    fn test_query_request_body_shape() {
        let body = QueryRequest {
            query: "list files".to_string(),
            tts_enabled: false,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["query"], "list files");
        assert_eq!(value["tts_enabled"], false);
    }
}
