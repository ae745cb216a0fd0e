//! HTTP client for the custody service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::{CustodyClient, CustodyError, TransferReceipt, TransferRequest};
use crate::error::AppError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to the custody service's REST API. One instance is shared across
/// the app; `reqwest::Client` pools connections internally.
pub struct HttpCustodyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCustodyClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::config(format!("failed to build custody HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl CustodyClient for HttpCustodyClient {
    async fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, CustodyError> {
        let url = format!("{}/transfers", self.base_url);
        debug!(token_id = request.token_id, collection = %request.collection, "submitting custody transfer");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CustodyError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<TransferReceipt>()
                .await
                .map_err(|e| CustodyError::Transport(format!("malformed custody response: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        let summary = summarize(status, &body);
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(CustodyError::Unavailable(summary))
        } else {
            Err(CustodyError::Rejected(summary))
        }
    }
}

fn summarize(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("custody service returned {status}");
    }
    let mut excerpt: String = trimmed.chars().take(200).collect();
    if excerpt.len() < trimmed.len() {
        excerpt.push('…');
    }
    format!("custody service returned {status}: {excerpt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strips_trailing_slash() {
        let client = HttpCustodyClient::new("https://custody.example.com/", "key").unwrap();
        assert_eq!(client.base_url, "https://custody.example.com");
    }

    #[test]
    fn summarize_truncates_long_bodies() {
        let long = "x".repeat(500);
        let summary = summarize(StatusCode::BAD_REQUEST, &long);
        assert!(summary.contains("400"));
        assert!(summary.len() < 300);
    }

    #[test]
    fn summarize_handles_empty_bodies() {
        let summary = summarize(StatusCode::SERVICE_UNAVAILABLE, "  ");
        assert_eq!(summary, "custody service returned 503 Service Unavailable");
    }
}
