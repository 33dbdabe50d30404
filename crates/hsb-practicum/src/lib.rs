//! Homework-status API adapter.
//!
//! This crate implements the `hsb-core` StatusSource port over the
//! Practicum HTTP endpoint.

use std::time::Duration;

use async_trait::async_trait;

use hsb_core::{errors::Error, ports::StatusSource, Result};

#[derive(Clone, Debug)]
pub struct PracticumClient {
    endpoint: String,
    token: String,
    http: reqwest::Client,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            http,
        }
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    /// GET the status endpoint with `from_date` and an OAuth header.
    ///
    /// No retries here: the polling loop's next cycle is the retry.
    async fn fetch(&self, from_date: i64) -> Result<serde_json::Value> {
        let resp = self
            .http
            .get(&self.endpoint)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("OAuth {}", self.token),
            )
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| Error::Connection(format!("request to {} failed: {e}", self.endpoint)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Connection(format!("reading response body failed: {e}")))?;

        if status != reqwest::StatusCode::OK {
            return Err(Error::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}
