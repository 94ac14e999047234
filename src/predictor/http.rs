// HTTP implementation of the Predictor trait.
//
// Talks to the prediction service's JSON API:
//   POST {base}/predict  {"text": "..."}  -> AnalysisResult
//   GET  {base}/                          -> {"status": "..."}
//
// A non-success status is a failure whose detail is the response body, or the
// status line when the body is empty.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::traits::{AnalysisResult, Predictor};
use crate::output::truncate_chars;

/// Default base URL of the prediction service.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8090";

/// Prediction service client.
pub struct HttpPredictor {
    client: Client,
    base_url: String,
}

impl HttpPredictor {
    /// Create a client for the service at `base_url`, giving up on any
    /// single request after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("toxiguard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Ask the service whether it is up. Returns its status message.
    pub async fn health(&self) -> Result<String> {
        let url = self.endpoint("");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach prediction service at {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{}", failure_detail(status, &body));
        }

        let health: HealthResponse = response
            .json()
            .await
            .context("Failed to parse health response")?;
        Ok(health.status)
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, text: &str) -> Result<AnalysisResult> {
        let url = self.endpoint("predict");

        let response = self
            .client
            .post(&url)
            .json(&PredictRequest { text })
            .send()
            .await
            .context("Failed to call prediction service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{}", failure_detail(status, &body));
        }

        let result: AnalysisResult = response
            .json()
            .await
            .context("Failed to parse prediction response")?;

        if result.confidence_out_of_range() {
            warn!(
                confidence = result.confidence,
                "Prediction service returned confidence outside [0, 1], clamping"
            );
        }

        debug!(
            toxic = result.toxic,
            confidence = result.confidence,
            abusive_words = result.abusive_words.len(),
            text_preview = %truncate_chars(text, 50),
            "Predicted text"
        );

        Ok(result.normalized())
    }
}

/// The failure detail for a non-success response: the body when there is
/// one, otherwise the status line.
pub fn failure_detail(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("Prediction service returned {status}")
    } else {
        body.to_string()
    }
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let predictor =
            HttpPredictor::new("http://localhost:8090/", Duration::from_secs(5)).unwrap();
        assert_eq!(predictor.base_url(), "http://localhost:8090");
        assert_eq!(predictor.endpoint("predict"), "http://localhost:8090/predict");
        assert_eq!(predictor.endpoint(""), "http://localhost:8090/");
    }

    #[test]
    fn failure_detail_prefers_body() {
        let detail = failure_detail(reqwest::StatusCode::BAD_GATEWAY, "model offline\n");
        assert_eq!(detail, "model offline");
    }

    #[test]
    fn failure_detail_falls_back_to_status() {
        let detail = failure_detail(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "  ");
        assert_eq!(
            detail,
            "Prediction service returned 500 Internal Server Error"
        );
    }
}
