// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI chat-completions API.
//!
//! Failure modes map onto [`SellerFailure`]: a 429 is surfaced as
//! `RateLimited` without retry, a request timeout as `TimedOut`, and a
//! server error is retried once before surfacing as `Failed`.

use std::time::Duration;

use leadbot_core::{LeadbotError, SellerFailure};
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

const API_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn seller_err(kind: SellerFailure, message: String) -> LeadbotError {
    LeadbotError::Seller { kind, message }
}

/// OpenAI API client with one-shot retry on server errors.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    max_retries: u32,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Result<Self, LeadbotError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| LeadbotError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                seller_err(
                    SellerFailure::Failed,
                    format!("failed to build HTTP client: {e}"),
                )
            })?;

        Ok(Self {
            client,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends a completion request.
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LeadbotError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after server error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(request)
                .send()
                .await
                .map_err(|e| {
                    let kind = if e.is_timeout() {
                        SellerFailure::TimedOut
                    } else {
                        SellerFailure::Failed
                    };
                    seller_err(kind, format!("HTTP request failed: {e}"))
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| {
                    seller_err(
                        SellerFailure::Failed,
                        format!("failed to read response body: {e}"),
                    )
                })?;
                return serde_json::from_str(&body).map_err(|e| {
                    seller_err(
                        SellerFailure::Failed,
                        format!("failed to parse API response: {e}"),
                    )
                });
            }

            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "OpenAI API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };

            if status.as_u16() == 429 {
                return Err(seller_err(SellerFailure::RateLimited, detail));
            }
            if status.is_server_error() && attempt < self.max_retries {
                warn!(status = %status, "server error, will retry");
                last_error = Some(seller_err(SellerFailure::Failed, detail));
                continue;
            }
            return Err(seller_err(SellerFailure::Failed, detail));
        }

        Err(last_error.unwrap_or_else(|| {
            seller_err(
                SellerFailure::Failed,
                "completion request failed after retries".into(),
            )
        }))
    }
}
