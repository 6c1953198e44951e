// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock seller responder for deterministic testing.
//!
//! `MockSeller` implements `SellerResponder` with pre-configured responses,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadbot_core::{LeadbotError, SellerFailure, SellerRequest, SellerResponder};

/// A mock seller that returns pre-configured responses.
///
/// Responses are popped from a FIFO queue. When the queue is empty,
/// a default "mock reply" text is returned. Every request is recorded
/// for later inspection.
pub struct MockSeller {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<SellerRequest>>>,
    failure: Arc<Mutex<Option<SellerFailure>>>,
}

impl MockSeller {
    /// Create a new mock seller with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock seller pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Make every subsequent call fail with the given failure kind.
    pub async fn fail_with(&self, kind: SellerFailure) {
        *self.failure.lock().await = Some(kind);
    }

    /// All requests received so far.
    pub async fn requests(&self) -> Vec<SellerRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockSeller {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SellerResponder for MockSeller {
    async fn reply(&self, request: &SellerRequest) -> Result<String, LeadbotError> {
        self.requests.lock().await.push(request.clone());

        if let Some(kind) = *self.failure.lock().await {
            return Err(LeadbotError::Seller {
                kind,
                message: "simulated seller failure".to_string(),
            });
        }

        Ok(self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock reply".to_string()))
    }
}
