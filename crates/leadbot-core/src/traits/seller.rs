// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seller responder trait for LLM-backed sales replies.

use async_trait::async_trait;

use crate::error::LeadbotError;
use crate::types::SellerRequest;

/// Produces a sales reply for a free-form user message.
///
/// Failures carry a [`crate::SellerFailure`] kind so the engine can pick
/// the right degradation path (rate limits get the scheduling prompt,
/// everything else gets a static fallback).
#[async_trait]
pub trait SellerResponder: Send + Sync {
    /// Generates a reply for the given message and lead context.
    async fn reply(&self, request: &SellerRequest) -> Result<String, LeadbotError>;
}
