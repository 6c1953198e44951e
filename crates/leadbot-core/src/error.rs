// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the leadbot workspace.

use thiserror::Error;

/// Distinguishes seller (LLM completion) failure modes.
///
/// The conversation engine degrades differently depending on the kind:
/// a rate limit falls back to the ask-for-a-time prompt, everything else
/// falls back to a static apology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellerFailure {
    /// The completion service rejected the request due to rate limiting.
    RateLimited,
    /// The request exceeded its wall-clock budget.
    TimedOut,
    /// Any other completion failure (bad request, server error, malformed reply).
    Failed,
}

/// The primary error type used across all leadbot collaborator traits.
#[derive(Debug, Error)]
pub enum LeadbotError {
    /// Configuration errors (invalid TOML, missing required credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable store errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Chat transport errors (send failure, malformed update).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Seller responder errors, tagged with the failure mode.
    #[error("seller error ({kind:?}): {message}")]
    Seller {
        kind: SellerFailure,
        message: String,
    },

    /// Lead repository errors (spreadsheet append/lookup failure).
    #[error("repository error: {message}")]
    Repository {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LeadbotError {
    /// True if this is a seller rate-limit failure.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            LeadbotError::Seller {
                kind: SellerFailure::RateLimited,
                ..
            }
        )
    }
}
