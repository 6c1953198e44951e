// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead repository trait for the durable lead ledger.

use async_trait::async_trait;

use crate::error::LeadbotError;
use crate::types::Lead;

/// Append-only lead ledger.
///
/// The production implementation writes rows to a Google Sheets range. The
/// current lead for a user is the most recently appended row with that
/// user id; earlier rows are never rewritten.
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Appends one lead row.
    async fn append(&self, lead: &Lead) -> Result<(), LeadbotError>;

    /// Returns the most recent lead row for the given user id, if any.
    async fn find_latest_by_user(&self, user_id: &str) -> Result<Option<Lead>, LeadbotError>;
}
