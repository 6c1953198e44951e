// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background job protocol traits: reminders and broadcast.

use async_trait::async_trait;

use crate::error::LeadbotError;
use crate::types::{BroadcastJob, ReminderJob};

/// Timed follow-up reminder protocol.
///
/// Implementations are backed by the durable store. When no store is
/// configured the engine simply holds no scheduler and reminders are
/// disabled, not erroring.
#[async_trait]
pub trait ReminderScheduler: Send + Sync {
    /// Creates the two follow-up jobs (+4h and +24h) for a user.
    ///
    /// Does not deduplicate against outstanding jobs for the same user.
    async fn schedule(&self, user_id: &str, chat_id: i64) -> Result<(), LeadbotError>;

    /// Removes all not-yet-due jobs for a user.
    async fn cancel(&self, user_id: &str) -> Result<(), LeadbotError>;

    /// Atomically reads and removes jobs due at or before now, up to `limit`.
    async fn pop_due(&self, limit: usize) -> Result<Vec<ReminderJob>, LeadbotError>;
}

/// Broadcast job queue.
#[async_trait]
pub trait BroadcastQueue: Send + Sync {
    /// Enqueues one broadcast job with the given message text.
    async fn enqueue(&self, text: &str) -> Result<(), LeadbotError>;

    /// Pops at most one pending job. `None` means the queue is empty.
    async fn pop(&self) -> Result<Option<BroadcastJob>, LeadbotError>;
}
