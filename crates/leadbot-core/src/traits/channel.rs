// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat transport and operator notification traits.

use async_trait::async_trait;

use crate::error::LeadbotError;
use crate::types::Lead;

/// Outbound messaging seam for the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a plain text message.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), LeadbotError>;

    /// Sends a question the user is expected to answer by replying to it.
    ///
    /// On Telegram this is a force-reply message; the prompt text later
    /// comes back as `reply_to_text` and drives step recovery.
    async fn send_prompt(&self, chat_id: i64, text: &str) -> Result<(), LeadbotError>;

    /// Sends a document by URL with a caption.
    async fn send_document(
        &self,
        chat_id: i64,
        url: &str,
        caption: &str,
    ) -> Result<(), LeadbotError>;

    /// Sends a photo by URL with a caption.
    async fn send_photo(&self, chat_id: i64, url: &str, caption: &str)
    -> Result<(), LeadbotError>;
}

/// Operator-facing notifications.
///
/// Implementations with no operator chat configured are no-ops.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a formatted new-lead card to the operator chat.
    async fn notify_lead(&self, lead: &Lead) -> Result<(), LeadbotError>;

    /// Sends a free-form operator message (e.g. a confirmed call slot).
    async fn notify_text(&self, text: &str) -> Result<(), LeadbotError>;
}
