// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording chat transport and operator notifier mocks.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadbot_core::{ChatTransport, Lead, LeadbotError, Notifier};

/// One captured outbound send.
#[derive(Debug, Clone, PartialEq)]
pub enum SentItem {
    Text { chat_id: i64, text: String },
    Prompt { chat_id: i64, text: String },
    Document { chat_id: i64, url: String, caption: String },
    Photo { chat_id: i64, url: String, caption: String },
}

impl SentItem {
    /// The message or caption text of this item.
    pub fn text(&self) -> &str {
        match self {
            SentItem::Text { text, .. } | SentItem::Prompt { text, .. } => text,
            SentItem::Document { caption, .. } | SentItem::Photo { caption, .. } => caption,
        }
    }
}

/// A chat transport that records every send instead of delivering it.
///
/// Individual chat ids can be marked as failing to simulate per-recipient
/// delivery errors during broadcast fan-out.
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<SentItem>>>,
    failing_chats: Arc<Mutex<Vec<i64>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing_chats: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make sends to the given chat id fail.
    pub async fn fail_chat(&self, chat_id: i64) {
        self.failing_chats.lock().await.push(chat_id);
    }

    /// All captured sends in order.
    pub async fn sent(&self) -> Vec<SentItem> {
        self.sent.lock().await.clone()
    }

    /// Texts of all captured sends in order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|s| s.text().to_string())
            .collect()
    }

    async fn record(&self, chat_id: i64, item: SentItem) -> Result<(), LeadbotError> {
        if self.failing_chats.lock().await.contains(&chat_id) {
            return Err(LeadbotError::Channel {
                message: format!("simulated send failure for chat {chat_id}"),
                source: None,
            });
        }
        self.sent.lock().await.push(item);
        Ok(())
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), LeadbotError> {
        self.record(
            chat_id,
            SentItem::Text {
                chat_id,
                text: text.to_string(),
            },
        )
        .await
    }

    async fn send_prompt(&self, chat_id: i64, text: &str) -> Result<(), LeadbotError> {
        self.record(
            chat_id,
            SentItem::Prompt {
                chat_id,
                text: text.to_string(),
            },
        )
        .await
    }

    async fn send_document(
        &self,
        chat_id: i64,
        url: &str,
        caption: &str,
    ) -> Result<(), LeadbotError> {
        self.record(
            chat_id,
            SentItem::Document {
                chat_id,
                url: url.to_string(),
                caption: caption.to_string(),
            },
        )
        .await
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        url: &str,
        caption: &str,
    ) -> Result<(), LeadbotError> {
        self.record(
            chat_id,
            SentItem::Photo {
                chat_id,
                url: url.to_string(),
                caption: caption.to_string(),
            },
        )
        .await
    }
}

/// An operator notifier that records every notification.
pub struct MockNotifier {
    leads: Arc<Mutex<Vec<Lead>>>,
    texts: Arc<Mutex<Vec<String>>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            leads: Arc::new(Mutex::new(Vec::new())),
            texts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All lead notifications received so far.
    pub async fn leads(&self) -> Vec<Lead> {
        self.leads.lock().await.clone()
    }

    /// All text notifications received so far.
    pub async fn texts(&self) -> Vec<String> {
        self.texts.lock().await.clone()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify_lead(&self, lead: &Lead) -> Result<(), LeadbotError> {
        self.leads.lock().await.push(lead.clone());
        Ok(())
    }

    async fn notify_text(&self, text: &str) -> Result<(), LeadbotError> {
        self.texts.lock().await.push(text.to_string());
        Ok(())
    }
}
