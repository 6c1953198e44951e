// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording reminder-scheduler and broadcast-queue mocks.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadbot_core::{BroadcastJob, BroadcastQueue, LeadbotError, ReminderJob, ReminderScheduler};

/// A reminder scheduler that records schedule/cancel calls.
pub struct MockReminders {
    scheduled: Arc<Mutex<Vec<(String, i64)>>>,
    cancelled: Arc<Mutex<Vec<String>>>,
}

impl MockReminders {
    pub fn new() -> Self {
        Self {
            scheduled: Arc::new(Mutex::new(Vec::new())),
            cancelled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All (user_id, chat_id) schedule calls so far.
    pub async fn scheduled(&self) -> Vec<(String, i64)> {
        self.scheduled.lock().await.clone()
    }

    /// All cancelled user ids so far.
    pub async fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().await.clone()
    }
}

impl Default for MockReminders {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReminderScheduler for MockReminders {
    async fn schedule(&self, user_id: &str, chat_id: i64) -> Result<(), LeadbotError> {
        self.scheduled
            .lock()
            .await
            .push((user_id.to_string(), chat_id));
        Ok(())
    }

    async fn cancel(&self, user_id: &str) -> Result<(), LeadbotError> {
        self.cancelled.lock().await.push(user_id.to_string());
        Ok(())
    }

    async fn pop_due(&self, _limit: usize) -> Result<Vec<ReminderJob>, LeadbotError> {
        Ok(Vec::new())
    }
}

/// A broadcast queue that records enqueued texts.
pub struct MockBroadcast {
    enqueued: Arc<Mutex<VecDeque<String>>>,
}

impl MockBroadcast {
    pub fn new() -> Self {
        Self {
            enqueued: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// All enqueued texts so far, in order.
    pub async fn enqueued(&self) -> Vec<String> {
        self.enqueued.lock().await.iter().cloned().collect()
    }
}

impl Default for MockBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BroadcastQueue for MockBroadcast {
    async fn enqueue(&self, text: &str) -> Result<(), LeadbotError> {
        self.enqueued.lock().await.push_back(text.to_string());
        Ok(())
    }

    async fn pop(&self) -> Result<Option<BroadcastJob>, LeadbotError> {
        Ok(self.enqueued.lock().await.pop_front().map(|text| BroadcastJob {
            id: "job:mock".to_string(),
            text,
        }))
    }
}
