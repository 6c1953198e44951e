// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Follow-up reminder scheduling over the key-value substrate.
//!
//! Each job is a hash at `r:{user}:{kind}:{due_ms}` with fields `userId`,
//! `chatId`, `kind`, and a member of the `reminders:due` sorted set scored
//! by the due timestamp in epoch milliseconds. Cancelling scans the next
//! year of the due index and removes every key with the user's prefix.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use leadbot_core::{
    ChatTransport, KvStore, LeadbotError, ReminderJob, ReminderKind, ReminderScheduler,
};
use tracing::warn;

const DUE_ZSET: &str = "reminders:due";
const YEAR_MS: i64 = 365 * 24 * 60 * 60 * 1000;

pub const REMINDER_4H: &str = "Напомню: остались вопросы? Могу предложить короткий созвон на 10–15 минут, чтобы подобрать формат под вашу задачу.";
pub const REMINDER_24H: &str = "Если тема актуальна, предлагаю созвониться — подберём подходящий вариант и даты на 10–15 минут. Подойдёт сегодня/завтра в 12:00 или 16:00?";

fn job_key(user_id: &str, kind: ReminderKind, due_ms: i64) -> String {
    format!("r:{user_id}:{kind}:{due_ms}")
}

pub struct SqliteReminders {
    kv: Arc<dyn KvStore>,
}

impl SqliteReminders {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Schedule both follow-ups relative to `now_ms`.
    pub async fn schedule_at(
        &self,
        user_id: &str,
        chat_id: i64,
        now_ms: i64,
    ) -> Result<(), LeadbotError> {
        for kind in [ReminderKind::FourHours, ReminderKind::TwentyFourHours] {
            let due_ms = now_ms + kind.delay_ms();
            let key = job_key(user_id, kind, due_ms);
            self.kv
                .hash_set(
                    &key,
                    &[
                        ("userId".to_string(), user_id.to_string()),
                        ("chatId".to_string(), chat_id.to_string()),
                        ("kind".to_string(), kind.to_string()),
                    ],
                )
                .await?;
            self.kv.zset_add(DUE_ZSET, &key, due_ms).await?;
        }
        Ok(())
    }

    /// Remove all outstanding jobs for a user, scanning a year ahead.
    pub async fn cancel_at(&self, user_id: &str, now_ms: i64) -> Result<(), LeadbotError> {
        let prefix = format!("r:{user_id}:");
        let keys = self
            .kv
            .zset_range_by_score(DUE_ZSET, 0, now_ms + YEAR_MS, None)
            .await?;
        let mine: Vec<String> = keys
            .into_iter()
            .filter(|key| key.starts_with(&prefix))
            .collect();
        if mine.is_empty() {
            return Ok(());
        }
        self.kv.zset_remove(DUE_ZSET, &mine).await?;
        for key in &mine {
            self.kv.delete(key).await?;
        }
        Ok(())
    }

    /// Drain jobs due at or before `now_ms`, up to `limit`.
    ///
    /// Keys whose hash has gone missing are dropped from the index and
    /// skipped rather than surfaced as errors.
    pub async fn pop_due_at(
        &self,
        limit: usize,
        now_ms: i64,
    ) -> Result<Vec<ReminderJob>, LeadbotError> {
        let keys = self
            .kv
            .zset_range_by_score(DUE_ZSET, 0, now_ms, Some(limit))
            .await?;
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        self.kv.zset_remove(DUE_ZSET, &keys).await?;

        let mut jobs = Vec::with_capacity(keys.len());
        for key in keys {
            let fields = self.kv.hash_get_all(&key).await?;
            self.kv.delete(&key).await?;

            let mut user_id = None;
            let mut chat_id = None;
            let mut kind = None;
            for (field, value) in fields {
                match field.as_str() {
                    "userId" => user_id = Some(value),
                    "chatId" => chat_id = value.parse::<i64>().ok(),
                    "kind" => kind = value.parse::<ReminderKind>().ok(),
                    _ => {}
                }
            }
            let (Some(user_id), Some(chat_id), Some(kind)) = (user_id, chat_id, kind) else {
                warn!(key = %key, "dropping reminder with incomplete payload");
                continue;
            };
            jobs.push(ReminderJob {
                id: key,
                user_id,
                chat_id,
                kind,
            });
        }
        Ok(jobs)
    }
}

#[async_trait]
impl ReminderScheduler for SqliteReminders {
    async fn schedule(&self, user_id: &str, chat_id: i64) -> Result<(), LeadbotError> {
        self.schedule_at(user_id, chat_id, Utc::now().timestamp_millis())
            .await
    }

    async fn cancel(&self, user_id: &str) -> Result<(), LeadbotError> {
        self.cancel_at(user_id, Utc::now().timestamp_millis()).await
    }

    async fn pop_due(&self, limit: usize) -> Result<Vec<ReminderJob>, LeadbotError> {
        self.pop_due_at(limit, Utc::now().timestamp_millis()).await
    }
}

/// Delivers due reminders over the chat transport.
pub struct ReminderDispatcher {
    scheduler: Arc<dyn ReminderScheduler>,
    transport: Arc<dyn ChatTransport>,
    pop_limit: usize,
}

impl ReminderDispatcher {
    pub fn new(
        scheduler: Arc<dyn ReminderScheduler>,
        transport: Arc<dyn ChatTransport>,
        pop_limit: usize,
    ) -> Self {
        Self {
            scheduler,
            transport,
            pop_limit,
        }
    }

    /// Pop and deliver due reminders. Send failures are logged and skipped;
    /// the job is consumed either way. Returns the delivered count.
    pub async fn run(&self) -> Result<usize, LeadbotError> {
        let due = self.scheduler.pop_due(self.pop_limit).await?;
        let mut delivered = 0;
        for job in due {
            let text = match job.kind {
                ReminderKind::FourHours => REMINDER_4H,
                ReminderKind::TwentyFourHours => REMINDER_24H,
            };
            match self.transport.send_text(job.chat_id, text).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(user_id = %job.user_id, error = %e, "reminder send failed");
                }
            }
        }
        Ok(delivered)
    }
}
