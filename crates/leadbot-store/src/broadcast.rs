// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Broadcast queue, audience registry, and rate-paced fan-out.
//!
//! A job lives in a `job:{ts}` hash with a `text` field, keyed from a FIFO
//! list at `broadcast:jobs`. The audience is the `audience:ids` set of chat
//! ids, grown by the webhook as updates arrive.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use leadbot_core::{BroadcastJob, BroadcastQueue, ChatTransport, KvStore, LeadbotError};
use tracing::{info, warn};

const JOBS_LIST: &str = "broadcast:jobs";
const AUDIENCE_SET: &str = "audience:ids";

/// Millisecond timestamp, bumped past the previous value so two jobs
/// enqueued in the same millisecond get distinct keys.
fn next_job_ts() -> i64 {
    static LAST: AtomicI64 = AtomicI64::new(0);
    let now = Utc::now().timestamp_millis();
    let prev = LAST
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(last.max(now - 1) + 1)
        })
        .unwrap_or(0);
    prev.max(now - 1) + 1
}

pub struct SqliteBroadcastQueue {
    kv: Arc<dyn KvStore>,
}

impl SqliteBroadcastQueue {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl BroadcastQueue for SqliteBroadcastQueue {
    async fn enqueue(&self, text: &str) -> Result<(), LeadbotError> {
        let key = format!("job:{}", next_job_ts());
        self.kv
            .hash_set(&key, &[("text".to_string(), text.to_string())])
            .await?;
        self.kv.list_push(JOBS_LIST, &key).await?;
        Ok(())
    }

    async fn pop(&self) -> Result<Option<BroadcastJob>, LeadbotError> {
        let Some(key) = self.kv.list_pop(JOBS_LIST).await? else {
            return Ok(None);
        };
        let fields = self.kv.hash_get_all(&key).await?;
        self.kv.delete(&key).await?;

        let Some((_, text)) = fields.into_iter().find(|(field, _)| field == "text") else {
            warn!(key = %key, "dropping broadcast job with no text");
            return Ok(None);
        };
        Ok(Some(BroadcastJob { id: key, text }))
    }
}

/// The set of chat ids eligible for broadcasts.
pub struct Audience {
    kv: Arc<dyn KvStore>,
}

impl Audience {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Register a chat id. Re-adding is a no-op.
    pub async fn add(&self, chat_id: i64) -> Result<(), LeadbotError> {
        self.kv.set_add(AUDIENCE_SET, &chat_id.to_string()).await
    }

    /// Up to `limit` chat ids. Unparseable members are skipped.
    pub async fn batch(&self, limit: usize) -> Result<Vec<i64>, LeadbotError> {
        let members = self.kv.set_members(AUDIENCE_SET).await?;
        Ok(members
            .iter()
            .filter_map(|m| m.parse::<i64>().ok())
            .take(limit)
            .collect())
    }
}

/// Outcome of one broadcast dispatch pass.
#[derive(Debug, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// The queue was empty.
    NoJob,
    /// One job was delivered to `sent` recipients, pausing `pauses` times.
    Sent { sent: usize, pauses: usize },
}

/// Delivers at most one queued broadcast per pass, pacing sends.
pub struct BroadcastDispatcher {
    queue: Arc<dyn BroadcastQueue>,
    audience: Audience,
    transport: Arc<dyn ChatTransport>,
    rate: usize,
    pause_ms: u64,
    batch_limit: usize,
}

impl BroadcastDispatcher {
    pub fn new(
        queue: Arc<dyn BroadcastQueue>,
        audience: Audience,
        transport: Arc<dyn ChatTransport>,
        rate: usize,
        pause_ms: u64,
        batch_limit: usize,
    ) -> Self {
        Self {
            queue,
            audience,
            transport,
            rate,
            pause_ms,
            batch_limit,
        }
    }

    /// Pop one job and fan it out to the audience batch.
    ///
    /// Per-recipient failures are logged and skipped; a pacing pause follows
    /// every `rate` successful sends.
    pub async fn run_once(&self) -> Result<BroadcastOutcome, LeadbotError> {
        let Some(job) = self.queue.pop().await? else {
            return Ok(BroadcastOutcome::NoJob);
        };
        let audience = self.audience.batch(self.batch_limit).await?;

        let mut sent = 0;
        let mut pauses = 0;
        for chat_id in audience {
            match self.transport.send_text(chat_id, &job.text).await {
                Ok(()) => {
                    sent += 1;
                    if self.rate > 0 && sent % self.rate == 0 {
                        tokio::time::sleep(Duration::from_millis(self.pause_ms)).await;
                        pauses += 1;
                    }
                }
                Err(e) => {
                    warn!(chat_id, error = %e, "broadcast send failed");
                }
            }
        }
        info!(job_id = %job.id, sent, "broadcast delivered");
        Ok(BroadcastOutcome::Sent { sent, pauses })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadbot_test_utils::{MemoryKv, RecordingTransport};

    struct Fixture {
        queue: Arc<SqliteBroadcastQueue>,
        audience: Audience,
        transport: Arc<RecordingTransport>,
        kv: Arc<MemoryKv>,
    }

    fn fixture() -> Fixture {
        let kv = Arc::new(MemoryKv::new());
        Fixture {
            queue: Arc::new(SqliteBroadcastQueue::new(kv.clone())),
            audience: Audience::new(kv.clone()),
            transport: Arc::new(RecordingTransport::new()),
            kv,
        }
    }

    fn dispatcher(f: &Fixture, rate: usize, batch_limit: usize) -> BroadcastDispatcher {
        BroadcastDispatcher::new(
            f.queue.clone(),
            Audience::new(f.kv.clone()),
            f.transport.clone(),
            rate,
            1000,
            batch_limit,
        )
    }

    #[tokio::test]
    async fn enqueue_pop_consumes_job() {
        let f = fixture();
        f.queue.enqueue("привет").await.unwrap();

        let job = f.queue.pop().await.unwrap().unwrap();
        assert_eq!(job.text, "привет");
        assert!(job.id.starts_with("job:"));
        assert!(f.queue.pop().await.unwrap().is_none());
        // Payload hash removed with the job.
        assert!(f.kv.hash_get_all(&job.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_queue_reports_no_job() {
        let f = fixture();
        f.audience.add(1).await.unwrap();
        let d = dispatcher(&f, 25, 1000);
        assert_eq!(d.run_once().await.unwrap(), BroadcastOutcome::NoJob);
        assert!(f.transport.sent().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn pacing_pauses_after_each_full_rate_window() {
        let f = fixture();
        let rate = 5;
        for chat_id in 0..(3 * rate + 2) {
            f.audience.add(chat_id as i64).await.unwrap();
        }
        f.queue.enqueue("анонс").await.unwrap();

        let d = dispatcher(&f, rate, 1000);
        assert_eq!(
            d.run_once().await.unwrap(),
            BroadcastOutcome::Sent { sent: 17, pauses: 3 }
        );
        assert_eq!(f.transport.sent().await.len(), 17);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_recipients_are_skipped() {
        let f = fixture();
        for chat_id in 1..=4 {
            f.audience.add(chat_id).await.unwrap();
        }
        f.transport.fail_chat(3).await;
        f.queue.enqueue("анонс").await.unwrap();

        let d = dispatcher(&f, 25, 1000);
        assert_eq!(
            d.run_once().await.unwrap(),
            BroadcastOutcome::Sent { sent: 3, pauses: 0 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn batch_limit_caps_the_audience() {
        let f = fixture();
        for chat_id in 1..=10 {
            f.audience.add(chat_id).await.unwrap();
        }
        f.queue.enqueue("анонс").await.unwrap();

        let d = dispatcher(&f, 25, 4);
        assert_eq!(
            d.run_once().await.unwrap(),
            BroadcastOutcome::Sent { sent: 4, pauses: 0 }
        );
    }

    #[tokio::test]
    async fn jobs_are_fifo() {
        let f = fixture();
        f.queue.enqueue("первый").await.unwrap();
        f.queue.enqueue("второй").await.unwrap();
        assert_eq!(f.queue.pop().await.unwrap().unwrap().text, "первый");
        assert_eq!(f.queue.pop().await.unwrap().unwrap().text, "второй");
    }
}
