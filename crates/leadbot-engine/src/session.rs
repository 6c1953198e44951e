// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session store implementations.
//!
//! The session record is a cache only. The in-memory store serves tests and
//! single-process deployments; the KV-backed store survives process churn
//! when a durable store is configured. Either way the engine treats a
//! missing session as normal and recovers from the replied-to prompt text.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use leadbot_core::{KvStore, LeadbotError, Session, SessionStore};

/// Process-memory session store.
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<Session>, LeadbotError> {
        Ok(self.sessions.get(user_id).map(|s| s.clone()))
    }

    async fn put(&self, user_id: &str, session: &Session) -> Result<(), LeadbotError> {
        self.sessions.insert(user_id.to_string(), session.clone());
        Ok(())
    }

    async fn clear(&self, user_id: &str) -> Result<(), LeadbotError> {
        self.sessions.remove(user_id);
        Ok(())
    }
}

/// Durable session store on top of the KV hash primitive.
///
/// The whole session is stored as one JSON field under `session:{user}`;
/// unreadable records are treated as absent rather than erroring, since a
/// lost session is an expected condition.
pub struct KvSessionStore {
    kv: Arc<dyn KvStore>,
}

impl KvSessionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn key(user_id: &str) -> String {
        format!("session:{user_id}")
    }
}

#[async_trait]
impl SessionStore for KvSessionStore {
    async fn get(&self, user_id: &str) -> Result<Option<Session>, LeadbotError> {
        let fields = self.kv.hash_get_all(&Self::key(user_id)).await?;
        let Some((_, raw)) = fields.iter().find(|(f, _)| f == "state") else {
            return Ok(None);
        };
        match serde_json::from_str(raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "unreadable session record, treating as absent");
                Ok(None)
            }
        }
    }

    async fn put(&self, user_id: &str, session: &Session) -> Result<(), LeadbotError> {
        let raw = serde_json::to_string(session)
            .map_err(|e| LeadbotError::Internal(format!("session serialization: {e}")))?;
        self.kv
            .hash_set(&Self::key(user_id), &[("state".to_string(), raw)])
            .await
    }

    async fn clear(&self, user_id: &str) -> Result<(), LeadbotError> {
        self.kv.delete(&Self::key(user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadbot_core::FormStep;
    use leadbot_test_utils::MemoryKv;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.get("u").await.unwrap().is_none());

        let mut session = Session::default();
        session.step = Some(FormStep::Contact);
        session.name = Some("Анна".into());
        store.put("u", &session).await.unwrap();

        let loaded = store.get("u").await.unwrap().unwrap();
        assert_eq!(loaded.step, Some(FormStep::Contact));
        assert_eq!(loaded.name.as_deref(), Some("Анна"));

        store.clear("u").await.unwrap();
        assert!(store.get("u").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn kv_store_round_trip() {
        let store = KvSessionStore::new(Arc::new(MemoryKv::new()));
        let mut session = Session::default();
        session.step = Some(FormStep::Company);
        store.put("u", &session).await.unwrap();

        let loaded = store.get("u").await.unwrap().unwrap();
        assert_eq!(loaded.step, Some(FormStep::Company));

        store.clear("u").await.unwrap();
        assert!(store.get("u").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn kv_store_tolerates_garbage() {
        let kv = Arc::new(MemoryKv::new());
        kv.hash_set("session:u", &[("state".to_string(), "{not json".to_string())])
            .await
            .unwrap();
        let store = KvSessionStore::new(kv);
        assert!(store.get("u").await.unwrap().is_none());
    }
}
