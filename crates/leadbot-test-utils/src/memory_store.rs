// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementations of the durable-store and repository seams.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use leadbot_core::{KvStore, Lead, LeadRepository, LeadbotError};

/// In-memory append-only lead ledger.
pub struct MemoryLeadRepo {
    rows: Arc<Mutex<Vec<Lead>>>,
}

impl MemoryLeadRepo {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-seed a lead row (e.g. a previously qualified user).
    pub async fn seed(&self, lead: Lead) {
        self.rows.lock().await.push(lead);
    }

    /// All appended rows in order.
    pub async fn rows(&self) -> Vec<Lead> {
        self.rows.lock().await.clone()
    }
}

impl Default for MemoryLeadRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadRepository for MemoryLeadRepo {
    async fn append(&self, lead: &Lead) -> Result<(), LeadbotError> {
        self.rows.lock().await.push(lead.clone());
        Ok(())
    }

    async fn find_latest_by_user(&self, user_id: &str) -> Result<Option<Lead>, LeadbotError> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .rev()
            .find(|l| l.user_id == user_id)
            .cloned())
    }
}

#[derive(Default)]
struct KvState {
    sets: HashMap<String, Vec<String>>,
    // member -> score, kept sorted on read
    zsets: HashMap<String, BTreeMap<String, i64>>,
    lists: HashMap<String, Vec<String>>,
    hashes: HashMap<String, Vec<(String, String)>>,
}

/// In-memory `KvStore` mirroring the SQLite substrate's semantics.
pub struct MemoryKv {
    state: Arc<Mutex<KvState>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(KvState::default())),
        }
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn set_add(&self, set: &str, member: &str) -> Result<(), LeadbotError> {
        let mut state = self.state.lock().await;
        let members = state.sets.entry(set.to_string()).or_default();
        if !members.contains(&member.to_string()) {
            members.push(member.to_string());
        }
        Ok(())
    }

    async fn set_members(&self, set: &str) -> Result<Vec<String>, LeadbotError> {
        Ok(self
            .state
            .lock()
            .await
            .sets
            .get(set)
            .cloned()
            .unwrap_or_default())
    }

    async fn zset_add(&self, zset: &str, member: &str, score: i64) -> Result<(), LeadbotError> {
        self.state
            .lock()
            .await
            .zsets
            .entry(zset.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn zset_range_by_score(
        &self,
        zset: &str,
        min: i64,
        max: i64,
        limit: Option<usize>,
    ) -> Result<Vec<String>, LeadbotError> {
        let state = self.state.lock().await;
        let Some(members) = state.zsets.get(zset) else {
            return Ok(Vec::new());
        };
        let mut in_range: Vec<(&String, &i64)> = members
            .iter()
            .filter(|(_, score)| (min..=max).contains(score))
            .collect();
        in_range.sort_by_key(|(_, score)| **score);
        let take = limit.unwrap_or(usize::MAX);
        Ok(in_range
            .into_iter()
            .take(take)
            .map(|(member, _)| member.clone())
            .collect())
    }

    async fn zset_remove(&self, zset: &str, members: &[String]) -> Result<(), LeadbotError> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.zsets.get_mut(zset) {
            for member in members {
                existing.remove(member);
            }
        }
        Ok(())
    }

    async fn list_push(&self, list: &str, value: &str) -> Result<(), LeadbotError> {
        self.state
            .lock()
            .await
            .lists
            .entry(list.to_string())
            .or_default()
            .insert(0, value.to_string());
        Ok(())
    }

    async fn list_pop(&self, list: &str) -> Result<Option<String>, LeadbotError> {
        Ok(self
            .state
            .lock()
            .await
            .lists
            .get_mut(list)
            .and_then(|values| values.pop()))
    }

    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> Result<(), LeadbotError> {
        let mut state = self.state.lock().await;
        let hash = state.hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            if let Some(existing) = hash.iter_mut().find(|(f, _)| f == field) {
                existing.1 = value.clone();
            } else {
                hash.push((field.clone(), value.clone()));
            }
        }
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>, LeadbotError> {
        Ok(self
            .state
            .lock()
            .await
            .hashes
            .get(key)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete(&self, key: &str) -> Result<(), LeadbotError> {
        self.state.lock().await.hashes.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_kv_list_is_fifo() {
        let kv = MemoryKv::new();
        kv.list_push("q", "a").await.unwrap();
        kv.list_push("q", "b").await.unwrap();
        assert_eq!(kv.list_pop("q").await.unwrap(), Some("a".to_string()));
        assert_eq!(kv.list_pop("q").await.unwrap(), Some("b".to_string()));
        assert_eq!(kv.list_pop("q").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_kv_zset_range_and_remove() {
        let kv = MemoryKv::new();
        kv.zset_add("due", "x", 10).await.unwrap();
        kv.zset_add("due", "y", 20).await.unwrap();
        kv.zset_add("due", "z", 30).await.unwrap();

        let range = kv.zset_range_by_score("due", 0, 20, None).await.unwrap();
        assert_eq!(range, vec!["x".to_string(), "y".to_string()]);

        kv.zset_remove("due", &["x".to_string()]).await.unwrap();
        let range = kv.zset_range_by_score("due", 0, 100, None).await.unwrap();
        assert_eq!(range, vec!["y".to_string(), "z".to_string()]);
    }

    #[tokio::test]
    async fn latest_lead_wins() {
        let repo = MemoryLeadRepo::new();
        let mut lead = Lead {
            timestamp: "t1".into(),
            source: leadbot_core::LeadSource::Organic,
            user_id: "u".into(),
            name: "old".into(),
            contact: String::new(),
            company: String::new(),
            answers: String::new(),
            checklist_sent: false,
        };
        repo.append(&lead).await.unwrap();
        lead.name = "new".into();
        repo.append(&lead).await.unwrap();

        let found = repo.find_latest_by_user("u").await.unwrap().unwrap();
        assert_eq!(found.name, "new");
        assert!(repo.find_latest_by_user("other").await.unwrap().is_none());
    }
}
