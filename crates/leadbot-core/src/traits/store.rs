// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value store and session cache traits.

use async_trait::async_trait;

use crate::error::LeadbotError;
use crate::types::Session;

/// Minimal key-value substrate used by the reminder and broadcast protocols.
///
/// The surface mirrors the handful of primitives those protocols need:
/// sets, a score-indexed sorted set, hashes, and a FIFO list. The
/// production implementation is SQLite-backed.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Adds a member to a set. Adding an existing member is a no-op.
    async fn set_add(&self, set: &str, member: &str) -> Result<(), LeadbotError>;

    /// Returns all members of a set.
    async fn set_members(&self, set: &str) -> Result<Vec<String>, LeadbotError>;

    /// Adds a member with a score to a sorted set, replacing any prior score.
    async fn zset_add(&self, zset: &str, member: &str, score: i64) -> Result<(), LeadbotError>;

    /// Returns members with `min <= score <= max` in ascending score order,
    /// up to `limit` if given.
    async fn zset_range_by_score(
        &self,
        zset: &str,
        min: i64,
        max: i64,
        limit: Option<usize>,
    ) -> Result<Vec<String>, LeadbotError>;

    /// Removes the given members from a sorted set.
    async fn zset_remove(&self, zset: &str, members: &[String]) -> Result<(), LeadbotError>;

    /// Pushes a value to the head of a list.
    async fn list_push(&self, list: &str, value: &str) -> Result<(), LeadbotError>;

    /// Pops a value from the tail of a list (FIFO with [`Self::list_push`]).
    async fn list_pop(&self, list: &str) -> Result<Option<String>, LeadbotError>;

    /// Sets multiple fields on a hash.
    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> Result<(), LeadbotError>;

    /// Returns all fields of a hash. Missing keys return an empty map.
    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>, LeadbotError>;

    /// Deletes a hash key entirely.
    async fn delete(&self, key: &str) -> Result<(), LeadbotError>;
}

/// Per-user conversation session cache.
///
/// Best-effort: a lost session must not break the dialogue. Step recovery
/// and known-field checks in the engine compensate for losses.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the session for a user, if cached.
    async fn get(&self, user_id: &str) -> Result<Option<Session>, LeadbotError>;

    /// Stores the session for a user.
    async fn put(&self, user_id: &str, session: &Session) -> Result<(), LeadbotError>;

    /// Drops the session for a user.
    async fn clear(&self, user_id: &str) -> Result<(), LeadbotError>;
}
