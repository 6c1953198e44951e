// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed [`KvStore`] implementation.
//!
//! Four tables back the four primitives: `kv_set`, `kv_zset`, `kv_list`,
//! `kv_hash`. Lists push at the head (descending seq) and pop at the tail
//! (max seq), giving FIFO order.

use std::sync::Arc;

use async_trait::async_trait;
use leadbot_core::{KvStore, LeadbotError};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

pub struct SqliteKv {
    db: Arc<Database>,
}

impl SqliteKv {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KvStore for SqliteKv {
    async fn set_add(&self, set: &str, member: &str) -> Result<(), LeadbotError> {
        let set = set.to_owned();
        let member = member.to_owned();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO kv_set (name, member) VALUES (?1, ?2)",
                    params![set, member],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set_members(&self, set: &str) -> Result<Vec<String>, LeadbotError> {
        let set = set.to_owned();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT member FROM kv_set WHERE name = ?1 ORDER BY member")?;
                let rows = stmt
                    .query_map(params![set], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn zset_add(&self, zset: &str, member: &str, score: i64) -> Result<(), LeadbotError> {
        let zset = zset.to_owned();
        let member = member.to_owned();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv_zset (name, member, score) VALUES (?1, ?2, ?3)
                     ON CONFLICT (name, member) DO UPDATE SET score = excluded.score",
                    params![zset, member, score],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn zset_range_by_score(
        &self,
        zset: &str,
        min: i64,
        max: i64,
        limit: Option<usize>,
    ) -> Result<Vec<String>, LeadbotError> {
        let zset = zset.to_owned();
        self.db
            .connection()
            .call(move |conn| {
                let limit = limit.map(|n| n as i64).unwrap_or(-1);
                let mut stmt = conn.prepare(
                    "SELECT member FROM kv_zset
                     WHERE name = ?1 AND score >= ?2 AND score <= ?3
                     ORDER BY score ASC, member ASC
                     LIMIT ?4",
                )?;
                let rows = stmt
                    .query_map(params![zset, min, max, limit], |row| {
                        row.get::<_, String>(0)
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn zset_remove(&self, zset: &str, members: &[String]) -> Result<(), LeadbotError> {
        let zset = zset.to_owned();
        let members = members.to_vec();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                for member in &members {
                    tx.execute(
                        "DELETE FROM kv_zset WHERE name = ?1 AND member = ?2",
                        params![zset, member],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn list_push(&self, list: &str, value: &str) -> Result<(), LeadbotError> {
        let list = list.to_owned();
        let value = value.to_owned();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv_list (name, seq, value)
                     SELECT ?1, COALESCE(MIN(seq), 0) - 1, ?2
                     FROM kv_list WHERE name = ?1",
                    params![list, value],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn list_pop(&self, list: &str) -> Result<Option<String>, LeadbotError> {
        let list = list.to_owned();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                let tail: Option<(i64, String)> = tx
                    .query_row(
                        "SELECT seq, value FROM kv_list
                         WHERE name = ?1
                         ORDER BY seq DESC
                         LIMIT 1",
                        params![list],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .map(Some)
                    .or_else(|e| match e {
                        rusqlite::Error::QueryReturnedNoRows => Ok(None),
                        other => Err(other),
                    })?;
                let value = match tail {
                    Some((seq, value)) => {
                        tx.execute(
                            "DELETE FROM kv_list WHERE name = ?1 AND seq = ?2",
                            params![list, seq],
                        )?;
                        Some(value)
                    }
                    None => None,
                };
                tx.commit()?;
                Ok(value)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> Result<(), LeadbotError> {
        let key = key.to_owned();
        let fields = fields.to_vec();
        self.db
            .connection()
            .call(move |conn| {
                let tx = conn.transaction()?;
                for (field, value) in &fields {
                    tx.execute(
                        "INSERT INTO kv_hash (key, field, value) VALUES (?1, ?2, ?3)
                         ON CONFLICT (key, field) DO UPDATE SET value = excluded.value",
                        params![key, field, value],
                    )?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>, LeadbotError> {
        let key = key.to_owned();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT field, value FROM kv_hash WHERE key = ?1")?;
                let rows = stmt
                    .query_map(params![key], |row| Ok((row.get(0)?, row.get(1)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(map_tr_err)
    }

    async fn delete(&self, key: &str) -> Result<(), LeadbotError> {
        let key = key.to_owned();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute("DELETE FROM kv_hash WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
