// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed durable store for leadbot.
//!
//! Provides the key-value substrate ([`SqliteKv`]), the follow-up reminder
//! scheduler and dispatcher, and the broadcast queue with its rate-paced
//! fan-out. All state lives in a single WAL-mode SQLite file.

pub mod broadcast;
pub mod database;
pub mod kv;
pub mod migrations;
pub mod reminders;

pub use broadcast::{Audience, BroadcastDispatcher, BroadcastOutcome, SqliteBroadcastQueue};
pub use database::Database;
pub use kv::SqliteKv;
pub use reminders::{ReminderDispatcher, SqliteReminders, REMINDER_24H, REMINDER_4H};
