// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the leadbot engine.
//!
//! The conversation engine is written against these seams so that every
//! external system (Telegram, the completion API, the spreadsheet, the
//! durable store) can be swapped for a mock in tests.

pub mod channel;
pub mod jobs;
pub mod repository;
pub mod seller;
pub mod store;

// Re-export all traits at the traits module level for convenience.
pub use channel::{ChatTransport, Notifier};
pub use jobs::{BroadcastQueue, ReminderScheduler};
pub use repository::LeadRepository;
pub use seller::SellerResponder;
pub use store::{KvStore, SessionStore};
