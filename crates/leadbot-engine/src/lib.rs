// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for the leadbot qualification bot.
//!
//! Contains the pure slot parser and intent classifier, the prompt lexicon
//! with its reply-to recovery map, session stores, and the per-user state
//! machine that orchestrates the collaborators.

pub mod engine;
pub mod intent;
pub mod links;
pub mod markdown;
pub mod prompts;
pub mod session;
pub mod slots;

pub use engine::{ConversationEngine, EngineOptions, EngineParts};
pub use session::{KvSessionStore, MemorySessionStore};
