// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram adapter for leadbot.
//!
//! Implements the outbound [`ChatTransport`] and operator [`Notifier`]
//! seams over the Bot API via teloxide, and extracts webhook updates into
//! the engine's channel-agnostic inbound form.
//!
//! [`ChatTransport`]: leadbot_core::ChatTransport
//! [`Notifier`]: leadbot_core::Notifier

pub mod notifier;
pub mod transport;
pub mod update;

pub use notifier::{lead_card, TelegramNotifier};
pub use transport::TelegramTransport;
pub use update::{parse_update, to_inbound};
