// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./leadbot.toml` > `~/.config/leadbot/leadbot.toml`
//! > `/etc/leadbot/leadbot.toml` with environment variable overrides via the
//! `LEADBOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LeadbotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/leadbot/leadbot.toml` (system-wide)
/// 3. `~/.config/leadbot/leadbot.toml` (user XDG config)
/// 4. `./leadbot.toml` (local directory)
/// 5. `LEADBOT_*` environment variables
pub fn load_config() -> Result<LeadbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadbotConfig::default()))
        .merge(Toml::file("/etc/leadbot/leadbot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("leadbot/leadbot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("leadbot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<LeadbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LeadbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LeadbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `LEADBOT_TELEGRAM_BOT_TOKEN`
/// must map to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("LEADBOT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: LEADBOT_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("sheets_", "sheets.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("broadcast_", "broadcast.", 1)
            .replacen("reminders_", "reminders.", 1);
        mapped.into()
    })
}
