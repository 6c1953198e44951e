// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the leadbot qualification bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level leadbot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values;
/// required credentials are checked at serve time, not at load time.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LeadbotConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// OpenAI completion API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Google Sheets lead ledger settings.
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Durable store settings (reminders, broadcast, sessions).
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Broadcast fan-out pacing settings.
    #[serde(default)]
    pub broadcast: BroadcastConfig,

    /// Reminder drain settings.
    #[serde(default)]
    pub reminders: RemindersConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "leadbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required for serving.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Operator chat that receives new-lead cards. `None` disables
    /// operator notifications.
    #[serde(default)]
    pub operator_chat_id: Option<i64>,

    /// Telegram user IDs allowed to run operator commands (`/broadcast`).
    #[serde(default)]
    pub admin_users: Vec<String>,

    /// Expected value of the `x-telegram-bot-api-secret-token` webhook
    /// header. `None` disables the check.
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// URL of the welcome checklist document sent on organic `/start`.
    #[serde(default)]
    pub checklist_url: Option<String>,

    /// URL of the logo image sent with the welcome message.
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// OpenAI completion API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// OpenAI API key. Required for serving.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for sales replies.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.6
}

/// Google Sheets lead ledger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SheetsConfig {
    /// Target spreadsheet ID. Required for serving.
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// Sheet tab name rows are appended to.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// OAuth bearer token for the Sheets API. Required for serving.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheet_name: default_sheet_name(),
            access_token: None,
        }
    }
}

fn default_sheet_name() -> String {
    "Leads".to_string()
}

/// Durable store configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file. `None` disables the durable
    /// store; reminders and broadcast become inert no-ops.
    #[serde(default)]
    pub database_path: Option<String>,
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the server to.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind the server to.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}

/// Broadcast fan-out pacing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BroadcastConfig {
    /// Messages sent before each pacing pause.
    #[serde(default = "default_broadcast_rate")]
    pub rate: usize,

    /// Pacing pause duration in milliseconds.
    #[serde(default = "default_broadcast_pause_ms")]
    pub pause_ms: u64,

    /// Audience page size when reading recipient ids.
    #[serde(default = "default_broadcast_batch_limit")]
    pub batch_limit: usize,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            rate: default_broadcast_rate(),
            pause_ms: default_broadcast_pause_ms(),
            batch_limit: default_broadcast_batch_limit(),
        }
    }
}

fn default_broadcast_rate() -> usize {
    25
}

fn default_broadcast_pause_ms() -> u64 {
    1000
}

fn default_broadcast_batch_limit() -> usize {
    1000
}

/// Reminder drain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemindersConfig {
    /// Maximum due jobs drained per cron tick.
    #[serde(default = "default_reminder_pop_limit")]
    pub pop_limit: usize,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            pop_limit: default_reminder_pop_limit(),
        }
    }
}

fn default_reminder_pop_limit() -> usize {
    100
}
