// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the leadbot qualification bot.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and diagnostic error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use leadbot_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Bot name: {}", config.agent.name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::LeadbotConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to miette diagnostics with typo suggestions
///
/// Returns either a valid `LeadbotConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<LeadbotConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<LeadbotConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_validate_str_accepts_full_config() {
        let toml = r#"
[agent]
name = "b2b-bot"
log_level = "debug"

[telegram]
bot_token = "123:abc"
operator_chat_id = -100500
admin_users = ["42", "77"]
webhook_secret = "s3cret"
checklist_url = "https://drive.google.com/file/d/abc/view"

[openai]
api_key = "sk-test"

[sheets]
spreadsheet_id = "sheet-1"
access_token = "ya29.token"

[storage]
database_path = "/tmp/leadbot.db"

[gateway]
host = "0.0.0.0"
port = 3000
"#;
        let config = load_and_validate_str(toml).unwrap();
        assert_eq!(config.agent.name, "b2b-bot");
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.telegram.admin_users.len(), 2);
    }

    #[test]
    fn load_and_validate_str_reports_typos() {
        let errors = load_and_validate_str("[openai]\ntemprature = 0.5\n").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn load_and_validate_str_reports_semantic_errors() {
        let errors = load_and_validate_str("[broadcast]\nrate = 0\n").unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("broadcast.rate"))
        ));
    }
}
