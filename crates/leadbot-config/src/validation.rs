// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, positive pacing values, and
//! sane sampling temperatures.

use crate::diagnostic::ConfigError;
use crate::model::LeadbotConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &LeadbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate gateway.host is not empty
    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let addr = config.gateway.host.trim();
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{addr}` is not a valid IP address or hostname"),
            });
        }
    }

    // A configured database path must not be blank
    if let Some(path) = &config.storage.database_path
        && path.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty when set".to_string(),
        });
    }

    // Sampling temperature sanity
    if !(0.0..=2.0).contains(&config.openai.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.temperature must be within 0.0..=2.0, got {}",
                config.openai.temperature
            ),
        });
    }

    // Broadcast pacing values must be positive
    if config.broadcast.rate == 0 {
        errors.push(ConfigError::Validation {
            message: "broadcast.rate must be at least 1".to_string(),
        });
    }

    if config.broadcast.batch_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "broadcast.batch_limit must be at least 1".to_string(),
        });
    }

    if config.reminders.pop_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "reminders.pop_limit must be at least 1".to_string(),
        });
    }

    // Admin user ids must be non-blank
    for (i, user) in config.telegram.admin_users.iter().enumerate() {
        if user.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("telegram.admin_users[{i}] must not be empty"),
            });
        }
    }

    const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = LeadbotConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn blank_database_path_fails_validation() {
        let mut config = LeadbotConfig::default();
        config.storage.database_path = Some("  ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn zero_broadcast_rate_fails_validation() {
        let mut config = LeadbotConfig::default();
        config.broadcast.rate = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("broadcast.rate"))
        ));
    }

    #[test]
    fn out_of_range_temperature_fails_validation() {
        let toml_str = r#"
            [openai]
            temperature = 3.5
        "#;
        let config: LeadbotConfig = toml::from_str(toml_str).unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("temperature"))
        ));
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let mut config = LeadbotConfig::default();
        config.agent.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))
        ));
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = LeadbotConfig::default();
        config.broadcast.rate = 0;
        config.reminders.pop_limit = 0;
        config.gateway.host = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn valid_custom_config_passes() {
        let toml_str = r#"
            [gateway]
            host = "0.0.0.0"

            [storage]
            database_path = "/tmp/leadbot.db"

            [telegram]
            admin_users = ["42"]
        "#;
        let config: LeadbotConfig = toml::from_str(toml_str).unwrap();
        assert!(validate_config(&config).is_ok());
    }
}
