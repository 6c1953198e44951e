// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leadbot - a B2B lead qualification bot for Telegram.
//!
//! This is the binary entry point.

mod serve;

use clap::{Parser, Subcommand};

/// Leadbot - a B2B lead qualification bot for Telegram.
#[derive(Parser, Debug)]
#[command(name = "leadbot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve,
    /// Show the resolved configuration.
    Config,
}

fn describe(label: &str, set: bool) -> String {
    format!("  {label}: {}", if set { "set" } else { "not set" })
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match leadbot_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            leadbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("leadbot serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            println!("agent.name = {}", config.agent.name);
            println!("agent.log_level = {}", config.agent.log_level);
            println!(
                "gateway = {}:{}",
                config.gateway.host, config.gateway.port
            );
            println!("credentials:");
            println!(
                "{}",
                describe("telegram.bot_token", config.telegram.bot_token.is_some())
            );
            println!(
                "{}",
                describe("openai.api_key", config.openai.api_key.is_some())
            );
            println!(
                "{}",
                describe(
                    "sheets.spreadsheet_id",
                    config.sheets.spreadsheet_id.is_some()
                )
            );
            println!(
                "{}",
                describe("sheets.access_token", config.sheets.access_token.is_some())
            );
            println!(
                "storage.database_path = {}",
                config.storage.database_path.as_deref().unwrap_or("(disabled)")
            );
        }
        None => {
            println!("leadbot: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config =
            leadbot_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.agent.name, "leadbot");
    }
}
