// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `leadbot serve` command implementation.
//!
//! Wires the conversation engine to its production collaborators (Telegram
//! transport, OpenAI seller, Sheets ledger, SQLite store) and serves the
//! webhook and cron endpoints.

use std::sync::Arc;

use leadbot_config::model::LeadbotConfig;
use leadbot_core::{BroadcastQueue, KvStore, LeadbotError, ReminderScheduler, SessionStore};
use leadbot_engine::{ConversationEngine, EngineOptions, EngineParts, KvSessionStore, MemorySessionStore};
use leadbot_gateway::{start_server, GatewayState, ServerConfig};
use leadbot_openai::OpenAiSeller;
use leadbot_sheets::SheetsLeadRepository;
use leadbot_store::{
    Audience, BroadcastDispatcher, Database, ReminderDispatcher, SqliteBroadcastQueue, SqliteKv,
    SqliteReminders,
};
use leadbot_telegram::{TelegramNotifier, TelegramTransport};
use tracing::info;

fn required<'a>(value: Option<&'a str>, key: &str, env: &str) -> Result<&'a str, LeadbotError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| LeadbotError::Config(format!("{key} is required. Set it in leadbot.toml or the {env} environment variable")))
}

/// Runs the `leadbot serve` command.
pub async fn run_serve(config: LeadbotConfig) -> Result<(), LeadbotError> {
    init_tracing(&config.agent.log_level);

    info!("starting leadbot serve");

    let bot_token = required(
        config.telegram.bot_token.as_deref(),
        "telegram.bot_token",
        "LEADBOT_TELEGRAM_BOT_TOKEN",
    )?;
    let api_key = required(
        config.openai.api_key.as_deref(),
        "openai.api_key",
        "LEADBOT_OPENAI_API_KEY",
    )?;
    let spreadsheet_id = required(
        config.sheets.spreadsheet_id.as_deref(),
        "sheets.spreadsheet_id",
        "LEADBOT_SHEETS_SPREADSHEET_ID",
    )?;
    let access_token = required(
        config.sheets.access_token.as_deref(),
        "sheets.access_token",
        "LEADBOT_SHEETS_ACCESS_TOKEN",
    )?;

    let transport = Arc::new(TelegramTransport::new(bot_token)?);
    let notifier = Arc::new(TelegramNotifier::new(
        transport.bot().clone(),
        config.telegram.operator_chat_id,
    ));
    let seller = Arc::new(OpenAiSeller::new(
        api_key,
        &config.openai.model,
        config.openai.temperature as f32,
    )?);
    let repo = Arc::new(SheetsLeadRepository::new(
        spreadsheet_id,
        &config.sheets.sheet_name,
        access_token,
    ));

    // The durable store is optional: without it sessions are in-memory and
    // reminders/broadcast stay disabled.
    let mut sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let mut reminders: Option<Arc<dyn ReminderScheduler>> = None;
    let mut broadcast: Option<Arc<dyn BroadcastQueue>> = None;
    let mut audience = None;
    let mut reminder_dispatcher = None;
    let mut broadcast_dispatcher = None;

    if let Some(path) = &config.storage.database_path {
        let db = Arc::new(Database::open(path).await?);
        let kv: Arc<dyn KvStore> = Arc::new(SqliteKv::new(db));

        sessions = Arc::new(KvSessionStore::new(kv.clone()));

        let scheduler: Arc<dyn ReminderScheduler> = Arc::new(SqliteReminders::new(kv.clone()));
        reminder_dispatcher = Some(Arc::new(ReminderDispatcher::new(
            scheduler.clone(),
            transport.clone(),
            config.reminders.pop_limit,
        )));
        reminders = Some(scheduler);

        let queue: Arc<dyn BroadcastQueue> = Arc::new(SqliteBroadcastQueue::new(kv.clone()));
        broadcast_dispatcher = Some(Arc::new(BroadcastDispatcher::new(
            queue.clone(),
            Audience::new(kv.clone()),
            transport.clone(),
            config.broadcast.rate,
            config.broadcast.pause_ms,
            config.broadcast.batch_limit,
        )));
        broadcast = Some(queue);

        audience = Some(Arc::new(Audience::new(kv)));
        info!(path = %path, "durable store enabled");
    } else {
        info!("storage.database_path not set; reminders and broadcast disabled");
    }

    let engine = ConversationEngine::new(
        EngineParts {
            repo,
            seller,
            transport: transport.clone(),
            notifier,
            sessions,
            reminders,
            broadcast,
        },
        EngineOptions {
            checklist_url: config.telegram.checklist_url.clone(),
            logo_url: config.telegram.logo_url.clone(),
            ..EngineOptions::default()
        },
    );

    let state = GatewayState {
        engine: Arc::new(engine),
        admin_users: Arc::new(config.telegram.admin_users.clone()),
        webhook_secret: config.telegram.webhook_secret.clone(),
        audience,
        reminder_dispatcher,
        broadcast_dispatcher,
    };

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    start_server(&server_config, state).await?;

    info!("leadbot serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("leadbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
