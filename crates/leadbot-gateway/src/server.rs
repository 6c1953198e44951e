// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the webhook and cron
//! endpoints.

use std::sync::Arc;

use axum::{
    routing::{any, get},
    Router,
};
use leadbot_core::LeadbotError;
use leadbot_engine::ConversationEngine;
use leadbot_store::{BroadcastDispatcher, ReminderDispatcher};
use tower_http::cors::CorsLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub engine: Arc<ConversationEngine>,
    /// Admin entries (user IDs or usernames) for the broadcast command.
    pub admin_users: Arc<Vec<String>>,
    /// Expected `x-telegram-bot-api-secret-token` value. `None` disables
    /// the check.
    pub webhook_secret: Option<String>,
    /// Broadcast audience registry; grown from webhook traffic. `None`
    /// when no durable store is configured.
    pub audience: Option<Arc<leadbot_store::Audience>>,
    pub reminder_dispatcher: Option<Arc<ReminderDispatcher>>,
    pub broadcast_dispatcher: Option<Arc<BroadcastDispatcher>>,
}

/// Gateway server configuration (mirrors GatewayConfig from leadbot-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the gateway router.
///
/// Routes:
/// - ANY /api/webhook (Telegram webhook; non-POST answered with plain OK)
/// - GET /api/cron/reminders
/// - GET /api/cron/broadcast
/// - GET /health
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/webhook", any(handlers::webhook))
        .route("/api/cron/reminders", get(handlers::cron_reminders))
        .route("/api/cron/broadcast", get(handlers::cron_broadcast))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until shutdown.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), LeadbotError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LeadbotError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| LeadbotError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
