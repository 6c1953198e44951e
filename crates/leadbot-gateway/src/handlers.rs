// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers: the Telegram webhook and the two cron endpoints.
//!
//! The webhook always answers Telegram with 200 OK once the secret check
//! passes; processing failures are logged and swallowed so Telegram does
//! not redeliver the update in a loop. The cron endpoints return the plain
//! text tokens their scheduler expects (`OK`, `NO-JOB`, `SENT:n`).

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use leadbot_store::BroadcastOutcome;

use crate::server::GatewayState;

const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// ANY /api/webhook
pub async fn webhook(
    State(state): State<GatewayState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Telegram only POSTs; health probes and browsers get a plain OK.
    if method != Method::POST {
        return (StatusCode::OK, "OK").into_response();
    }

    if let Some(secret) = &state.webhook_secret {
        let presented = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
        if presented != Some(secret.as_str()) {
            warn!("webhook secret mismatch");
            return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        }
    }

    let Some(update) = leadbot_telegram::parse_update(&body) else {
        return (StatusCode::OK, "OK").into_response();
    };
    let Some(inbound) = leadbot_telegram::to_inbound(&update, &state.admin_users) else {
        return (StatusCode::OK, "OK").into_response();
    };

    if let Some(audience) = &state.audience
        && let Err(e) = audience.add(inbound.chat_id).await
    {
        warn!(error = %e, "failed to register audience chat");
    }

    if let Err(e) = state.engine.handle(&inbound).await {
        warn!(user_id = %inbound.user_id, error = %e, "update processing failed");
    }

    (StatusCode::OK, "OK").into_response()
}

/// GET /api/cron/reminders
pub async fn cron_reminders(State(state): State<GatewayState>) -> Response {
    if let Some(dispatcher) = &state.reminder_dispatcher {
        match dispatcher.run().await {
            Ok(delivered) => info!(delivered, "reminder cron pass complete"),
            Err(e) => warn!(error = %e, "reminder cron pass failed"),
        }
    }
    (StatusCode::OK, "OK").into_response()
}

/// GET /api/cron/broadcast
pub async fn cron_broadcast(State(state): State<GatewayState>) -> Response {
    let Some(dispatcher) = &state.broadcast_dispatcher else {
        return (StatusCode::OK, "NO-JOB").into_response();
    };
    match dispatcher.run_once().await {
        Ok(BroadcastOutcome::NoJob) => (StatusCode::OK, "NO-JOB").into_response(),
        Ok(BroadcastOutcome::Sent { sent, .. }) => {
            info!(sent, "broadcast cron pass complete");
            (StatusCode::OK, format!("SENT:{sent}")).into_response()
        }
        Err(e) => {
            warn!(error = %e, "broadcast cron pass failed");
            (StatusCode::OK, "OK").into_response()
        }
    }
}

/// GET /health
pub async fn health() -> Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}
