// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for leadbot.
//!
//! Exposes the Telegram webhook plus the reminder and broadcast cron
//! endpoints over axum. The webhook is the only inbound path; outbound
//! traffic goes through the Telegram transport directly.

pub mod handlers;
pub mod server;

pub use server::{router, start_server, GatewayState, ServerConfig};

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use leadbot_engine::{ConversationEngine, EngineOptions, EngineParts, MemorySessionStore};
    use leadbot_store::{Audience, BroadcastDispatcher, SqliteBroadcastQueue};
    use leadbot_test_utils::{MemoryKv, MemoryLeadRepo, MockNotifier, MockSeller, RecordingTransport};
    use tower::ServiceExt;

    use super::*;

    struct Fixture {
        state: GatewayState,
        transport: Arc<RecordingTransport>,
        kv: Arc<MemoryKv>,
    }

    fn fixture(webhook_secret: Option<&str>) -> Fixture {
        let transport = Arc::new(RecordingTransport::new());
        let kv = Arc::new(MemoryKv::new());
        let engine = ConversationEngine::new(
            EngineParts {
                repo: Arc::new(MemoryLeadRepo::new()),
                seller: Arc::new(MockSeller::new()),
                transport: transport.clone(),
                notifier: Arc::new(MockNotifier::new()),
                sessions: Arc::new(MemorySessionStore::new()),
                reminders: None,
                broadcast: None,
            },
            EngineOptions::default(),
        );

        let queue = Arc::new(SqliteBroadcastQueue::new(kv.clone()));
        let dispatcher = BroadcastDispatcher::new(
            queue,
            Audience::new(kv.clone()),
            transport.clone(),
            25,
            1000,
            1000,
        );

        Fixture {
            state: GatewayState {
                engine: Arc::new(engine),
                admin_users: Arc::new(vec!["777".into()]),
                webhook_secret: webhook_secret.map(String::from),
                audience: Some(Arc::new(Audience::new(kv.clone()))),
                reminder_dispatcher: None,
                broadcast_dispatcher: Some(Arc::new(dispatcher)),
            },
            transport,
            kv,
        }
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn start_update_body() -> String {
        serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "date": 1700000000i64,
                "chat": {"id": 42i64, "type": "private", "first_name": "Test"},
                "from": {"id": 42u64, "is_bot": false, "first_name": "Test"},
                "text": "/start",
            },
        })
        .to_string()
    }

    #[tokio::test]
    async fn non_post_webhook_answers_plain_ok() {
        let f = fixture(None);
        let response = router(f.state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/webhook")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn secret_mismatch_is_unauthorized() {
        let f = fixture(Some("s3cret"));
        let app = router(f.state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/webhook")
                    .header("x-telegram-bot-api-secret-token", "wrong")
                    .body(Body::from(start_update_body()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/webhook")
                    .header("x-telegram-bot-api-secret-token", "s3cret")
                    .body(Body::from(start_update_body()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!f.transport.sent().await.is_empty());
    }

    #[tokio::test]
    async fn webhook_processes_update_and_registers_audience() {
        let f = fixture(None);
        let response = router(f.state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/webhook")
                    .body(Body::from(start_update_body()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");

        // Greeting went out and the chat joined the broadcast audience.
        assert!(!f.transport.sent_texts().await.is_empty());
        use leadbot_core::KvStore;
        assert_eq!(
            f.kv.set_members("audience:ids").await.unwrap(),
            vec!["42".to_string()]
        );
    }

    #[tokio::test]
    async fn malformed_webhook_body_is_swallowed() {
        let f = fixture(None);
        let response = router(f.state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/webhook")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
        assert!(f.transport.sent().await.is_empty());
    }

    #[tokio::test]
    async fn cron_broadcast_reports_no_job_then_sent() {
        let f = fixture(None);
        let app = router(f.state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/cron/broadcast")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "NO-JOB");

        use leadbot_core::{BroadcastQueue, KvStore};
        f.kv.set_add("audience:ids", "42").await.unwrap();
        SqliteBroadcastQueue::new(f.kv.clone())
            .enqueue("анонс")
            .await
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cron/broadcast")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "SENT:1");
        assert_eq!(f.transport.sent_texts().await, vec!["анонс".to_string()]);
    }

    #[tokio::test]
    async fn cron_reminders_is_ok_without_dispatcher() {
        let f = fixture(None);
        let response = router(f.state)
            .oneshot(
                Request::builder()
                    .uri("/api/cron/reminders")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let f = fixture(None);
        let response = router(f.state)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("\"status\":\"ok\""));
    }
}
