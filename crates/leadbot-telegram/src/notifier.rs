// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator notifications: new-lead cards and free-form messages.

use async_trait::async_trait;
use leadbot_core::{Lead, LeadbotError, Notifier};
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::debug;

/// Formats the operator-facing new-lead card.
pub fn lead_card(lead: &Lead) -> String {
    let dash = |s: &str| {
        if s.trim().is_empty() {
            "-".to_string()
        } else {
            s.to_string()
        }
    };

    let mut lines = vec![
        "Новый лид (B2B):".to_string(),
        format!(
            "👤 {}\n📱 {}\n🏢 {}",
            dash(&lead.name),
            dash(&lead.contact),
            dash(&lead.company)
        ),
    ];
    if !lead.answers.trim().is_empty() {
        lines.push(format!("💬 {}", lead.answers));
    }
    lines.push(format!("🔥 {}", lead.source));
    lines.join("\n")
}

/// Sends operator notifications to the configured chat.
///
/// With no operator chat configured every call is a silent no-op, so the
/// bot keeps working for end users even when nobody is watching.
pub struct TelegramNotifier {
    bot: Bot,
    operator_chat_id: Option<i64>,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, operator_chat_id: Option<i64>) -> Self {
        Self {
            bot,
            operator_chat_id,
        }
    }

    async fn send(&self, text: &str) -> Result<(), LeadbotError> {
        let Some(chat_id) = self.operator_chat_id else {
            debug!("no operator chat configured, dropping notification");
            return Ok(());
        };
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .await
            .map_err(|e| LeadbotError::Channel {
                message: format!("failed to notify operator: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify_lead(&self, lead: &Lead) -> Result<(), LeadbotError> {
        self.send(&lead_card(lead)).await
    }

    async fn notify_text(&self, text: &str) -> Result<(), LeadbotError> {
        self.send(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadbot_core::LeadSource;

    fn lead() -> Lead {
        Lead {
            timestamp: "2026-01-01T00:00:00Z".into(),
            source: LeadSource::Organic,
            user_id: "42".into(),
            name: "Анна".into(),
            contact: "+79990001122".into(),
            company: "Ромашка".into(),
            answers: String::new(),
            checklist_sent: true,
        }
    }

    #[test]
    fn card_has_header_and_field_lines() {
        let card = lead_card(&lead());
        assert_eq!(
            card,
            "Новый лид (B2B):\n👤 Анна\n📱 +79990001122\n🏢 Ромашка\n🔥 Органика"
        );
    }

    #[test]
    fn card_includes_answers_when_present() {
        let mut l = lead();
        l.source = LeadSource::Ads;
        l.answers = "promo42".into();
        let card = lead_card(&l);
        assert!(card.contains("💬 promo42"));
        assert!(card.ends_with("🔥 Реклама"));
    }

    #[test]
    fn card_dashes_out_missing_fields() {
        let mut l = lead();
        l.name.clear();
        l.contact = "  ".into();
        let card = lead_card(&l);
        assert!(card.contains("👤 -"));
        assert!(card.contains("📱 -"));
        assert!(card.contains("🏢 Ромашка"));
    }

    #[tokio::test]
    async fn no_operator_chat_is_a_noop() {
        let notifier = TelegramNotifier::new(Bot::new("test:token"), None);
        notifier.notify_lead(&lead()).await.unwrap();
        notifier.notify_text("свободный текст").await.unwrap();
    }
}
