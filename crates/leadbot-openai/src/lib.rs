// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-backed seller responder for leadbot.
//!
//! Wraps the chat-completions API behind the [`SellerResponder`] seam:
//! a fixed B2B sales system prompt, the serialized lead context, a short
//! rolling history, and the user's message capped at 4000 characters.

pub mod client;
pub mod types;

use async_trait::async_trait;
use leadbot_core::{LeadbotError, SellerRequest, SellerResponder};
use tracing::debug;

pub use client::OpenAiClient;
use types::{ChatMessage, ChatRequest};

const SYSTEM_PROMPT: &str = "Ты опытный B2B-продавец. Общайся естественно, кратко и по делу. \
Цель: назначить следующий шаг (созвон/встреча) или предложить Cashflow/продукт. \
Всегда учитывай контекст лида (источник: реклама/органика, имя/компания, если есть).";

/// Static reply used when the model returns an empty completion.
pub const EMPTY_COMPLETION_FALLBACK: &str = "Готов помочь! Расскажите, что вас интересует?";

const MAX_USER_MESSAGE_CHARS: usize = 4000;

pub struct OpenAiSeller {
    client: OpenAiClient,
    model: String,
    temperature: f32,
}

impl OpenAiSeller {
    pub fn new(api_key: &str, model: &str, temperature: f32) -> Result<Self, LeadbotError> {
        Ok(Self {
            client: OpenAiClient::new(api_key)?,
            model: model.to_string(),
            temperature,
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, url: String) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    fn build_request(&self, request: &SellerRequest) -> Result<ChatRequest, LeadbotError> {
        let mut system = SYSTEM_PROMPT.to_string();
        if let Some(instruction) = &request.instruction {
            system.push(' ');
            system.push_str(instruction);
        }

        let context = serde_json::to_string(&request.context)
            .map_err(|e| LeadbotError::Internal(format!("lead context serialization: {e}")))?;

        let mut messages = vec![
            ChatMessage::system(system),
            ChatMessage::user(format!("Контекст лида: {context}")),
        ];
        for turn in &request.history {
            messages.push(ChatMessage {
                role: turn.role.clone(),
                content: turn.text.clone(),
            });
        }
        messages.push(ChatMessage::user(
            request
                .user_message
                .chars()
                .take(MAX_USER_MESSAGE_CHARS)
                .collect::<String>(),
        ));

        Ok(ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
        })
    }
}

#[async_trait]
impl SellerResponder for OpenAiSeller {
    async fn reply(&self, request: &SellerRequest) -> Result<String, LeadbotError> {
        let chat_request = self.build_request(request)?;
        let response = self.client.complete(&chat_request).await?;
        Ok(response.first_text().unwrap_or_else(|| {
            debug!("empty completion, using static fallback");
            EMPTY_COMPLETION_FALLBACK.to_string()
        }))
    }
}
