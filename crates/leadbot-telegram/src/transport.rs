// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ChatTransport`] implementation over the Telegram Bot API.

use async_trait::async_trait;
use leadbot_core::{ChatTransport, LeadbotError};
use teloxide::prelude::*;
use teloxide::types::{ForceReply, InputFile, ReplyMarkup};

fn send_err(what: &str, e: teloxide::RequestError) -> LeadbotError {
    LeadbotError::Channel {
        message: format!("failed to {what}: {e}"),
        source: Some(Box::new(e)),
    }
}

fn parse_url(url: &str) -> Result<reqwest::Url, LeadbotError> {
    reqwest::Url::parse(url).map_err(|e| LeadbotError::Channel {
        message: format!("invalid media url {url}: {e}"),
        source: None,
    })
}

/// Outbound Telegram messaging.
///
/// Prompts are sent with a force-reply markup so the user's answer carries
/// the prompt text back as `reply_to_text`, which is what drives form step
/// recovery on the next update.
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot_token: &str) -> Result<Self, LeadbotError> {
        if bot_token.is_empty() {
            return Err(LeadbotError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }
        Ok(Self {
            bot: Bot::new(bot_token),
        })
    }

    /// The underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), LeadbotError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|e| send_err("send message", e))?;
        Ok(())
    }

    async fn send_prompt(&self, chat_id: i64, text: &str) -> Result<(), LeadbotError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_markup(ReplyMarkup::ForceReply(ForceReply::new()))
            .await
            .map_err(|e| send_err("send prompt", e))?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        url: &str,
        caption: &str,
    ) -> Result<(), LeadbotError> {
        self.bot
            .send_document(ChatId(chat_id), InputFile::url(parse_url(url)?))
            .caption(caption)
            .await
            .map_err(|e| send_err("send document", e))?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, url: &str, caption: &str) -> Result<(), LeadbotError> {
        self.bot
            .send_photo(ChatId(chat_id), InputFile::url(parse_url(url)?))
            .caption(caption)
            .await
            .map_err(|e| send_err("send photo", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_token() {
        assert!(TelegramTransport::new("").is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        assert!(TelegramTransport::new("123456:ABC-DEF1234ghIkl").is_ok());
    }

    #[test]
    fn parse_url_rejects_garbage() {
        assert!(parse_url("not a url").is_err());
        assert!(parse_url("https://drive.google.com/uc?export=download&id=x").is_ok());
    }
}
