// SPDX-FileCopyrightText: 2026 Leadbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook update extraction.
//!
//! Converts a raw Telegram update into the channel-agnostic
//! [`InboundUpdate`] the conversation engine consumes. Non-message updates
//! and messages without text or a sender are dropped.

use leadbot_core::InboundUpdate;
use teloxide::types::{Message, Update, UpdateKind};
use tracing::debug;

/// Parses a raw webhook body into a Telegram update.
///
/// Returns `None` on malformed payloads; the webhook always answers 200
/// to Telegram, so parse failures are dropped rather than surfaced.
pub fn parse_update(body: &[u8]) -> Option<Update> {
    match serde_json::from_slice(body) {
        Ok(update) => Some(update),
        Err(e) => {
            debug!(error = %e, "dropping malformed webhook payload");
            None
        }
    }
}

/// Checks whether the sender matches any admin entry.
///
/// Entries match by user ID or username (with or without an `@` prefix,
/// case-insensitive). An empty list means nobody is an admin.
pub fn is_admin(msg: &Message, admin_users: &[String]) -> bool {
    let Some(user) = msg.from.as_ref() else {
        return false;
    };
    let user_id = user.id.0.to_string();

    for admin in admin_users {
        if *admin == user_id {
            return true;
        }
        if let Some(ref username) = user.username {
            let clean = admin.strip_prefix('@').unwrap_or(admin);
            if username.eq_ignore_ascii_case(clean) {
                return true;
            }
        }
    }
    false
}

/// Extracts an [`InboundUpdate`] from a raw Telegram update.
///
/// Returns `None` for non-message updates, messages without text, and
/// messages without a sender (channel posts).
pub fn to_inbound(update: &Update, admin_users: &[String]) -> Option<InboundUpdate> {
    let UpdateKind::Message(msg) = &update.kind else {
        debug!(update_id = update.id.0, "ignoring non-message update");
        return None;
    };
    let text = msg.text()?;
    let user = msg.from.as_ref()?;

    let reply_to_text = msg
        .reply_to_message()
        .and_then(|replied| replied.text())
        .map(str::to_string);

    Some(InboundUpdate {
        chat_id: msg.chat.id.0,
        user_id: user.id.0.to_string(),
        text: text.to_string(),
        reply_to_text,
        from_admin: is_admin(msg, admin_users),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mock private chat update from JSON, matching Telegram Bot
    /// API structure.
    fn make_update(user_id: u64, username: Option<&str>, text: &str) -> Update {
        make_update_with_reply(user_id, username, text, None)
    }

    fn make_update_with_reply(
        user_id: u64,
        username: Option<&str>,
        text: &str,
        reply_to: Option<&str>,
    ) -> Update {
        let mut from = serde_json::json!({
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
        });
        if let Some(uname) = username {
            from["username"] = serde_json::json!(uname);
        }

        let mut message = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": from,
            "text": text,
        });
        if let Some(prompt) = reply_to {
            message["reply_to_message"] = serde_json::json!({
                "message_id": 2,
                "date": 1700000000i64,
                "chat": {
                    "id": user_id as i64,
                    "type": "private",
                    "first_name": "Test",
                },
                "from": {
                    "id": 999999u64,
                    "is_bot": true,
                    "first_name": "Bot",
                },
                "text": prompt,
            });
        }

        let json = serde_json::json!({
            "update_id": 1,
            "message": message,
        });
        // teloxide's Update deserializer cannot run from a serde_json::Value
        // (borrowed-key lookup fails and falls back to UpdateKind::Error), so
        // round-trip through a string like the real webhook path does.
        serde_json::from_str(&json.to_string()).expect("failed to deserialize mock update")
    }

    #[test]
    fn extracts_text_and_sender() {
        let update = make_update(12345, Some("testuser"), "привет");
        let inbound = to_inbound(&update, &[]).unwrap();
        assert_eq!(inbound.chat_id, 12345);
        assert_eq!(inbound.user_id, "12345");
        assert_eq!(inbound.text, "привет");
        assert!(inbound.reply_to_text.is_none());
        assert!(!inbound.from_admin);
    }

    #[test]
    fn carries_reply_to_text() {
        let update = make_update_with_reply(12345, None, "Анна", Some("Как вас зовут?"));
        let inbound = to_inbound(&update, &[]).unwrap();
        assert_eq!(inbound.reply_to_text.as_deref(), Some("Как вас зовут?"));
    }

    #[test]
    fn admin_matches_by_id_and_username() {
        let update = make_update(12345, Some("TestUser"), "/broadcast");
        assert!(to_inbound(&update, &["12345".into()]).unwrap().from_admin);
        assert!(to_inbound(&update, &["@testuser".into()]).unwrap().from_admin);
        assert!(!to_inbound(&update, &["99999".into()]).unwrap().from_admin);
        assert!(!to_inbound(&update, &[]).unwrap().from_admin);
    }

    #[test]
    fn drops_non_message_updates() {
        let json = serde_json::json!({
            "update_id": 1,
            "edited_message": {
                "message_id": 1,
                "date": 1700000000i64,
                "chat": {
                    "id": 12345i64,
                    "type": "private",
                    "first_name": "Test",
                },
                "from": {
                    "id": 12345u64,
                    "is_bot": false,
                    "first_name": "Test",
                },
                "text": "edited",
            },
        });
        let update: Update = serde_json::from_str(&json.to_string()).unwrap();
        assert!(to_inbound(&update, &[]).is_none());
    }

    #[test]
    fn drops_messages_without_text() {
        let json = serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "date": 1700000000i64,
                "chat": {
                    "id": 12345i64,
                    "type": "private",
                    "first_name": "Test",
                },
                "from": {
                    "id": 12345u64,
                    "is_bot": false,
                    "first_name": "Test",
                },
                "sticker": {
                    "file_id": "abc",
                    "file_unique_id": "def",
                    "type": "regular",
                    "width": 512,
                    "height": 512,
                    "is_animated": false,
                    "is_video": false,
                },
            },
        });
        let update: Update = serde_json::from_str(&json.to_string()).unwrap();
        assert!(to_inbound(&update, &[]).is_none());
    }
}
