use crate::error::BotError;

use super::api::Update;

/// Inbound event after decoding a raw update. Anything that does not
/// decode (no chat, no payload) is dropped by the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    Command { chat_id: i64, name: String },
    Text { chat_id: i64, text: String },
    Callback {
        chat_id: i64,
        callback_id: String,
        message_id: Option<i64>,
        payload: String,
    },
}

impl BotEvent {
    /// Decode one update. Returns `None` for update kinds the bot does
    /// not consume (edited messages, inline queries, ...).
    pub fn from_update(update: &Update) -> Option<Self> {
        if let Some(message) = &update.message {
            let text = message.text.as_deref()?.trim();
            if text.is_empty() {
                return Some(BotEvent::Text {
                    chat_id: message.chat.id,
                    text: String::new(),
                });
            }
            if let Some(command) = text.strip_prefix('/') {
                // "/stat@my_bot arg" -> "stat"
                let name = command
                    .split_whitespace()
                    .next()
                    .unwrap_or("")
                    .split('@')
                    .next()
                    .unwrap_or("")
                    .to_string();
                return Some(BotEvent::Command {
                    chat_id: message.chat.id,
                    name,
                });
            }
            return Some(BotEvent::Text {
                chat_id: message.chat.id,
                text: text.to_string(),
            });
        }

        if let Some(cq) = &update.callback_query {
            let chat_id = cq.message.as_ref()?.chat.id;
            return Some(BotEvent::Callback {
                chat_id,
                callback_id: cq.id.clone(),
                message_id: cq.message.as_ref().map(|m| m.message_id),
                payload: cq.data.clone().unwrap_or_default(),
            });
        }

        None
    }
}

/// Button-press payloads. The page number travels as plain text after
/// the action tag ("pg|3").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    Page(i64),
    Export,
    AdminStats,
    AdminEditRow,
    AdminExit,
}

impl CallbackAction {
    /// Parse a callback payload. Malformed payloads come back as
    /// `InvalidPagePayload` so the handler can drop them quietly instead
    /// of crashing on a stale or forged button.
    pub fn parse(payload: &str) -> Result<Self, BotError> {
        match payload {
            "export" => return Ok(CallbackAction::Export),
            "admin_stats" => return Ok(CallbackAction::AdminStats),
            "admin_edit_row" => return Ok(CallbackAction::AdminEditRow),
            "admin_exit" => return Ok(CallbackAction::AdminExit),
            _ => {}
        }

        if let Some(raw_page) = payload.strip_prefix("pg|") {
            return raw_page
                .parse::<i64>()
                .map(CallbackAction::Page)
                .map_err(|_| BotError::InvalidPagePayload(payload.to_string()));
        }

        Err(BotError::InvalidPagePayload(payload.to_string()))
    }
}
