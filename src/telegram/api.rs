use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{BotError, Result};

/// One inbound update from long polling.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub data: Option<String>,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Typing/upload indicators shown while a slow operation runs.
#[derive(Debug, Clone, Copy)]
pub enum ChatAction {
    Typing,
    UploadDocument,
    UploadPhoto,
}

impl ChatAction {
    fn as_str(self) -> &'static str {
        match self {
            ChatAction::Typing => "typing",
            ChatAction::UploadDocument => "upload_document",
            ChatAction::UploadPhoto => "upload_photo",
        }
    }
}

/// Thin Bot API wrapper. No business logic here: every method is one
/// HTTP call with the envelope unwrapped.
#[derive(Clone)]
pub struct TelegramClient {
    base_url: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(bot_token: &str) -> Self {
        Self {
            base_url: format!("https://api.telegram.org/bot{}", bot_token),
            client: reqwest::Client::new(),
        }
    }

    async fn call<T: serde::de::DeserializeOwned>(&self, method: &str, body: Value) -> Result<T> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(&body)
            .send()
            .await?;

        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.ok {
            let description = envelope.description.unwrap_or_default();
            return Err(BotError::Internal(format!("{method} failed: {description}")));
        }
        envelope
            .result
            .ok_or_else(|| BotError::Internal(format!("{method} returned no result")))
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            serde_json::json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    /// Send a Markdown message; `reply_markup` is an optional keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<Value>,
    ) -> Result<Message> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "protect_content": true,
        });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = markup;
        }
        self.call("sendMessage", body).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<Value>,
    ) -> Result<Message> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = markup;
        }
        self.call("editMessageText", body).await
    }

    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<bool> {
        self.call(
            "deleteMessage",
            serde_json::json!({ "chat_id": chat_id, "message_id": message_id }),
        )
        .await
    }

    pub async fn send_chat_action(&self, chat_id: i64, action: ChatAction) -> Result<bool> {
        self.call(
            "sendChatAction",
            serde_json::json!({ "chat_id": chat_id, "action": action.as_str() }),
        )
        .await
    }

    /// Acknowledge a callback so the client stops the button spinner.
    pub async fn answer_callback_query(&self, callback_id: &str) -> Result<bool> {
        self.call(
            "answerCallbackQuery",
            serde_json::json!({ "callback_query_id": callback_id }),
        )
        .await
    }

    pub async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<()> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("document", part);

        self.send_multipart("sendDocument", form).await
    }

    pub async fn send_photo(
        &self,
        chat_id: i64,
        filename: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<()> {
        let part = multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("photo", part);

        self.send_multipart("sendPhoto", form).await
    }

    async fn send_multipart(&self, method: &str, form: multipart::Form) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(target: "telegram", %status, "{} failed: {}", method, body);
            return Err(BotError::Internal(format!("{method} returned {status}")));
        }
        Ok(())
    }
}
