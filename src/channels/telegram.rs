//! Telegram channel — long-polls the Bot API for updates.
//!
//! Native Bot API implementation over reqwest: text messages and inline
//! callback taps in, messages with reply/inline keyboards out.

use async_trait::async_trait;

use crate::channels::{
    BotCommand, ButtonAction, ChatChannel, EventStream, InboundEvent, Keyboard,
};
use crate::error::ChannelError;

/// Maximum message length for Telegram's sendMessage API.
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

/// Telegram channel — connects to the Bot API via long-polling.
pub struct TelegramChannel {
    bot_token: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.bot_token)
    }

    fn send_failed(reason: impl std::fmt::Display) -> ChannelError {
        ChannelError::SendFailed {
            name: "telegram".into(),
            reason: reason.to_string(),
        }
    }

    /// POST a Bot API method and fail on a non-2xx response.
    async fn call(&self, method: &str, body: serde_json::Value) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(self.api_url(method))
            .json(&body)
            .send()
            .await
            .map_err(Self::send_failed)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(Self::send_failed(format!("{method} failed ({status}): {err}")));
        }
        Ok(())
    }

    /// Send a single chunk (≤4096 chars), Markdown-first with plain fallback.
    async fn send_chunk(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&serde_json::Value>,
    ) -> Result<(), ChannelError> {
        let mut markdown_body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        if let Some(markup) = reply_markup {
            markdown_body["reply_markup"] = markup.clone();
        }

        let markdown_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&markdown_body)
            .send()
            .await
            .map_err(Self::send_failed)?;

        if markdown_resp.status().is_success() {
            return Ok(());
        }

        let markdown_status = markdown_resp.status();
        tracing::warn!(
            status = ?markdown_status,
            "Telegram sendMessage with Markdown failed; retrying without parse_mode"
        );

        let mut plain_body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(markup) = reply_markup {
            plain_body["reply_markup"] = markup.clone();
        }

        let plain_resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&plain_body)
            .send()
            .await
            .map_err(Self::send_failed)?;

        if !plain_resp.status().is_success() {
            let plain_err = plain_resp.text().await.unwrap_or_default();
            return Err(Self::send_failed(format!(
                "sendMessage failed (markdown: {markdown_status}, plain: {plain_err})"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl ChatChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<EventStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let bot_token = self.bot_token.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            let mut offset: i64 = 0;

            tracing::info!("Telegram channel listening for updates...");

            loop {
                let url = format!("https://api.telegram.org/bot{bot_token}/getUpdates");
                let body = serde_json::json!({
                    "offset": offset,
                    "timeout": 30,
                    "allowed_updates": ["message", "callback_query"],
                });

                let resp = match client.post(&url).json(&body).send().await {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::warn!("Telegram poll error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                let data: serde_json::Value = match resp.json().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!("Telegram parse error: {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                        continue;
                    }
                };

                if let Some(results) = data.get("result").and_then(serde_json::Value::as_array) {
                    for update in results {
                        if let Some(uid) =
                            update.get("update_id").and_then(serde_json::Value::as_i64)
                        {
                            offset = uid + 1;
                        }

                        let Some(event) = parse_update(update) else {
                            continue;
                        };

                        if tx.send(event).is_err() {
                            tracing::info!("Telegram listener channel closed");
                            return;
                        }
                    }
                }
            }
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn send(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), ChannelError> {
        let markup = render_markup(&keyboard);
        let chunks = split_message(text, TELEGRAM_MAX_MESSAGE_LENGTH);

        // The keyboard belongs with the final chunk.
        let last = chunks.len() - 1;
        for (i, chunk) in chunks.iter().enumerate() {
            let markup_ref = if i == last { markup.as_ref() } else { None };
            self.send_chunk(chat_id, chunk, markup_ref).await?;
        }
        Ok(())
    }

    async fn clear_buttons(&self, chat_id: i64, message_id: i64) -> Result<(), ChannelError> {
        self.call(
            "editMessageReplyMarkup",
            serde_json::json!({
                "chat_id": chat_id,
                "message_id": message_id,
            }),
        )
        .await
    }

    async fn forward(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i64,
    ) -> Result<(), ChannelError> {
        self.call(
            "forwardMessage",
            serde_json::json!({
                "chat_id": to_chat_id,
                "from_chat_id": from_chat_id,
                "message_id": message_id,
            }),
        )
        .await
    }

    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), ChannelError> {
        self.call(
            "setMyCommands",
            serde_json::json!({ "commands": commands }),
        )
        .await
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Convert one `getUpdates` entry into an inbound event.
///
/// Messages without text (stickers, photos) and callback queries without a
/// source message are skipped.
fn parse_update(update: &serde_json::Value) -> Option<InboundEvent> {
    if let Some(message) = update.get("message") {
        let chat_id = message.get("chat")?.get("id")?.as_i64()?;
        let message_id = message.get("message_id")?.as_i64()?;
        let text = message.get("text")?.as_str()?;
        return Some(InboundEvent::Text {
            chat_id,
            message_id,
            text: text.to_string(),
        });
    }

    if let Some(callback) = update.get("callback_query") {
        let data = callback.get("data")?.as_str()?;
        let message = callback.get("message")?;
        let chat_id = message.get("chat")?.get("id")?.as_i64()?;
        let message_id = message.get("message_id")?.as_i64()?;
        return Some(InboundEvent::ButtonTap {
            chat_id,
            message_id,
            data: data.to_string(),
        });
    }

    None
}

/// Render a `Keyboard` as Telegram `reply_markup` JSON; `None` when the
/// message carries no markup.
fn render_markup(keyboard: &Keyboard) -> Option<serde_json::Value> {
    let markup = match keyboard {
        Keyboard::None => return None,
        Keyboard::Remove => serde_json::json!({ "remove_keyboard": true }),
        Keyboard::Reply(buttons) => {
            let rows: Vec<Vec<serde_json::Value>> = buttons
                .iter()
                .map(|label| vec![serde_json::json!({ "text": label })])
                .collect();
            serde_json::json!({
                "keyboard": rows,
                "resize_keyboard": true,
                "one_time_keyboard": true,
            })
        }
        Keyboard::Inline(buttons) => {
            let row: Vec<serde_json::Value> = buttons
                .iter()
                .map(|button| match &button.action {
                    ButtonAction::Url(url) => {
                        serde_json::json!({ "text": button.label, "url": url })
                    }
                    ButtonAction::Callback(data) => {
                        serde_json::json!({ "text": button.label, "callback_data": data })
                    }
                })
                .collect();
            serde_json::json!({ "inline_keyboard": [row] })
        }
    };
    Some(markup)
}

/// Split a message into chunks that fit Telegram's character limit.
/// Tries to split on newlines, then spaces, then hard-cuts.
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let chunk = &remaining[..max_len];
        let split_at = chunk
            .rfind('\n')
            .or_else(|| chunk.rfind(' '))
            .unwrap_or(max_len);

        // Don't split at position 0 (infinite loop guard)
        let split_at = if split_at == 0 { max_len } else { split_at };

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    chunks
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::InlineButton;

    #[test]
    fn telegram_channel_name() {
        let ch = TelegramChannel::new("fake-token".into());
        assert_eq!(ch.name(), "telegram");
    }

    #[test]
    fn telegram_api_url() {
        let ch = TelegramChannel::new("123:ABC".into());
        assert_eq!(
            ch.api_url("getMe"),
            "https://api.telegram.org/bot123:ABC/getMe"
        );
    }

    // ── Update parsing ──────────────────────────────────────────────

    #[test]
    fn parse_text_message() {
        let update = serde_json::json!({
            "update_id": 10,
            "message": {
                "message_id": 42,
                "chat": { "id": 555 },
                "text": "/register",
            }
        });
        assert_eq!(
            parse_update(&update),
            Some(InboundEvent::Text {
                chat_id: 555,
                message_id: 42,
                text: "/register".into(),
            })
        );
    }

    #[test]
    fn parse_callback_query() {
        let update = serde_json::json!({
            "update_id": 11,
            "callback_query": {
                "id": "abc",
                "data": "show_privat",
                "message": {
                    "message_id": 43,
                    "chat": { "id": 555 },
                }
            }
        });
        assert_eq!(
            parse_update(&update),
            Some(InboundEvent::ButtonTap {
                chat_id: 555,
                message_id: 43,
                data: "show_privat".into(),
            })
        );
    }

    #[test]
    fn parse_skips_textless_message() {
        let update = serde_json::json!({
            "update_id": 12,
            "message": {
                "message_id": 44,
                "chat": { "id": 555 },
                "photo": [],
            }
        });
        assert_eq!(parse_update(&update), None);
    }

    #[test]
    fn parse_skips_unknown_update() {
        let update = serde_json::json!({ "update_id": 13, "edited_message": {} });
        assert_eq!(parse_update(&update), None);
    }

    // ── Reply markup rendering ──────────────────────────────────────

    #[test]
    fn render_none_has_no_markup() {
        assert_eq!(render_markup(&Keyboard::None), None);
    }

    #[test]
    fn render_remove_keyboard() {
        let markup = render_markup(&Keyboard::Remove).unwrap();
        assert_eq!(markup["remove_keyboard"], true);
    }

    #[test]
    fn render_reply_keyboard_one_button_per_row() {
        let markup = render_markup(&Keyboard::choices(["Розклад", "Вартість"])).unwrap();
        assert_eq!(markup["resize_keyboard"], true);
        assert_eq!(markup["one_time_keyboard"], true);
        assert_eq!(markup["keyboard"][0][0]["text"], "Розклад");
        assert_eq!(markup["keyboard"][1][0]["text"], "Вартість");
    }

    #[test]
    fn render_inline_keyboard_url_and_callback() {
        let markup = render_markup(&Keyboard::Inline(vec![
            InlineButton::url("Monobank", "https://send.monobank.ua/jar/x"),
            InlineButton::callback("ПриватБанк ▶️", "show_privat"),
        ]))
        .unwrap();
        let row = &markup["inline_keyboard"][0];
        assert_eq!(row[0]["text"], "Monobank");
        assert_eq!(row[0]["url"], "https://send.monobank.ua/jar/x");
        assert_eq!(row[1]["callback_data"], "show_privat");
    }

    // ── Message splitting ───────────────────────────────────────────

    #[test]
    fn split_message_short() {
        let chunks = split_message("Привіт", 4096);
        assert_eq!(chunks, vec!["Привіт"]);
    }

    #[test]
    fn split_message_exact_limit() {
        let msg = "a".repeat(4096);
        let chunks = split_message(&msg, 4096);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 4096);
    }

    #[test]
    fn split_message_over_limit_on_newline() {
        let msg = format!("{}\n{}", "a".repeat(2000), "b".repeat(3000));
        let chunks = split_message(&msg, 4096);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "a".repeat(2000));
        assert_eq!(chunks[1], "b".repeat(3000));
    }

    #[test]
    fn split_message_no_good_split_point() {
        let msg = "a".repeat(5000);
        let chunks = split_message(&msg, 4096);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 4096);
        assert_eq!(chunks[1].len(), 904);
    }
}
