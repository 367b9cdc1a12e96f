//! The `ChatChannel` trait and the inbound/outbound message model.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;

use crate::error::ChannelError;
use crate::texts;

/// Stream of inbound events produced by a running channel.
pub type EventStream = BoxStream<'static, InboundEvent>;

/// One inbound event from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// A free-text message (a typed reply or a tapped reply-keyboard button).
    Text {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    /// An inline-keyboard button tap, carrying its callback payload.
    ButtonTap {
        chat_id: i64,
        message_id: i64,
        data: String,
    },
}

impl InboundEvent {
    /// The chat (session) this event belongs to.
    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Text { chat_id, .. } | Self::ButtonTap { chat_id, .. } => *chat_id,
        }
    }
}

/// Reply markup attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// No reply markup at all.
    None,
    /// Remove any custom reply keyboard.
    Remove,
    /// One-time resized reply keyboard with the given button labels.
    Reply(Vec<String>),
    /// Inline keyboard under the message.
    Inline(Vec<InlineButton>),
}

impl Keyboard {
    /// The single-button cancel keyboard shown with every wizard prompt.
    pub fn cancel() -> Self {
        Self::Reply(vec![texts::CANCEL_BUTTON.to_string()])
    }

    /// One-time reply keyboard from string labels.
    pub fn choices<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Reply(labels.into_iter().map(Into::into).collect())
    }
}

/// One inline-keyboard button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub action: ButtonAction,
}

/// What an inline button does when tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Opens a URL.
    Url(String),
    /// Sends a callback payload back to the bot.
    Callback(String),
}

impl InlineButton {
    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Url(url.into()),
        }
    }

    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }
}

/// A bot command registered with the platform's command menu.
#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    pub command: String,
    pub description: String,
}

/// Transport seam between the dispatcher and the chat platform.
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Channel name for logs.
    fn name(&self) -> &str;

    /// Start listening; returns the stream of inbound events.
    async fn start(&self) -> Result<EventStream, ChannelError>;

    /// Send a message with the given reply markup.
    async fn send(&self, chat_id: i64, text: &str, keyboard: Keyboard)
        -> Result<(), ChannelError>;

    /// Remove the inline keyboard from a previously sent message.
    async fn clear_buttons(&self, chat_id: i64, message_id: i64) -> Result<(), ChannelError>;

    /// Forward a message from one chat to another.
    async fn forward(
        &self,
        to_chat_id: i64,
        from_chat_id: i64,
        message_id: i64,
    ) -> Result<(), ChannelError>;

    /// Register the command menu.
    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), ChannelError>;
}
