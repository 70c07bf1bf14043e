//! Inbound webhook event payloads.

use atendente_core::ChatId;
use serde::Deserialize;

/// One inbound message as delivered by the gateway.
///
/// The gateway posts the message object itself as the webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    /// Chat identifier of the sender, e.g. `5511999999999@c.us`.
    pub from: String,
    /// Message text. Absent for media-only messages.
    #[serde(default)]
    pub body: Option<String>,
    /// True for messages this account sent itself.
    #[serde(rename = "fromMe", default)]
    pub from_me: bool,
    /// Display name of the sender, when the gateway provides one.
    #[serde(rename = "senderName", default)]
    pub sender_name: Option<String>,
}

impl InboundMessage {
    /// The chat this message belongs to.
    #[must_use]
    pub fn chat_id(&self) -> ChatId {
        ChatId::new(self.from.as_str())
    }

    /// Trimmed message text, or `None` when there is nothing to process.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        let body = self.body.as_deref()?.trim();
        if body.is_empty() { None } else { Some(body) }
    }
}
