//! Realtime socket frames.
//!
//! Every frame is a JSON text message with an `{ "event", "data" }` envelope.
//! Inbound frames are pushed by the server, outbound frames are emitted by the
//! client without acknowledgement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::ChatMessage;

/// Server → client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    NewMessage(ChatMessage),
    UserTyping(TypingNotice),
    MessagesRead(ReadReceipt),
    UserStatusChange(PresenceChange),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingNotice {
    pub chat_id: String,
    pub user_id: String,
    pub user_name: String,
}

/// `user_id` is the peer who opened the chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub chat_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceChange {
    pub user_id: String,
    pub is_online: bool,
    pub last_seen: DateTime<Utc>,
}

/// Client → server events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    SendMessage {
        #[serde(rename = "chatId")]
        chat_id: String,
        content: String,
    },
    Typing {
        #[serde(rename = "chatId")]
        chat_id: String,
    },
    MarkRead {
        #[serde(rename = "chatId")]
        chat_id: String,
    },
    JoinChat {
        #[serde(rename = "chatId")]
        chat_id: String,
    },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::SendMessage { .. } => "send_message",
            ClientEvent::Typing { .. } => "typing",
            ClientEvent::MarkRead { .. } => "mark_read",
            ClientEvent::JoinChat { .. } => "join_chat",
        }
    }

    pub fn chat_id(&self) -> &str {
        match self {
            ClientEvent::SendMessage { chat_id, .. }
            | ClientEvent::Typing { chat_id }
            | ClientEvent::MarkRead { chat_id }
            | ClientEvent::JoinChat { chat_id } => chat_id,
        }
    }
}

pub fn encode(event: &ClientEvent) -> serde_json::Result<String> {
    serde_json::to_string(event)
}

pub fn decode(frame: &str) -> serde_json::Result<ServerEvent> {
    serde_json::from_str(frame)
}
