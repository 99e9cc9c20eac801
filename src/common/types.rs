use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A marketplace user as seen by the chat client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            photo_url: None,
            is_online: false,
            last_seen: None,
            email: None,
            role: None,
        }
    }
}

/// A chat message. `user_id` is `None` for system messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl ChatMessage {
    pub fn is_system(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn is_from(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }

    /// Flip the read flag. Returns true when the flag actually changed.
    pub fn mark_read(&mut self) -> bool {
        let changed = !self.read;
        self.read = true;
        changed
    }
}

/// A conversation. `messages` are kept newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub last_message_at: DateTime<Utc>,
    #[serde(default)]
    pub participants: Vec<User>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl Chat {
    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.first()
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.id == user_id)
    }

    /// The participant a 1:1 chat is "with", seen from `me`.
    pub fn counterpart(&self, me: &str) -> Option<&User> {
        self.participants.iter().find(|p| p.id != me)
    }

    /// Group name for groups, the other participant's name otherwise.
    pub fn display_name(&self, me: &str) -> String {
        if self.is_group {
            return self.name.clone();
        }
        self.counterpart(me)
            .map(|user| user.name.clone())
            .unwrap_or_else(|| "Chat".to_string())
    }

    pub fn unread_count(&self, me: &str) -> usize {
        self.messages
            .iter()
            .filter(|m| !m.is_system() && !m.is_from(me) && !m.read)
            .count()
    }

    /// Sort messages newest first and pull `last_message_at` forward to the
    /// newest message if the snapshot lagged behind.
    pub fn normalize(&mut self) {
        self.messages
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(newest) = self.messages.first() {
            if newest.created_at > self.last_message_at {
                self.last_message_at = newest.created_at;
            }
        }
    }

    /// Prepend a message and bump the last-activity timestamp.
    pub fn push_message(&mut self, message: ChatMessage) {
        if message.created_at > self.last_message_at {
            self.last_message_at = message.created_at;
        }
        self.messages.insert(0, message);
    }
}
