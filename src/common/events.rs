use super::types::{Chat, ChatMessage, User};
use super::wire::ServerEvent;

/// Events the network worker reports back to the UI thread.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    SignedIn {
        user: User,
        token: String,
    },
    /// `reason` is set when the session ended because of an auth failure.
    SignedOut {
        reason: Option<String>,
    },
    AuthFailed(String),
    ChatsLoaded(Vec<Chat>),
    ChatsLoadFailed(String),
    ChatLoaded(Chat),
    ChatLoadFailed {
        chat_id: String,
        error: String,
    },
    UsersLoaded(Vec<User>),
    UsersLoadFailed(String),
    ChatPersisted {
        provisional_id: String,
        chat: Chat,
    },
    ChatPersistFailed {
        provisional_id: String,
        error: String,
    },
    MessagePersisted {
        provisional_id: String,
        message: ChatMessage,
    },
    MessagePersistFailed {
        provisional_id: String,
        error: String,
    },
    ConnectionChanged {
        connected: bool,
    },
    /// An inbound realtime frame, in arrival order.
    Server(ServerEvent),
}

impl NetworkEvent {
    /// Events that only make sense while someone is signed in.
    pub fn needs_session(&self) -> bool {
        !matches!(
            self,
            NetworkEvent::SignedIn { .. }
                | NetworkEvent::SignedOut { .. }
                | NetworkEvent::AuthFailed(_)
                | NetworkEvent::ConnectionChanged { .. }
        )
    }
}
