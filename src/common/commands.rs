use super::wire::ClientEvent;

/// Commands the UI thread sends down to the network worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkCommand {
    /// Verify the token persisted from a previous session, if any.
    RestoreSession,
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
    },
    Logout,
    LoadChats,
    /// Re-fetch a single chat with its messages.
    LoadChat {
        chat_id: String,
    },
    LoadUsers,
    /// Persist a chat that the store already created locally.
    CreateChat {
        provisional_id: String,
        participant_ids: Vec<String>,
        name: Option<String>,
        is_group: bool,
    },
    /// Persist a message that the store already shows as provisional.
    PersistMessage {
        provisional_id: String,
        chat_id: String,
        content: String,
    },
    /// Best-effort socket emit.
    Emit(ClientEvent),
}

impl NetworkCommand {
    pub fn emit(event: ClientEvent) -> Self {
        NetworkCommand::Emit(event)
    }
}
