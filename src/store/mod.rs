//! Client-side chat state.
//!
//! The store owns a single normalized copy of every chat (by id) plus the
//! list order; the active chat is only an id and is read through
//! [`ChatStore::active_chat`]. All mutation happens on the UI thread, either
//! through the user-facing operations or through [`ChatStore::apply`], which
//! reconciles events reported by the network worker.

pub mod notices;
pub mod typing;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::common::{
    Chat, ChatMessage, ClientEvent, NetworkCommand, NetworkEvent, PresenceChange, ReadReceipt,
    ServerEvent, TypingNotice, User,
};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::mock;

pub use notices::{Notice, NoticeLevel, Notices};
pub use typing::TypingTracker;

/// Prefix of ids minted locally before the backend confirms an entity.
pub const PROVISIONAL_PREFIX: &str = "local-";

/// Where the store sends work for the network worker.
pub trait CommandSink {
    /// Queue a command. Returns false when it could not be queued.
    fn dispatch(&self, command: NetworkCommand) -> bool;
}

impl CommandSink for mpsc::Sender<NetworkCommand> {
    fn dispatch(&self, command: NetworkCommand) -> bool {
        match self.try_send(command) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Failed to send command to network: {err}");
                false
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Persist chats and messages through the REST API.
    pub persist: bool,
    /// Install the canned dataset when the first chat load fails.
    pub fallback_to_mock: bool,
    pub typing_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            persist: true,
            fallback_to_mock: false,
            typing_timeout: typing::DEFAULT_TYPING_TIMEOUT,
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            persist: !config.use_mock_data,
            fallback_to_mock: config.fallback_to_mock,
            typing_timeout: config.typing_timeout(),
        }
    }
}

pub struct ChatStore {
    sink: Box<dyn CommandSink>,
    options: StoreOptions,
    current_user: Option<User>,
    chats: HashMap<String, Chat>,
    /// Chat ids, most recent activity first.
    order: Vec<String>,
    active: Option<String>,
    directory: BTreeMap<String, User>,
    typing: TypingTracker,
    pending_sends: HashSet<String>,
    loading_chats: bool,
    loading_users: bool,
    auth_pending: bool,
    connected: bool,
    notices: Notices,
}

impl ChatStore {
    pub fn new(sink: Box<dyn CommandSink>, options: StoreOptions) -> Self {
        let typing = TypingTracker::new(options.typing_timeout);
        Self {
            sink,
            options,
            current_user: None,
            chats: HashMap::new(),
            order: Vec::new(),
            active: None,
            directory: BTreeMap::new(),
            typing,
            pending_sends: HashSet::new(),
            loading_chats: false,
            loading_users: false,
            auth_pending: false,
            connected: false,
            notices: Notices::default(),
        }
    }

    // ========== Selectors ==========

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_auth_pending(&self) -> bool {
        self.auth_pending
    }

    /// Chats in list order (most recent activity first).
    pub fn chats(&self) -> impl Iterator<Item = &Chat> {
        self.order.iter().filter_map(|id| self.chats.get(id))
    }

    pub fn chat(&self, chat_id: &str) -> Option<&Chat> {
        self.chats.get(chat_id)
    }

    pub fn active_chat_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_chat(&self) -> Option<&Chat> {
        self.active.as_ref().and_then(|id| self.chats.get(id))
    }

    pub fn typing_names(&self, chat_id: &str) -> Vec<&str> {
        self.typing.names(chat_id)
    }

    pub fn next_typing_deadline(&self) -> Option<Instant> {
        self.typing.next_deadline()
    }

    /// Everyone known to the client except the current user, sorted by name.
    pub fn directory(&self) -> Vec<&User> {
        let me = self.current_user.as_ref().map(|u| u.id.as_str());
        let mut users: Vec<&User> = self
            .directory
            .values()
            .filter(|u| Some(u.id.as_str()) != me)
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users
    }

    pub fn is_loading_chats(&self) -> bool {
        self.loading_chats
    }

    pub fn is_loading_users(&self) -> bool {
        self.loading_users
    }

    pub fn is_sending(&self) -> bool {
        !self.pending_sends.is_empty()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether messages can go to `chat_id`. A chat created locally has no
    /// server id until the backend confirms it.
    pub fn is_chat_ready(&self, chat_id: &str) -> bool {
        !(self.options.persist && chat_id.starts_with(PROVISIONAL_PREFIX))
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    // ========== Session ==========

    pub fn restore_session(&mut self) {
        self.auth_pending = self.sink.dispatch(NetworkCommand::RestoreSession);
    }

    pub fn login(&mut self, email: &str, password: &str) {
        self.auth_pending = self.sink.dispatch(NetworkCommand::Login {
            email: email.trim().to_string(),
            password: password.to_string(),
        });
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) {
        self.auth_pending = self.sink.dispatch(NetworkCommand::Register {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        });
    }

    pub fn logout(&mut self) {
        if !self.sink.dispatch(NetworkCommand::Logout) {
            // The worker is gone; at least forget the session locally.
            self.reset(None);
        }
    }

    // ========== Chat operations ==========

    /// Ask for the signed-in user's chats. The collection is replaced when
    /// they arrive.
    pub fn load_chats(&mut self) -> Result<()> {
        self.require_user()?;
        if !self.sink.dispatch(NetworkCommand::LoadChats) {
            self.notices
                .error("Error", "No se pudieron cargar los chats.");
            return Err(Error::WorkerUnavailable);
        }
        self.loading_chats = true;
        Ok(())
    }

    pub fn load_users(&mut self) -> Result<()> {
        self.require_user()?;
        self.loading_users = self.sink.dispatch(NetworkCommand::LoadUsers);
        if !self.loading_users {
            return Err(Error::WorkerUnavailable);
        }
        Ok(())
    }

    /// Re-fetch one chat from the backend, keeping the selection.
    pub fn refresh_chat(&mut self, chat_id: &str) -> Result<()> {
        self.require_user()?;
        if !self.chats.contains_key(chat_id) {
            return Err(Error::UnknownChat(chat_id.to_string()));
        }
        if !self.sink.dispatch(NetworkCommand::LoadChat {
            chat_id: chat_id.to_string(),
        }) {
            return Err(Error::WorkerUnavailable);
        }
        Ok(())
    }

    /// Make `chat_id` the active chat, join its room and mark it read.
    pub fn select_chat(&mut self, chat_id: &str) -> Result<()> {
        let me = self.require_user()?.id.clone();
        let Some(chat) = self.chats.get_mut(chat_id) else {
            log::debug!("select_chat: unknown chat {chat_id}");
            return Err(Error::UnknownChat(chat_id.to_string()));
        };

        for message in chat.messages.iter_mut() {
            if !message.is_system() && !message.is_from(&me) {
                message.mark_read();
            }
        }

        self.active = Some(chat_id.to_string());
        self.emit(ClientEvent::JoinChat {
            chat_id: chat_id.to_string(),
        });
        self.emit(ClientEvent::MarkRead {
            chat_id: chat_id.to_string(),
        });
        Ok(())
    }

    /// Show `content` in the active chat right away and send it.
    ///
    /// Rejected without side effects when nobody is signed in, no chat is
    /// selected, or the content is blank.
    pub fn send_message(&mut self, content: &str) -> Result<()> {
        let me = self.require_user()?.clone();
        let chat_id = self.active.clone().ok_or(Error::NoActiveChat)?;
        if !self.chats.contains_key(&chat_id) {
            return Err(Error::NoActiveChat);
        }
        if !self.is_chat_ready(&chat_id) {
            return Err(Error::ChatNotReady(chat_id));
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::EmptyMessage);
        }

        let message = ChatMessage {
            id: provisional_id(),
            chat_id: chat_id.clone(),
            user_id: Some(me.id.clone()),
            user: Some(me),
            content: content.to_string(),
            created_at: Utc::now(),
            read: false,
        };
        let provisional = message.id.clone();

        if let Some(chat) = self.chats.get_mut(&chat_id) {
            chat.push_message(message);
        }
        self.sort_chats();

        self.emit(ClientEvent::SendMessage {
            chat_id: chat_id.clone(),
            content: content.to_string(),
        });

        if self.options.persist {
            self.pending_sends.insert(provisional.clone());
            let queued = self.sink.dispatch(NetworkCommand::PersistMessage {
                provisional_id: provisional.clone(),
                chat_id,
                content: content.to_string(),
            });
            if !queued {
                self.pending_sends.remove(&provisional);
                self.notices
                    .error("Error", "No se pudo enviar el mensaje.");
            }
        }
        Ok(())
    }

    /// Create a chat with `participant_ids` plus the current user, select it
    /// and announce it with a system message. Returns the new chat id.
    pub fn create_chat(
        &mut self,
        participant_ids: &[String],
        name: Option<&str>,
        is_group: bool,
    ) -> Result<String> {
        let me = self.require_user()?.clone();

        let mut ids: Vec<String> = Vec::with_capacity(participant_ids.len() + 1);
        for id in participant_ids.iter().chain(std::iter::once(&me.id)) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        let participants: Vec<User> = ids
            .iter()
            .map(|id| {
                if *id == me.id {
                    me.clone()
                } else {
                    self.directory
                        .get(id)
                        .cloned()
                        .unwrap_or_else(|| User::new(id.clone(), "Usuario"))
                }
            })
            .collect();

        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let chat_name = if is_group {
            name.unwrap_or("Nuevo grupo").to_string()
        } else {
            String::new()
        };

        let chat_id = provisional_id();
        let now = Utc::now();
        let announcement = ChatMessage {
            id: provisional_id(),
            chat_id: chat_id.clone(),
            user_id: None,
            user: None,
            content: if is_group {
                format!("{} creó el grupo {}", me.name, chat_name)
            } else {
                format!("{} inició la conversación", me.name)
            },
            created_at: now,
            read: true,
        };

        let chat = Chat {
            id: chat_id.clone(),
            name: chat_name,
            is_group,
            last_message_at: now,
            participants,
            messages: vec![announcement],
        };
        log::info!("Created chat {chat_id} with {} participants", chat.participants.len());

        self.order.insert(0, chat_id.clone());
        self.chats.insert(chat_id.clone(), chat);
        self.sort_chats();
        self.active = Some(chat_id.clone());
        self.emit(ClientEvent::JoinChat {
            chat_id: chat_id.clone(),
        });

        if self.options.persist {
            let queued = self.sink.dispatch(NetworkCommand::CreateChat {
                provisional_id: chat_id.clone(),
                participant_ids: participant_ids.to_vec(),
                name: name.map(str::to_string),
                is_group,
            });
            if !queued {
                self.notices
                    .error("Error", "No se pudo guardar el chat en el servidor.");
            }
        }
        Ok(chat_id)
    }

    /// Tell the other participants we are typing. No local state changes.
    pub fn handle_typing(&mut self, chat_id: &str) {
        if self.current_user.is_none() {
            return;
        }
        self.emit(ClientEvent::Typing {
            chat_id: chat_id.to_string(),
        });
    }

    // ========== Reconciliation ==========

    /// Expire typing indicators. Call once per UI frame.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.typing.expire(now)
    }

    pub fn apply(&mut self, event: NetworkEvent) {
        self.apply_at(event, Instant::now());
    }

    pub fn apply_at(&mut self, event: NetworkEvent, now: Instant) {
        if self.current_user.is_none() && event.needs_session() {
            log::debug!("Dropping network event that arrived after sign-out");
            return;
        }
        match event {
            NetworkEvent::SignedIn { user, .. } => self.on_signed_in(user),
            NetworkEvent::SignedOut { reason } => self.reset(reason),
            NetworkEvent::AuthFailed(error) => {
                self.auth_pending = false;
                self.notices.error("Error de inicio de sesión", error);
            }
            NetworkEvent::ChatsLoaded(chats) => {
                self.loading_chats = false;
                self.replace_chats(chats);
            }
            NetworkEvent::ChatsLoadFailed(error) => {
                self.loading_chats = false;
                self.notices.error(
                    "Error",
                    format!("No se pudieron cargar los chats: {error}"),
                );
                if self.options.fallback_to_mock && self.chats.is_empty() {
                    self.replace_chats(mock::chats());
                    self.notices
                        .info("Modo sin conexión", "Mostrando datos de ejemplo.");
                }
            }
            NetworkEvent::ChatLoaded(chat) => self.upsert_chat(chat),
            NetworkEvent::ChatLoadFailed { chat_id, error } => {
                self.notices.error(
                    "Error",
                    format!("No se pudo cargar la conversación {chat_id}: {error}"),
                );
            }
            NetworkEvent::UsersLoaded(users) => {
                self.loading_users = false;
                for user in users {
                    self.directory.insert(user.id.clone(), user);
                }
            }
            NetworkEvent::UsersLoadFailed(error) => {
                self.loading_users = false;
                self.notices.error("Error cargando usuarios", error);
            }
            NetworkEvent::ChatPersisted {
                provisional_id,
                chat,
            } => self.on_chat_persisted(&provisional_id, chat),
            NetworkEvent::ChatPersistFailed {
                provisional_id,
                error,
            } => {
                log::warn!("Chat {provisional_id} was not saved: {error}");
                self.notices
                    .error("Error", format!("No se pudo crear el chat: {error}"));
            }
            NetworkEvent::MessagePersisted {
                provisional_id,
                message,
            } => {
                self.pending_sends.remove(&provisional_id);
                self.on_message_persisted(&provisional_id, message);
            }
            NetworkEvent::MessagePersistFailed {
                provisional_id,
                error,
            } => {
                self.pending_sends.remove(&provisional_id);
                self.notices
                    .error("Error", format!("No se pudo enviar el mensaje: {error}"));
            }
            NetworkEvent::ConnectionChanged { connected } => {
                log::info!("Realtime connection {}", if connected { "up" } else { "down" });
                self.connected = connected;
            }
            NetworkEvent::Server(event) => self.apply_server_event(event, now),
        }
    }

    fn apply_server_event(&mut self, event: ServerEvent, now: Instant) {
        match event {
            ServerEvent::NewMessage(message) => self.on_new_message(message),
            ServerEvent::UserTyping(notice) => self.on_user_typing(notice, now),
            ServerEvent::MessagesRead(receipt) => self.on_messages_read(receipt),
            ServerEvent::UserStatusChange(change) => self.on_presence(change),
        }
    }

    fn on_signed_in(&mut self, user: User) {
        self.reset(None);
        self.notices
            .info("Inicio de sesión exitoso", format!("Bienvenido, {}", user.name));
        self.directory.insert(user.id.clone(), user.clone());
        self.current_user = Some(user);
        // Failures here are already reported as notices.
        let _ = self.load_chats();
        let _ = self.load_users();
    }

    fn on_new_message(&mut self, mut message: ChatMessage) {
        let me = self.current_user.as_ref().map(|u| u.id.clone());
        let is_active = self.active.as_deref() == Some(message.chat_id.as_str());
        let from_me = me.as_deref().is_some_and(|me| message.is_from(me));

        if !from_me && !is_active && !message.is_system() {
            let sender = message
                .user
                .as_ref()
                .map(|u| u.name.clone())
                .or_else(|| {
                    message
                        .user_id
                        .as_ref()
                        .and_then(|id| self.directory.get(id))
                        .map(|u| u.name.clone())
                })
                .unwrap_or_else(|| "Alguien".to_string());
            if self.chats.contains_key(&message.chat_id) {
                self.notices.info(
                    format!("Mensaje nuevo de {sender}"),
                    notices::preview(&message.content),
                );
            }
        }

        let chat_id = message.chat_id.clone();
        let Some(chat) = self.chats.get_mut(&chat_id) else {
            log::debug!("Message {} for unknown chat {chat_id}", message.id);
            return;
        };
        if is_active && !from_me {
            message.mark_read();
        }
        chat.push_message(message);
        self.sort_chats();

        if is_active {
            self.emit(ClientEvent::MarkRead { chat_id });
        }
    }

    fn on_user_typing(&mut self, notice: TypingNotice, now: Instant) {
        if self.current_user.as_ref().is_some_and(|u| u.id == notice.user_id) {
            return;
        }
        if !self.chats.contains_key(&notice.chat_id) {
            return;
        }
        self.typing
            .start(&notice.chat_id, &notice.user_id, &notice.user_name, now);
    }

    fn on_messages_read(&mut self, receipt: ReadReceipt) {
        let Some(me) = self.current_user.as_ref().map(|u| u.id.clone()) else {
            return;
        };
        let Some(chat) = self.chats.get_mut(&receipt.chat_id) else {
            return;
        };
        let flipped = chat
            .messages
            .iter_mut()
            .filter(|m| m.is_from(&me))
            .map(ChatMessage::mark_read)
            .filter(|changed| *changed)
            .count();
        log::debug!(
            "{} read chat {}: {flipped} messages marked read",
            receipt.user_id,
            receipt.chat_id
        );
    }

    fn on_presence(&mut self, change: PresenceChange) {
        for chat in self.chats.values_mut() {
            for participant in chat.participants.iter_mut().filter(|p| p.id == change.user_id) {
                participant.is_online = change.is_online;
                participant.last_seen = Some(change.last_seen);
            }
        }
        if let Some(user) = self.directory.get_mut(&change.user_id) {
            user.is_online = change.is_online;
            user.last_seen = Some(change.last_seen);
        }
    }

    fn on_chat_persisted(&mut self, provisional_id: &str, mut chat: Chat) {
        let Some(local) = self.chats.remove(provisional_id) else {
            // Never shown locally; just add the server's copy.
            self.upsert_chat(chat);
            return;
        };
        self.order.retain(|id| id != provisional_id);

        if chat.messages.is_empty() {
            chat.messages = local
                .messages
                .into_iter()
                .map(|mut m| {
                    m.chat_id = chat.id.clone();
                    m
                })
                .collect();
        }
        let was_active = self.active.as_deref() == Some(provisional_id);
        let chat_id = chat.id.clone();
        self.upsert_chat(chat);
        if was_active {
            self.active = Some(chat_id.clone());
        }
        self.emit(ClientEvent::JoinChat { chat_id });
    }

    fn on_message_persisted(&mut self, provisional_id: &str, message: ChatMessage) {
        let Some(chat) = self.chats.get_mut(&message.chat_id) else {
            return;
        };
        match chat.messages.iter().position(|m| m.id == provisional_id) {
            Some(index) => {
                // Keep the local read flag; it only ever moves forward.
                let slot = &mut chat.messages[index];
                let read = slot.read || message.read;
                *slot = message;
                slot.read = read;
            }
            None => chat.push_message(message),
        }
        chat.normalize();
        self.sort_chats();
    }

    // ========== Internals ==========

    fn require_user(&self) -> Result<&User> {
        self.current_user.as_ref().ok_or(Error::NotAuthenticated)
    }

    fn emit(&self, event: ClientEvent) {
        self.sink.dispatch(NetworkCommand::emit(event));
    }

    /// Clear everything tied to the session.
    fn reset(&mut self, reason: Option<String>) {
        self.current_user = None;
        self.chats.clear();
        self.order.clear();
        self.active = None;
        self.directory.clear();
        self.typing.clear();
        self.pending_sends.clear();
        self.loading_chats = false;
        self.loading_users = false;
        self.auth_pending = false;
        if let Some(reason) = reason {
            self.notices.error("Sesión finalizada", reason);
        }
    }

    fn replace_chats(&mut self, chats: Vec<Chat>) {
        self.chats.clear();
        self.order.clear();
        for chat in chats {
            self.insert_normalized(chat);
        }
        self.sort_chats();

        if let Some(active) = &self.active {
            if !self.chats.contains_key(active) {
                self.active = None;
            }
        }
        let chats = &self.chats;
        self.typing.retain_chats(|id| chats.contains_key(id));
    }

    fn upsert_chat(&mut self, chat: Chat) {
        self.insert_normalized(chat);
        self.sort_chats();
    }

    fn insert_normalized(&mut self, mut chat: Chat) {
        let before = chat.messages.len();
        chat.messages.retain(|m| m.chat_id == chat.id);
        if chat.messages.len() != before {
            log::warn!(
                "Dropped {} messages that do not belong to chat {}",
                before - chat.messages.len(),
                chat.id
            );
        }
        chat.normalize();

        for participant in &chat.participants {
            self.directory
                .entry(participant.id.clone())
                .or_insert_with(|| participant.clone());
        }
        if !self.chats.contains_key(&chat.id) {
            self.order.push(chat.id.clone());
        }
        self.chats.insert(chat.id.clone(), chat);
    }

    /// Most recent activity first; ties keep their previous order.
    fn sort_chats(&mut self) {
        let chats = &self.chats;
        self.order.retain(|id| chats.contains_key(id));
        self.order.sort_by(|a, b| {
            let a = chats[a].last_message_at;
            let b = chats[b].last_message_at;
            b.cmp(&a)
        });
    }
}

fn provisional_id() -> String {
    format!("{PROVISIONAL_PREFIX}{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests;
