use tokio::sync::mpsc;

use crate::common::{Chat, NetworkCommand, NetworkEvent, User};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::mock;
use crate::storage::SessionDatabase;

use super::api::{AuthSession, ChatApi};
use super::socket::SocketClient;

/// Background task that owns every piece of I/O: REST accessors, the realtime
/// socket and the session database. It executes [`NetworkCommand`]s from the
/// UI thread and answers with [`NetworkEvent`]s.
pub struct NetworkWorker {
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
    api: ChatApi,
    socket: SocketClient,
    sessions: Option<SessionDatabase>,
    use_mock_data: bool,
    token: Option<String>,
}

impl NetworkWorker {
    pub fn new(
        config: &AppConfig,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
        sessions: Option<SessionDatabase>,
    ) -> Result<Self> {
        let api = ChatApi::new(&config.api_url, config.request_timeout())?;
        let socket = SocketClient::new(config.socket_url.clone(), event_sender.clone())
            .with_connect_timeout(config.request_timeout());
        Ok(Self {
            event_sender,
            command_receiver,
            api,
            socket,
            sessions,
            use_mock_data: config.use_mock_data,
            token: None,
        })
    }

    pub async fn run(mut self) {
        log::info!(
            "Network worker started ({} mode)",
            if self.use_mock_data { "mock" } else { "live" }
        );

        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command).await;
        }

        self.socket.disconnect().await;
        log::info!("Network worker stopped");
    }

    async fn notify(&mut self, event: NetworkEvent) {
        if let Err(err) = self.event_sender.send(event).await {
            log::warn!("Failed to notify UI: {err}");
        }
    }

    async fn handle_command(&mut self, command: NetworkCommand) {
        match command {
            NetworkCommand::RestoreSession => self.restore_session().await,
            NetworkCommand::Login { email, password } => {
                let result = if self.use_mock_data {
                    Ok(mock_session(Some(&email)))
                } else {
                    self.api.login(&email, &password).await
                };
                self.finish_auth(result).await;
            }
            NetworkCommand::Register {
                name,
                email,
                password,
            } => {
                let result = if self.use_mock_data {
                    Ok(mock_session(Some(&email)))
                } else {
                    self.api.register(&name, &email, &password).await
                };
                self.finish_auth(result).await;
            }
            NetworkCommand::Logout => self.logout().await,
            NetworkCommand::LoadChats => {
                let result = self.fetch_chats().await.map(|chats| {
                    log::info!("Loaded {} chats", chats.len());
                    NetworkEvent::ChatsLoaded(chats)
                });
                self.answer(result, NetworkEvent::ChatsLoadFailed).await;
            }
            NetworkCommand::LoadChat { chat_id } => {
                let result = self.fetch_chat(&chat_id).await.map(NetworkEvent::ChatLoaded);
                self.answer(result, |error| NetworkEvent::ChatLoadFailed { chat_id, error })
                    .await;
            }
            NetworkCommand::LoadUsers => {
                let result = self.fetch_users().await.map(NetworkEvent::UsersLoaded);
                self.answer(result, NetworkEvent::UsersLoadFailed).await;
            }
            // The store keeps chats and messages local in mock mode and never
            // asks for persistence there.
            NetworkCommand::CreateChat { provisional_id, .. } if self.use_mock_data => {
                log::debug!("Mock mode: chat {provisional_id} stays local");
            }
            NetworkCommand::PersistMessage { provisional_id, .. } if self.use_mock_data => {
                log::debug!("Mock mode: message {provisional_id} stays local");
            }
            NetworkCommand::CreateChat {
                provisional_id,
                participant_ids,
                name,
                is_group,
            } => {
                let result = match self.require_token() {
                    Ok(token) => {
                        self.api
                            .create_chat(&participant_ids, name.as_deref(), is_group, &token)
                            .await
                    }
                    Err(err) => Err(err),
                };
                let persisted_id = provisional_id.clone();
                let result = result.map(|chat| NetworkEvent::ChatPersisted {
                    provisional_id: persisted_id,
                    chat,
                });
                self.answer(result, |error| NetworkEvent::ChatPersistFailed {
                    provisional_id,
                    error,
                })
                .await;
            }
            NetworkCommand::PersistMessage {
                provisional_id,
                chat_id,
                content,
            } => {
                // Answered exactly once (or by SignedOut) so the store can
                // clear its sending flag.
                let result = match self.require_token() {
                    Ok(token) => self.api.post_message(&chat_id, &content, &token).await,
                    Err(err) => Err(err),
                };
                let persisted_id = provisional_id.clone();
                let result = result.map(|message| NetworkEvent::MessagePersisted {
                    provisional_id: persisted_id,
                    message,
                });
                self.answer(result, |error| NetworkEvent::MessagePersistFailed {
                    provisional_id,
                    error,
                })
                .await;
            }
            NetworkCommand::Emit(event) => self.socket.emit(event),
        }
    }

    fn require_token(&self) -> Result<String> {
        self.token.clone().ok_or(Error::NotAuthenticated)
    }

    async fn fetch_chats(&mut self) -> Result<Vec<Chat>> {
        if self.use_mock_data {
            return Ok(mock::chats());
        }
        let token = self.require_token()?;
        self.api.fetch_chats(&token).await
    }

    async fn fetch_chat(&mut self, chat_id: &str) -> Result<Chat> {
        if self.use_mock_data {
            return mock::chats()
                .into_iter()
                .find(|chat| chat.id == chat_id)
                .ok_or(Error::NotFound);
        }
        let token = self.require_token()?;
        self.api.fetch_chat(chat_id, &token).await
    }

    async fn fetch_users(&mut self) -> Result<Vec<User>> {
        if self.use_mock_data {
            let me = mock::current_user();
            return Ok(mock::users().into_iter().filter(|u| u.id != me.id).collect());
        }
        let token = self.require_token()?;
        self.api.fetch_users(&token).await
    }

    /// Report the outcome of a request. An auth failure ends the session
    /// instead; the store drops everything tied to it on `SignedOut`.
    async fn answer<F>(&mut self, result: Result<NetworkEvent>, on_error: F)
    where
        F: FnOnce(String) -> NetworkEvent,
    {
        let event = match result {
            Ok(event) => event,
            Err(err) if err.is_auth_failure() => {
                log::warn!("Request rejected, ending session: {err}");
                self.end_session(Some(err.to_string())).await;
                return;
            }
            Err(err) => {
                log::warn!("Request failed: {err}");
                on_error(err.to_string())
            }
        };
        self.notify(event).await;
    }

    async fn restore_session(&mut self) {
        if self.use_mock_data {
            self.sign_in(mock_session(None)).await;
            return;
        }

        let stored = match &self.sessions {
            Some(sessions) => sessions.load_token().unwrap_or_else(|err| {
                log::warn!("Failed to read stored session: {err}");
                None
            }),
            None => None,
        };
        let Some(token) = stored else {
            log::info!("No stored session");
            self.notify(NetworkEvent::SignedOut { reason: None }).await;
            return;
        };

        match self.api.verify(&token).await {
            Ok(user) => self.sign_in(AuthSession { user, token }).await,
            Err(err) => {
                log::info!("Stored session rejected: {err}");
                self.end_session(Some(err.to_string())).await;
            }
        }
    }

    async fn finish_auth(&mut self, result: Result<AuthSession>) {
        match result {
            Ok(session) => self.sign_in(session).await,
            Err(err) => {
                log::warn!("Authentication failed: {err}");
                self.notify(NetworkEvent::AuthFailed(err.to_string())).await;
            }
        }
    }

    async fn sign_in(&mut self, session: AuthSession) {
        let AuthSession { user, token } = session;
        log::info!("Signed in as {} ({})", user.name, user.id);

        if !self.use_mock_data {
            if let Some(sessions) = &self.sessions {
                if let Err(err) = sessions.save_token(&token) {
                    log::warn!("Failed to persist session token: {err}");
                }
            }
            // Transport failures are not fatal: chat stays on REST state.
            if let Err(err) = self.socket.connect(&token).await {
                log::warn!("Realtime socket unavailable: {err}");
            }
        }

        self.token = Some(token.clone());
        self.notify(NetworkEvent::SignedIn { user, token }).await;
    }

    async fn logout(&mut self) {
        if let (false, Some(token)) = (self.use_mock_data, self.token.clone()) {
            if let Err(err) = self.api.logout(&token).await {
                log::warn!("Server-side logout failed: {err}");
            }
        }
        self.end_session(None).await;
    }

    /// Drop every trace of the session and tell the UI.
    async fn end_session(&mut self, reason: Option<String>) {
        self.socket.disconnect().await;
        self.token = None;
        if let Some(sessions) = &self.sessions {
            if let Err(err) = sessions.clear_token() {
                log::warn!("Failed to clear stored session: {err}");
            }
        }
        self.notify(NetworkEvent::SignedOut { reason }).await;
    }
}

fn mock_session(email: Option<&str>) -> AuthSession {
    let user = email
        .and_then(|email| {
            mock::users()
                .into_iter()
                .find(|u| u.email.as_deref() == Some(email))
        })
        .unwrap_or_else(mock::current_user);
    AuthSession {
        user,
        token: mock::MOCK_TOKEN.to_string(),
    }
}
