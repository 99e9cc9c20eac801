//! REST accessors for the WorkFlowConnect backend.
//!
//! Every response is a `{ success, message?, ... }` envelope. A non-success
//! envelope or a non-2xx status becomes an [`Error`]; 401 maps to
//! [`Error::Unauthorized`] and 404 to [`Error::NotFound`].

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::common::{Chat, ChatMessage, User};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    body: Map<String, Value>,
}

impl Envelope {
    fn take<T: DeserializeOwned>(&mut self, field: &str) -> Result<T> {
        let value = self.body.remove(field).ok_or_else(|| Error::Api {
            status: 200,
            message: format!("response is missing `{field}`"),
        })?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Signed-in user plus the bearer token issued for them.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct ChatApi {
    http: Client,
    base_url: String,
}

impl ChatApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Envelope> {
        let response = builder.send().await?;
        read_envelope(response).await
    }

    // ========== Chats ==========

    /// `GET /chats`. A 404 means the user has no chats yet.
    pub async fn fetch_chats(&self, token: &str) -> Result<Vec<Chat>> {
        match self.send(self.request(Method::GET, "/chats", Some(token))).await {
            Ok(mut envelope) => envelope.take("chats"),
            Err(Error::NotFound) => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    /// `GET /chats/:id`
    pub async fn fetch_chat(&self, chat_id: &str, token: &str) -> Result<Chat> {
        let path = format!("/chats/{chat_id}");
        let mut envelope = self.send(self.request(Method::GET, &path, Some(token))).await?;
        envelope.take("chat")
    }

    /// `POST /chats`
    pub async fn create_chat(
        &self,
        participant_ids: &[String],
        name: Option<&str>,
        is_group: bool,
        token: &str,
    ) -> Result<Chat> {
        let body = json!({
            "participantIds": participant_ids,
            "name": name,
            "isGroup": is_group,
        });
        let builder = self.request(Method::POST, "/chats", Some(token)).json(&body);
        let mut envelope = self.send(builder).await?;
        envelope.take("chat")
    }

    /// `POST /chats/:id/messages`
    pub async fn post_message(
        &self,
        chat_id: &str,
        content: &str,
        token: &str,
    ) -> Result<ChatMessage> {
        let path = format!("/chats/{chat_id}/messages");
        let builder = self
            .request(Method::POST, &path, Some(token))
            .json(&json!({ "content": content }));
        let mut envelope = self.send(builder).await?;
        envelope.take("chatMessage")
    }

    // ========== Users ==========

    /// `GET /users/all`: everyone except the caller.
    pub async fn fetch_users(&self, token: &str) -> Result<Vec<User>> {
        let mut envelope = self
            .send(self.request(Method::GET, "/users/all", Some(token)))
            .await?;
        envelope.take("users")
    }

    // ========== Auth ==========

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let builder = self
            .request(Method::POST, "/auth/login", None)
            .json(&json!({ "email": email, "password": password }));
        let mut envelope = self.send(builder).await?;
        Ok(AuthSession {
            user: envelope.take("user")?,
            token: envelope.take("token")?,
        })
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthSession> {
        let builder = self
            .request(Method::POST, "/auth/register", None)
            .json(&json!({ "name": name, "email": email, "password": password }));
        let mut envelope = self.send(builder).await?;
        Ok(AuthSession {
            user: envelope.take("user")?,
            token: envelope.take("token")?,
        })
    }

    /// `GET /auth/verify`: resolves the user a stored token belongs to.
    pub async fn verify(&self, token: &str) -> Result<User> {
        let mut envelope = self
            .send(self.request(Method::GET, "/auth/verify", Some(token)))
            .await?;
        envelope.take("user")
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        let builder = self
            .request(Method::POST, "/auth/logout", Some(token))
            .json(&json!({}));
        self.send(builder).await.map(|_| ())
    }
}

async fn read_envelope(response: Response) -> Result<Envelope> {
    let status = response.status();
    match status {
        StatusCode::UNAUTHORIZED => return Err(Error::Unauthorized),
        StatusCode::NOT_FOUND => return Err(Error::NotFound),
        _ => {}
    }

    let text = response.text().await?;
    let envelope = match serde_json::from_str::<Envelope>(&text) {
        Ok(envelope) => envelope,
        Err(err) if status.is_success() => return Err(err.into()),
        Err(_) => {
            return Err(Error::Api {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }
    };

    if !status.is_success() || !envelope.success {
        return Err(Error::Api {
            status: status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string()),
        });
    }

    Ok(envelope)
}
