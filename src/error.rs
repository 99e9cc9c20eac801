use thiserror::Error;

/// Errors surfaced by the chat client.
#[derive(Debug, Error)]
pub enum Error {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("session expired or invalid token")]
    Unauthorized,

    #[error("resource not found")]
    NotFound,

    #[error("socket error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("timed out connecting to {0}")]
    ConnectTimeout(String),

    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("not signed in")]
    NotAuthenticated,

    #[error("no chat selected")]
    NoActiveChat,

    #[error("message is empty")]
    EmptyMessage,

    #[error("unknown chat `{0}`")]
    UnknownChat(String),

    #[error("chat `{0}` is still being created")]
    ChatNotReady(String),

    #[error("network worker is not running")]
    WorkerUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Authentication failures sign the user out locally.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }
}
