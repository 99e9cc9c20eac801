use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::{Error, Result};

pub type SocketStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Handshake request carrying the bearer token in both the header and the
/// percent-encoded `token` query parameter.
pub fn handshake_request(socket_url: &str, token: &str) -> Result<Request> {
    let mut url = Url::parse(socket_url).map_err(|err| Error::InvalidUrl {
        url: socket_url.to_string(),
        reason: err.to_string(),
    })?;
    url.query_pairs_mut().append_pair("token", token);

    let mut request = url.as_str().into_client_request()?;
    let header = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|err| {
        tokio_tungstenite::tungstenite::Error::HttpFormat(err.into())
    })?;
    request.headers_mut().insert(AUTHORIZATION, header);
    Ok(request)
}

pub async fn open_socket(socket_url: &str, token: &str) -> Result<SocketStream> {
    let request = handshake_request(socket_url, token)?;
    let (stream, response) = connect_async(request).await?;
    log::debug!("Socket handshake completed with status {}", response.status());
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_travels_in_header_and_query() {
        let request = handshake_request("ws://localhost:5000/socket", "t0k3n").unwrap();
        assert_eq!(request.uri().query(), Some("token=t0k3n"));
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer t0k3n"
        );
    }

    #[test]
    fn existing_query_is_preserved() {
        let request = handshake_request("ws://localhost:5000/socket?v=2", "abc").unwrap();
        assert_eq!(request.uri().query(), Some("v=2&token=abc"));
    }

    #[test]
    fn opaque_token_is_percent_encoded() {
        let request = handshake_request("ws://localhost:5000/socket", "a&b+c#d=").unwrap();
        assert_eq!(request.uri().query(), Some("token=a%26b%2Bc%23d%3D"));
        assert_eq!(request.uri().path(), "/socket");
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer a&b+c#d="
        );
    }

    #[test]
    fn malformed_socket_url_is_rejected() {
        let err = handshake_request("not a url", "abc").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }
}
