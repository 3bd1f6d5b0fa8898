use crate::types::{MAIL_WS_PATH, NotifyError, Result, TOKEN_QUERY_PARAM};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

pub type MailSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket factory for creating WebSocket connections
pub struct WebSocketFactory;

impl WebSocketFactory {
    /// Open a WebSocket connection to `url`
    pub async fn create(url: &Url) -> Result<MailSocket> {
        tracing::debug!("Creating WebSocket connection to: {}", url.path());
        let (stream, response) = connect_async(url.as_str()).await?;
        tracing::debug!("WebSocket handshake completed with status {}", response.status());
        Ok(stream)
    }
}

/// Check that `endpoint` can serve as the base of the mail channel URL
pub fn validate_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint)?;
    match url.scheme() {
        "ws" | "wss" => {}
        other => {
            return Err(NotifyError::Config(format!(
                "endpoint scheme must be ws or wss, got '{}'",
                other
            )));
        }
    }
    if url.cannot_be_a_base() {
        return Err(NotifyError::Config(format!(
            "endpoint '{}' cannot be used as a base URL",
            endpoint
        )));
    }
    Ok(url)
}

/// Build `<endpoint>/ws/mail/{identity}?token={token}`
pub fn build_endpoint_url(endpoint: &str, identity: &str, token: Option<&str>) -> Result<Url> {
    if identity.trim().is_empty() {
        return Err(NotifyError::InvalidIdentity);
    }

    let mut url = validate_endpoint(endpoint)?;
    url.set_query(None);
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| NotifyError::Config(format!("endpoint '{}' has no path", endpoint)))?;
        segments.pop_if_empty();
        segments.extend(MAIL_WS_PATH);
        segments.push(identity);
    }
    url.query_pairs_mut()
        .append_pair(TOKEN_QUERY_PARAM, token.unwrap_or_default());

    Ok(url)
}
