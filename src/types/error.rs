use thiserror::Error;

/// Errors raised while configuring the notification client or opening its transport.
///
/// None of these cross the `connect`/`disconnect` surface: runtime failures are
/// logged and handled by the reconnect policy instead.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// WebSocket protocol error (handshake failed, connection refused, invalid frame, etc.)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// URL parsing error (malformed endpoint URL)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Empty or otherwise unusable channel identity
    #[error("Invalid channel identity")]
    InvalidIdentity,
}

/// Convenience type alias for `Result<T, NotifyError>`.
pub type Result<T> = std::result::Result<T, NotifyError>;
