//! Error types for the talking client.

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Speech engine acquisition or synthesis error.
    #[error("speech error: {0}")]
    Speech(String),

    /// Chat session error (connection, registration, protocol).
    #[error("chat error: {0}")]
    Chat(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ClientError>;
