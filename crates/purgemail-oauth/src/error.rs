//! Error types for `OAuth2` operations.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

/// Result type alias for `OAuth2` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `OAuth2` error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `OAuth2` error from server.
    #[error("OAuth2 error: {error} - {description}")]
    OAuth {
        /// Error code (e.g., `invalid_grant`).
        error: String,
        /// Human-readable description.
        description: String,
    },

    /// No refresh token available.
    #[error("No refresh token available")]
    NoRefreshToken,

    /// No redirect arrived within the configured wait.
    #[error("Authorization timed out after {0:?}")]
    Timeout(Duration),

    /// User denied authorization.
    #[error("User denied authorization")]
    AccessDenied,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    /// The loopback listener could not bind its address.
    #[error("Failed to start redirect listener on {addr}: {source}")]
    ListenerBind {
        /// Address the listener tried to bind.
        addr: SocketAddr,
        /// Underlying bind error.
        #[source]
        source: io::Error,
    },

    /// The loopback listener stopped before delivering a code.
    #[error("Redirect listener closed before an authorization code arrived")]
    ListenerClosed,

    /// The system browser could not be opened.
    #[error("Failed to open browser: {0}")]
    Browser(String),
}

impl Error {
    /// Creates an OAuth error from error code and description.
    #[must_use]
    pub fn oauth_error(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self::OAuth {
            error: error.into(),
            description: description.into(),
        }
    }
}
