//! Error types for provider requests.

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Provider request error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither an API key nor a username/password pair is configured.
    #[error(
        "Either a SendGrid API key (--key or SENDGRID_API_KEY) or a username \
         and password (--user and --password) is required"
    )]
    MissingCredentials,

    /// Network or HTTP transport failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("SendGrid error {status}: {body}")]
    Provider {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Message could not be encoded.
    #[error(transparent)]
    Message(#[from] sendgrid_message::Error),
}

impl Error {
    /// Creates a provider error from a status code and body.
    #[must_use]
    pub fn provider(status: u16, body: impl Into<String>) -> Self {
        Self::Provider {
            status,
            body: body.into(),
        }
    }

    /// Returns true for errors detected before anything is sent.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        match self {
            Self::MissingCredentials => true,
            Self::Message(e) => e.is_validation(),
            _ => false,
        }
    }
}
