use thiserror::Error;

/// Errors surfaced by [`crate::ServerApi`] implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential was supplied; no request was sent.
    #[error("missing access token")]
    MissingCredential,
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

