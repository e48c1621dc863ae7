//! Error types for the transport and login layers.
//!
//! Neither type escapes a scenario: the orchestrator folds a
//! [`TransportError`] into an ERROR outcome and an [`AuthError`] into a
//! logged warning with the credential left absent.

use thiserror::Error;

/// The HTTP call could not be completed, so no status code was observed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build http client: {0}")]
    Client(String),

    #[error("invalid request url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Body(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Login at startup did not yield a credential.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("auth rejected with status {0}")]
    Rejected(u16),

    #[error("auth response carried no token: {0}")]
    MissingToken(String),
}
