//! Unified error handling for onapp-core
//!
//! Every operation returns [`OnAppError`]. Local validation problems, transport
//! problems and absent transactions are kept apart so callers can decide what
//! is fatal.
//!
//! # Example
//!
//! ```rust
//! use onapp_core::{OnAppError, TransportError};
//!
//! fn describe(err: &OnAppError) -> &'static str {
//!     if err.is_invalid_argument() {
//!         "fix the input"
//!     } else if err.is_not_found() {
//!         "nothing there"
//!     } else {
//!         "remote problem"
//!     }
//! }
//!
//! let err = OnAppError::invalid_argument("id", "cannot be less than 1");
//! assert_eq!(describe(&err), "fix the input");
//!
//! let err: OnAppError = TransportError::Status { status: 404, body: String::new() }.into();
//! assert_eq!(describe(&err), "nothing there");
//! ```

use std::time::Duration;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while talking to the remote API
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be built or sent (connection refused, TLS, timeout)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body or query could not be encoded
    #[error("failed to encode request: {0}")]
    Encode(String),

    /// Base URL and path did not form a valid URL
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl TransportError {
    /// HTTP status carried by this error, if the server answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum OnAppError {
    /// Bad local input; nothing was sent over the wire
    #[error("invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// Network, status or decoding failure, surfaced as-is
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No transaction is recorded for the given parent
    #[error("no transaction found for {parent_type} {parent_id}")]
    NotFound { parent_id: i64, parent_type: String },

    /// Transaction reached a failed or cancelled status while waiting
    #[error("transaction failed: {0}")]
    TransactionFailed(String),

    /// Transaction did not finish in time while waiting
    #[error("transaction timed out after {0:?}")]
    TransactionTimeout(Duration),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, OnAppError>;

impl OnAppError {
    /// Build an [`OnAppError::InvalidArgument`]
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        OnAppError::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            OnAppError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns true for local validation failures
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, OnAppError::InvalidArgument { .. })
    }

    /// Returns true if no transaction was found or the server answered 404
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, OnAppError::NotFound { .. }) || self.status() == Some(404)
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// Returns true if the transport or a transaction wait timed out
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            OnAppError::TransactionTimeout(_) => true,
            OnAppError::Transport(TransportError::Request(e)) => e.is_timeout(),
            _ => false,
        }
    }
}
