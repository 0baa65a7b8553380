//! Transport error taxonomy.

use thiserror::Error;

/// Errors produced by the HTTP transport.
///
/// Callers can distinguish "the server said no" ([`ApiError::Status`]) from
/// "the request never reached the server" ([`ApiError::Network`]).
#[derive(Debug, Error)]
pub enum ApiError {
  /// The server responded with a non-success status.
  #[error("server returned {status}: {message}")]
  Status {
    status: u16,
    message: String,
    /// Decoded JSON error body, when the server sent one.
    payload: Option<serde_json::Value>,
  },

  /// The request never reached the server (DNS, connect, TLS, timeout).
  #[error("network request failed: {0}")]
  Network(#[source] reqwest::Error),

  /// A success response could not be decoded into the expected shape.
  #[error("failed to decode response: {0}")]
  Decode(#[from] serde_json::Error),

  /// Endpoint path could not be joined onto the configured base URL.
  #[error("invalid request URL: {0}")]
  Url(#[from] url::ParseError),
}

impl ApiError {
  /// HTTP status code for server-reported failures.
  pub fn status(&self) -> Option<u16> {
    match self {
      ApiError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// True when the session is gone and the caller should route to login.
  pub fn is_auth_failure(&self) -> bool {
    matches!(self.status(), Some(401) | Some(403))
  }
}
