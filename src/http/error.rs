//! Per-request error taxonomy.
//!
//! # Design Decisions
//! - Every failure is local to one request; nothing here aborts the server
//! - A client that disconnects is not an error: its handler future is simply
//!   dropped, so no variant exists for it
//! - No retries; one forwarding attempt per request

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can occur while proxying a single request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The fixed upstream origin could not be connected to.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[source] hyper_util::client::legacy::Error),

    /// The upstream connection failed after it was established.
    #[error("upstream exchange failed: {0}")]
    UpstreamExchange(#[source] hyper_util::client::legacy::Error),

    /// The upstream origin could not be assembled into a request URI.
    /// Normally caught at construction time; the per-request rewrite
    /// returns it too if the combined parts fail to form a valid URI.
    #[error("invalid upstream origin '{0}'")]
    InvalidOrigin(String),
}

impl ProxyError {
    /// Classify a client error from the forwarding attempt.
    pub fn from_client_error(err: hyper_util::client::legacy::Error) -> Self {
        if err.is_connect() {
            ProxyError::UpstreamUnavailable(err)
        } else {
            ProxyError::UpstreamExchange(err)
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ProxyError::UpstreamUnavailable(_) | ProxyError::UpstreamExchange(_) => {
                StatusCode::BAD_GATEWAY
            }
            ProxyError::InvalidOrigin(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (self.status(), self.to_string()).into_response()
    }
}
