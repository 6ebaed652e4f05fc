//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so the fixture runs with no config file at all.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use axum::http::uri::{Authority, Scheme, Uri};

use crate::http::error::ProxyError;

/// Root configuration for the delay proxy.
///
/// An explicit struct handed to [`crate::http::HttpServer::new`] rather than
/// process-wide state, so tests can start several instances with different
/// ports, targets, and delays.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single fixed upstream origin all requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Artificial delay applied before every forward.
    pub delay: DelayConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Target origin (scheme + host + port), e.g. "http://127.0.0.1:3000".
    pub origin: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:3000".to_string(),
        }
    }
}

impl UpstreamConfig {
    /// Parse the origin into the scheme and authority used to rewrite
    /// request URIs. The path component of the origin is ignored; the
    /// incoming request's path and query are always preserved.
    pub fn parse_origin(&self) -> Result<(Scheme, Authority), ProxyError> {
        let uri: Uri = self
            .origin
            .parse()
            .map_err(|_| ProxyError::InvalidOrigin(self.origin.clone()))?;

        let scheme = uri
            .scheme()
            .cloned()
            .ok_or_else(|| ProxyError::InvalidOrigin(self.origin.clone()))?;
        let authority = uri
            .authority()
            .cloned()
            .ok_or_else(|| ProxyError::InvalidOrigin(self.origin.clone()))?;

        Ok((scheme, authority))
    }
}

/// Delay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Time each request is suspended before forwarding, in milliseconds.
    pub duration_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self { duration_ms: 6000 }
    }
}

impl DelayConfig {
    /// The configured delay as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter directive, used when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "delay_proxy=info,tower_http=info".to_string(),
        }
    }
}
