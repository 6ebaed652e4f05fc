//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the bind address and upstream origin actually parse
//! - Validate value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ProxyConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The listener bind address is not a valid socket address.
    InvalidBindAddress(String),
    /// The upstream origin is not an absolute http URI with a host.
    InvalidUpstreamOrigin(String),
    /// The upstream origin uses a scheme the fixture cannot speak.
    UnsupportedScheme(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "invalid bind address '{}'", addr)
            }
            ValidationError::InvalidUpstreamOrigin(origin) => {
                write!(f, "invalid upstream origin '{}'", origin)
            }
            ValidationError::UnsupportedScheme(scheme) => {
                write!(f, "unsupported upstream scheme '{}'", scheme)
            }
        }
    }
}

/// Validate a configuration, collecting every semantic error.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    match config.upstream.parse_origin() {
        Ok((scheme, _)) => {
            // Plain-HTTP fixture; TLS termination is out of scope.
            if scheme.as_str() != "http" {
                errors.push(ValidationError::UnsupportedScheme(scheme.to_string()));
            }
        }
        Err(_) => {
            errors.push(ValidationError::InvalidUpstreamOrigin(
                config.upstream.origin.clone(),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
