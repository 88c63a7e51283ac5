//! Gateway error taxonomy.
//!
//! # Propagation
//! - `ConfigurationError` aborts startup; no listener is served.
//! - `NotFoundError` is contained to one request and answered with 404.
//! - `WriteAfterCloseError` is reported to the caller and never retried.
//!
//! A forbidden outcome from scheme enforcement is a policy decision, not an
//! error, and lives in [`crate::handlers::scheme::RedirectDecision`].

use thiserror::Error;

use crate::config::validation::ValidationError;

/// Fatal problems detected while assembling the gateway.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Another connector already listens on this port.
    #[error("port {port} is already owned by connector `{existing}` (while registering `{name}`)")]
    DuplicatePort {
        port: u16,
        existing: String,
        name: String,
    },

    /// A connector with this name is already registered.
    #[error("connector name `{0}` is already registered")]
    DuplicateName(String),

    /// Semantic validation of the configuration failed.
    #[error("invalid configuration: {}", join(.0))]
    Invalid(Vec<ValidationError>),

    /// A secure connector was configured without TLS material.
    #[error("secure connector `{0}` requires a [tls] section")]
    MissingTls(String),

    /// TLS certificate or key could not be loaded.
    #[error("failed to load TLS material: {0}")]
    Tls(#[source] std::io::Error),
}

/// Lookup of a connector that was never registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("connector `{0}` is not registered")]
pub struct NotFoundError(pub String);

/// The client connection closed before the response was complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("write attempted after the connection was closed")]
pub struct WriteAfterCloseError;

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
