//! Named connector registry.
//!
//! # Responsibilities
//! - Hold every listening endpoint by name, port and transport kind
//! - Reject duplicate names and ports at registration time
//! - Resolve connectors by name during request serving
//!
//! # Design Decisions
//! - Populated once during startup, then frozen behind an `Arc`
//! - Lookups are read-only, so no locking on the request path
//! - Registration order is preserved for deterministic iteration

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, NotFoundError};

/// Transport kind of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// Plain HTTP.
    Plaintext,
    /// HTTP over TLS.
    Secure,
}

impl ConnectorKind {
    /// Whether connections accepted on this kind of connector are secure.
    pub fn is_secure(self) -> bool {
        matches!(self, ConnectorKind::Secure)
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorKind::Plaintext => write!(f, "plaintext"),
            ConnectorKind::Secure => write!(f, "secure"),
        }
    }
}

/// A named listening endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    name: String,
    port: u16,
    kind: ConnectorKind,
}

impl Connector {
    pub fn new(name: impl Into<String>, port: u16, kind: ConnectorKind) -> Self {
        Self {
            name: name.into(),
            port,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn kind(&self) -> ConnectorKind {
        self.kind
    }
}

/// Registry of all connectors known to the gateway.
#[derive(Debug, Default)]
pub struct ConnectorRegistry {
    connectors: Vec<Connector>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector.
    ///
    /// The port check runs first, so a connector clashing on both name and
    /// port reports the port.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        port: u16,
        kind: ConnectorKind,
    ) -> Result<&Connector, ConfigurationError> {
        let name = name.into();

        if let Some(existing) = self.connectors.iter().find(|c| c.port == port) {
            return Err(ConfigurationError::DuplicatePort {
                port,
                existing: existing.name.clone(),
                name,
            });
        }
        if self.connectors.iter().any(|c| c.name == name) {
            return Err(ConfigurationError::DuplicateName(name));
        }

        tracing::debug!(connector = %name, port, kind = %kind, "Connector registered");
        self.connectors.push(Connector::new(name, port, kind));
        Ok(&self.connectors[self.connectors.len() - 1])
    }

    /// Look up a connector by name.
    pub fn resolve_by_name(&self, name: &str) -> Result<&Connector, NotFoundError> {
        self.connectors
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| NotFoundError(name.to_string()))
    }

    /// The first registered secure connector, if any.
    pub fn secure(&self) -> Option<&Connector> {
        self.connectors.iter().find(|c| c.kind.is_secure())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.iter()
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}
