//! TCP listener binding for connectors.
//!
//! # Responsibilities
//! - Compute each connector's bind address
//! - Bind plaintext connectors up front so port clashes fail startup
//!
//! # Design Decisions
//! - Secure connectors are bound by `axum-server` when they start serving
//! - Bind errors carry the connector name for operators

use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::net::Connector;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// The bind host and port do not form a socket address.
    Address { connector: String, source: std::net::AddrParseError },
    /// Failed to bind to address.
    Bind { connector: String, source: std::io::Error },
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Address { connector, source } => {
                write!(f, "Invalid bind address for connector {}: {}", connector, source)
            }
            ListenerError::Bind { connector, source } => {
                write!(f, "Failed to bind connector {}: {}", connector, source)
            }
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::Address { source, .. } => Some(source),
            ListenerError::Bind { source, .. } => Some(source),
        }
    }
}

/// Socket address a connector listens on.
pub fn bind_address(bind_host: &str, connector: &Connector) -> Result<SocketAddr, ListenerError> {
    let host = if bind_host.contains(':') && !bind_host.starts_with('[') {
        format!("[{}]", bind_host)
    } else {
        bind_host.to_string()
    };
    format!("{}:{}", host, connector.port())
        .parse()
        .map_err(|source| ListenerError::Address {
            connector: connector.name().to_string(),
            source,
        })
}

/// Bind a TCP listener for the connector.
pub async fn bind(bind_host: &str, connector: &Connector) -> Result<TcpListener, ListenerError> {
    let addr = bind_address(bind_host, connector)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind {
            connector: connector.name().to_string(),
            source,
        })?;

    tracing::info!(
        connector = %connector.name(),
        address = %addr,
        kind = %connector.kind(),
        "Listener bound"
    );

    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::ConnectorKind;

    #[test]
    fn test_bind_address() {
        let connector = Connector::new("unsecured", 8080, ConnectorKind::Plaintext);
        assert_eq!(
            bind_address("0.0.0.0", &connector).unwrap(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            bind_address("::1", &connector).unwrap(),
            "[::1]:8080".parse::<SocketAddr>().unwrap()
        );
        assert!(matches!(
            bind_address("not a host", &connector),
            Err(ListenerError::Address { .. })
        ));
    }

    #[tokio::test]
    async fn test_bind_ephemeral() {
        let connector = Connector::new("unsecured", 0, ConnectorKind::Plaintext);
        let listener = bind("127.0.0.1", &connector).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
