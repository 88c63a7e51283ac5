//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (contexts reference existing connectors)
//! - Detect duplicate connector names and ports
//! - Require TLS material when a secure connector exists
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::net::ConnectorKind;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no connectors configured")]
    NoConnectors,

    #[error("duplicate connector name `{0}`")]
    DuplicateConnectorName(String),

    #[error("connectors `{first}` and `{second}` both use port {port}")]
    DuplicatePort { port: u16, first: String, second: String },

    #[error("context `{context}` references unknown connector `{connector}`")]
    UnknownConnector { context: String, connector: String },

    #[error("context path `{0}` must start with `/`")]
    InvalidContextPath(String),

    #[error("context `{0}` has no handlers")]
    EmptyHandlerChain(String),

    #[error("secure connector `{0}` configured without a [tls] section")]
    MissingTls(String),

    #[error("server.max_in_flight must be greater than zero")]
    ZeroInFlight,
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.connectors.is_empty() {
        errors.push(ValidationError::NoConnectors);
    }
    if config.server.max_in_flight == 0 {
        errors.push(ValidationError::ZeroInFlight);
    }

    let mut names: HashSet<&str> = HashSet::new();
    let mut ports: HashMap<u16, &str> = HashMap::new();
    for connector in &config.connectors {
        if !names.insert(connector.name.as_str()) {
            errors.push(ValidationError::DuplicateConnectorName(connector.name.clone()));
        }
        if let Some(first) = ports.insert(connector.port, connector.name.as_str()) {
            errors.push(ValidationError::DuplicatePort {
                port: connector.port,
                first: first.to_string(),
                second: connector.name.clone(),
            });
        }
        if connector.kind == ConnectorKind::Secure && config.tls.is_none() {
            errors.push(ValidationError::MissingTls(connector.name.clone()));
        }
    }

    for context in &config.contexts {
        if !context.path.starts_with('/') {
            errors.push(ValidationError::InvalidContextPath(context.path.clone()));
        }
        if context.handlers.is_empty() {
            errors.push(ValidationError::EmptyHandlerChain(context.path.clone()));
        }
        for host in &context.virtual_hosts {
            if !names.contains(host.as_str()) {
                errors.push(ValidationError::UnknownConnector {
                    context: context.path.clone(),
                    connector: host.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ConnectorConfig, ContextConfig, HandlerConfig, TlsConfig};

    fn connector(name: &str, port: u16, kind: ConnectorKind) -> ConnectorConfig {
        ConnectorConfig {
            name: name.into(),
            port,
            kind,
        }
    }

    fn valid() -> GatewayConfig {
        GatewayConfig {
            tls: Some(TlsConfig {
                cert_path: "cert.pem".into(),
                key_path: "key.pem".into(),
            }),
            connectors: vec![
                connector("unsecured", 8080, ConnectorKind::Plaintext),
                connector("secured", 443, ConnectorKind::Secure),
            ],
            contexts: vec![ContextConfig {
                path: "/test1".into(),
                virtual_hosts: vec!["secured".into()],
                handlers: vec![HandlerConfig::Echo { message: "Hello1".into() }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = valid();
        config.tls = None;
        config.connectors.push(connector("unsecured", 443, ConnectorKind::Plaintext));
        config.contexts.push(ContextConfig {
            path: "nope".into(),
            virtual_hosts: vec!["admin".into()],
            handlers: vec![],
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingTls("secured".into())));
        assert!(errors.contains(&ValidationError::DuplicateConnectorName("unsecured".into())));
        assert!(errors.contains(&ValidationError::DuplicatePort {
            port: 443,
            first: "secured".into(),
            second: "unsecured".into(),
        }));
        assert!(errors.contains(&ValidationError::InvalidContextPath("nope".into())));
        assert!(errors.contains(&ValidationError::EmptyHandlerChain("nope".into())));
        assert!(errors.contains(&ValidationError::UnknownConnector {
            context: "nope".into(),
            connector: "admin".into(),
        }));
    }

    #[test]
    fn test_empty_config_rejected() {
        let errors = validate_config(&GatewayConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoConnectors]);
    }
}
