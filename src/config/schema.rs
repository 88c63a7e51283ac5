//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::net::ConnectorKind;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server-wide settings shared by all connectors.
    pub server: ServerConfig,

    /// TLS material for secure connectors.
    pub tls: Option<TlsConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Named listening endpoints, in registration order.
    pub connectors: Vec<ConnectorConfig>,

    /// Contexts, in registration order.
    pub contexts: Vec<ContextConfig>,
}

/// Server-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host part of every connector's bind address.
    pub bind_host: String,

    /// Scheme used in redirects to the secure connector.
    pub secure_scheme: String,

    /// Server name used when a request carries no Host header.
    pub default_server_name: String,

    /// Maximum in-flight requests per connector (backpressure).
    pub max_in_flight: usize,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Grace period for draining connections on shutdown, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            secure_scheme: "https".to_string(),
            default_server_name: "localhost".to_string(),
            max_in_flight: 1024,
            request_timeout_secs: 30,
            shutdown_grace_secs: 5,
        }
    }
}

/// TLS configuration for secure connectors.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// A named listening endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectorConfig {
    pub name: String,
    pub port: u16,
    pub kind: ConnectorKind,
}

/// A context and its handler chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContextConfig {
    /// Path prefix the context is rooted at.
    pub path: String,

    /// Connector names the context is reachable from. Empty = all.
    #[serde(default)]
    pub virtual_hosts: Vec<String>,

    /// Handlers, tried in order.
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

/// Handler definitions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HandlerConfig {
    /// Fixed plain-text message.
    Echo { message: String },

    /// Redirect or refuse requests that are not secure.
    SchemeEnforcement,

    /// HTML list of child context paths.
    ContextIndex { children: Vec<String> },

    /// Files below `root`.
    DirectoryListing {
        root: String,
        #[serde(default = "default_welcome_files")]
        welcome_files: Vec<String>,
        #[serde(default)]
        list_directories: bool,
    },
}

fn default_welcome_files() -> Vec<String> {
    vec!["index.html".to_string()]
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            [server]
            secure_scheme = "https"

            [tls]
            cert_path = "cert.pem"
            key_path = "key.pem"

            [[connectors]]
            name = "unsecured"
            port = 8080
            kind = "plaintext"

            [[connectors]]
            name = "secured"
            port = 443
            kind = "secure"

            [[contexts]]
            path = "/test1"
            virtual_hosts = ["secured"]
            handlers = [{ type = "echo", message = "Hello1" }]

            [[contexts]]
            path = "/"
            virtual_hosts = ["unsecured"]
            handlers = [{ type = "scheme_enforcement" }]

            [[contexts]]
            path = "/static"
            handlers = [{ type = "directory_listing", root = "WebContent", list_directories = true }]
        "#;

        let config: GatewayConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.connectors.len(), 2);
        assert_eq!(config.connectors[1].kind, ConnectorKind::Secure);
        assert_eq!(config.server.max_in_flight, 1024);
        assert_eq!(
            config.contexts[0].handlers,
            vec![HandlerConfig::Echo { message: "Hello1".into() }]
        );
        assert_eq!(config.contexts[1].handlers, vec![HandlerConfig::SchemeEnforcement]);
        assert!(config.contexts[2].virtual_hosts.is_empty());
        assert_eq!(
            config.contexts[2].handlers,
            vec![HandlerConfig::DirectoryListing {
                root: "WebContent".into(),
                welcome_files: vec!["index.html".into()],
                list_directories: true,
            }]
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let raw = r#"
            [[connectors]]
            name = "x"
            port = 1
            kind = "quic"
        "#;
        assert!(toml::from_str::<GatewayConfig>(raw).is_err());
    }
}
