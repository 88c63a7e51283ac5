//! Startup orchestration.
//!
//! # Responsibilities
//! - Register connectors and freeze the registry
//! - Validate the rest of the configuration
//! - Build every context's handler chain
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no partial gateway
//! - Connectors register before validation so duplicate names and ports
//!   surface as their own errors
//! - Listeners start later, in `http::server`, once assembly succeeded

use std::sync::Arc;

use crate::config::validation::validate_config;
use crate::config::{ContextConfig, GatewayConfig, HandlerConfig};
use crate::error::ConfigurationError;
use crate::handlers::{
    ContextIndexHandler, DirectoryListingHandler, EchoHandler, Handler, HandlerChain,
    SchemeEnforcementHandler, SecureTarget,
};
use crate::net::ConnectorRegistry;
use crate::routing::{Context, ContextDispatcher, VirtualHosts};

/// The immutable routing state produced at startup.
#[derive(Debug, Clone)]
pub struct Gateway {
    pub config: Arc<GatewayConfig>,
    pub registry: Arc<ConnectorRegistry>,
    pub dispatcher: Arc<ContextDispatcher>,
}

/// Assemble the registry and dispatcher from configuration.
pub fn assemble(config: GatewayConfig) -> Result<Gateway, ConfigurationError> {
    let mut registry = ConnectorRegistry::new();
    for connector in &config.connectors {
        registry.register(connector.name.clone(), connector.port, connector.kind)?;
    }

    validate_config(&config).map_err(ConfigurationError::Invalid)?;

    let registry = Arc::new(registry);
    let secure = SecureTarget::from_registry(&registry, &config.server.secure_scheme);
    if secure.is_none() {
        tracing::warn!("No secure connector registered; scheme enforcement will refuse plaintext requests");
    }

    let contexts = config
        .contexts
        .iter()
        .map(|context| build_context(context, secure.as_ref()))
        .collect();

    let dispatcher = Arc::new(ContextDispatcher::new(Arc::clone(&registry), contexts));

    tracing::info!(
        connectors = registry.len(),
        contexts = dispatcher.contexts().len(),
        "Gateway assembled"
    );

    Ok(Gateway {
        config: Arc::new(config),
        registry,
        dispatcher,
    })
}

fn build_context(config: &ContextConfig, secure: Option<&SecureTarget>) -> Context {
    let virtual_hosts = if config.virtual_hosts.is_empty() {
        VirtualHosts::any()
    } else {
        VirtualHosts::only(config.virtual_hosts.iter().cloned())
    };

    let chain = HandlerChain::new(
        config
            .handlers
            .iter()
            .map(|handler| build_handler(handler, &config.path, secure))
            .collect(),
    );

    tracing::debug!(
        context = %config.path,
        virtual_hosts = ?config.virtual_hosts,
        handlers = chain.len(),
        "Context configured"
    );

    Context::new(config.path.clone(), virtual_hosts, chain)
}

fn build_handler(config: &HandlerConfig, context_path: &str, secure: Option<&SecureTarget>) -> Box<dyn Handler> {
    match config {
        HandlerConfig::Echo { message } => Box::new(EchoHandler::new(message.clone())),
        HandlerConfig::SchemeEnforcement => Box::new(SchemeEnforcementHandler::new(secure.cloned())),
        HandlerConfig::ContextIndex { children } => {
            Box::new(ContextIndexHandler::new(children.iter().cloned()))
        }
        HandlerConfig::DirectoryListing {
            root,
            welcome_files,
            list_directories,
        } => Box::new(
            DirectoryListingHandler::new(root)
                .with_mount(context_path)
                .with_welcome_files(welcome_files.clone())
                .with_listing(*list_directories),
        ),
    }
}
