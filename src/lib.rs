//! Connector-aware HTTP gateway.
//!
//! Terminates plaintext and TLS connections on named connectors, routes each
//! request to the contexts reachable from its connector, and redirects
//! plaintext requests for secure-only contexts to the secure connector.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use error::{ConfigurationError, NotFoundError, WriteAfterCloseError};
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
