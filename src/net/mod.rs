//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ConnectorConfig[]
//!     → connector.rs (named registry, duplicate checks)
//!     → listener.rs (bind plaintext connectors)
//!     → tls.rs (load certificates for secure connectors)
//!
//! Per request:
//!     → connection.rs (in-flight limit, close signal)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Registry is frozen before any listener starts
//! - TLS is terminated here; the routing core only sees a boolean

pub mod connection;
pub mod connector;
pub mod listener;
pub mod tls;

pub use connection::{CloseOnDrop, ConnectionSignal, InFlightLimit, InFlightPermit};
pub use connector::{Connector, ConnectorKind, ConnectorRegistry};
