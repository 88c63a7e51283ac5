//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection on a named connector
//!     → server.rs (Axum setup, per-connector router)
//!     → request.rs (InboundRequest: connector, secureness, host, path, query)
//!     → routing::ContextDispatcher (on the blocking pool)
//!     → response.rs (buffered ResponseWriter → Axum response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, X_REQUEST_ID};
pub use response::ResponseWriter;
pub use server::{GatewayServer, ServeError};
