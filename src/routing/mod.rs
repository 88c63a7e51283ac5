//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (connector name, path)
//!     → router.rs (candidate lookup, longest prefix first)
//!     → matcher.rs (virtual hosts + path prefix)
//!     → context.rs (handler chain of each candidate)
//!     → Handled, or NotFound (404)
//!
//! Context Compilation (at startup):
//!     ContextConfig[]
//!     → Build handler chains
//!     → Freeze as immutable ContextDispatcher
//! ```
//!
//! # Design Decisions
//! - Contexts compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same context

pub mod context;
pub mod matcher;
pub mod router;

pub use context::Context;
pub use matcher::{PathPrefixMatcher, VirtualHosts};
pub use router::{ContextDispatcher, DispatchOutcome};
