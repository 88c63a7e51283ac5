//! Context lookup and dispatch.
//!
//! # Responsibilities
//! - Store the configured contexts
//! - Select contexts reachable from the request's connector whose prefix
//!   matches the path
//! - Run candidate handler chains, longest prefix first, until one claims
//!   the request
//! - Answer 404 when nothing claims it
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) context scan (acceptable for typical context counts)
//! - Equal prefixes: first registered wins
//! - Explicit NotFound rather than silent default

use std::cmp::Reverse;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::error::{NotFoundError, WriteAfterCloseError};
use crate::http::{InboundRequest, ResponseWriter};
use crate::net::ConnectorRegistry;
use crate::routing::matcher;
use crate::routing::Context;

/// Body of the dispatcher's own 404 response.
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

/// What happened to a dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A context's handler chain claimed the request.
    Handled { context: String },
    /// Nothing claimed the request; a 404 was written.
    NotFound,
}

/// Routes inbound requests to contexts.
#[derive(Debug)]
pub struct ContextDispatcher {
    registry: Arc<ConnectorRegistry>,
    contexts: Vec<Context>,
}

impl ContextDispatcher {
    pub fn new(registry: Arc<ConnectorRegistry>, contexts: Vec<Context>) -> Self {
        Self { registry, contexts }
    }

    pub fn registry(&self) -> &Arc<ConnectorRegistry> {
        &self.registry
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// Contexts eligible for `path` on `connector_name`, in the order they
    /// are tried.
    pub fn candidates(&self, connector_name: &str, path: &str) -> Vec<&Context> {
        let mut candidates: Vec<&Context> = self
            .contexts
            .iter()
            .filter(|c| matcher::matches(c, connector_name) && c.matches_path(path))
            .collect();
        // Stable sort keeps registration order among equal prefixes.
        candidates.sort_by_key(|c| Reverse(c.path_prefix().len()));
        candidates
    }

    /// The context that would be tried first, if any.
    pub fn select(&self, connector_name: &str, path: &str) -> Option<&Context> {
        self.candidates(connector_name, path).into_iter().next()
    }

    /// Dispatch one request.
    pub fn dispatch(
        &self,
        request: &InboundRequest,
        response: &mut ResponseWriter,
    ) -> Result<DispatchOutcome, WriteAfterCloseError> {
        if let Err(NotFoundError(name)) = self.registry.resolve_by_name(&request.connector_name) {
            tracing::warn!(
                request_id = %request.request_id,
                connector = %name,
                "Request arrived on unregistered connector"
            );
            response.send_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)?;
            return Ok(DispatchOutcome::NotFound);
        }

        for context in self.candidates(&request.connector_name, &request.path) {
            tracing::trace!(
                request_id = %request.request_id,
                context = %context.path_prefix(),
                "Trying context"
            );
            if context.chain().dispatch(request, response)? {
                return Ok(DispatchOutcome::Handled {
                    context: context.path_prefix().to_string(),
                });
            }
        }

        tracing::debug!(
            request_id = %request.request_id,
            connector = %request.connector_name,
            path = %request.path,
            "No context claimed request"
        );
        response.send_error(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)?;
        Ok(DispatchOutcome::NotFound)
    }
}
