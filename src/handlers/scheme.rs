//! Scheme enforcement for secure-only contexts.
//!
//! # Responsibilities
//! - Let secure requests pass through untouched
//! - Redirect plaintext requests to the secure connector, keeping path and query
//! - Refuse plaintext requests with 403 when no secure connector exists
//!
//! # Design Decisions
//! - Secureness comes from the inbound request; no certificate inspection
//! - The secure endpoint is resolved from the registry once, at startup
//! - Redirect targets always spell out the port, even the scheme default

use axum::http::StatusCode;

use crate::error::WriteAfterCloseError;
use crate::handlers::Handler;
use crate::http::{InboundRequest, ResponseWriter};
use crate::net::ConnectorRegistry;

/// Diagnostic body sent with the 403 response.
pub const FORBIDDEN_MESSAGE: &str = "!Secure";

/// Where plaintext requests get sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureTarget {
    pub scheme: String,
    pub port: u16,
}

impl SecureTarget {
    /// Resolve the secure endpoint from the registry, if one is registered.
    pub fn from_registry(registry: &ConnectorRegistry, scheme: &str) -> Option<Self> {
        registry.secure().map(|connector| Self {
            scheme: scheme.to_string(),
            port: connector.port(),
        })
    }
}

/// Outcome of scheme enforcement for a plaintext request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectDecision {
    Redirect {
        target_scheme: String,
        target_port: u16,
        target_url: String,
    },
    Forbidden,
}

impl RedirectDecision {
    /// Decide what to do with `request`. `None` means the request is already
    /// secure and must not be intercepted.
    pub fn decide(request: &InboundRequest, secure: Option<&SecureTarget>) -> Option<Self> {
        if request.is_secure {
            return None;
        }

        let decision = match secure {
            Some(target) => {
                let mut target_url = format!(
                    "{}://{}:{}{}",
                    target.scheme, request.server_name, target.port, request.path
                );
                if let Some(query) = &request.query {
                    target_url.push('?');
                    target_url.push_str(query);
                }
                RedirectDecision::Redirect {
                    target_scheme: target.scheme.clone(),
                    target_port: target.port,
                    target_url,
                }
            }
            None => RedirectDecision::Forbidden,
        };
        Some(decision)
    }
}

/// Redirects or refuses requests that did not arrive over a secure connector.
#[derive(Debug, Clone)]
pub struct SchemeEnforcementHandler {
    secure: Option<SecureTarget>,
}

impl SchemeEnforcementHandler {
    pub fn new(secure: Option<SecureTarget>) -> Self {
        Self { secure }
    }
}

impl Handler for SchemeEnforcementHandler {
    fn handle(
        &self,
        request: &InboundRequest,
        response: &mut ResponseWriter,
    ) -> Result<bool, WriteAfterCloseError> {
        match RedirectDecision::decide(request, self.secure.as_ref()) {
            None => Ok(false),
            Some(RedirectDecision::Redirect { target_url, .. }) => {
                tracing::debug!(
                    request_id = %request.request_id,
                    from = %request.path,
                    to = %target_url,
                    "Redirecting to secure connector"
                );
                metrics::counter!("gateway_scheme_redirects_total").increment(1);
                response.send_redirect(&target_url)?;
                Ok(true)
            }
            Some(RedirectDecision::Forbidden) => {
                tracing::info!(
                    request_id = %request.request_id,
                    path = %request.path,
                    "No secure connector registered, refusing plaintext request"
                );
                metrics::counter!("gateway_scheme_forbidden_total").increment(1);
                response.send_error(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE)?;
                Ok(true)
            }
        }
    }
}
