//! Inbound request model.
//!
//! # Responsibilities
//! - Carry the routing-relevant view of one request (connector, path, query)
//! - Carry the transport's secureness as a plain boolean
//! - Derive the server name from the Host header
//!
//! # Design Decisions
//! - Built once per request by the transport layer, then read-only
//! - Secureness is injected by whoever terminated the connection; this type
//!   never inspects TLS state itself
//! - An absent query string is kept distinct from an empty one

use axum::http::{header, Method, Request};
use uuid::Uuid;

/// Header carrying the per-request correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The routing core's view of one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub connector_name: String,
    pub is_secure: bool,
    pub server_name: String,
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub request_id: String,
}

impl InboundRequest {
    /// Create a GET request with a fresh request id.
    pub fn new(
        connector_name: impl Into<String>,
        is_secure: bool,
        server_name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            connector_name: connector_name.into(),
            is_secure,
            server_name: server_name.into(),
            method: Method::GET,
            path: path.into(),
            query: None,
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Attach a query string (without the leading `?`).
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Build from an HTTP request accepted on the named connector.
    ///
    /// `fallback_server_name` is used when the request has no usable Host
    /// header.
    pub fn from_http<B>(
        req: &Request<B>,
        connector_name: &str,
        is_secure: bool,
        fallback_server_name: &str,
    ) -> Self {
        let server_name = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .map(strip_port)
            .or_else(|| req.uri().host())
            .filter(|h| !h.is_empty())
            .unwrap_or(fallback_server_name)
            .to_string();

        let request_id = req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            connector_name: connector_name.to_string(),
            is_secure,
            server_name,
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_string),
            request_id,
        }
    }
}

/// Strip a trailing `:port` from a Host header value, keeping IPv6 brackets.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    }
}
