//! Request spans.
//!
//! Every dispatched request runs inside a span carrying its request id,
//! connector and path, so handler logs correlate without repeating fields.

use tracing::Span;

use crate::http::InboundRequest;

pub fn request_span(request: &InboundRequest) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request.request_id,
        connector = %request.connector_name,
        secure = request.is_secure,
        method = %request.method,
        path = %request.path,
    )
}
