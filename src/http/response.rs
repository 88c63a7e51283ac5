//! Buffered response writer handed to handlers.
//!
//! # Responsibilities
//! - Collect status, headers and body written by a handler chain
//! - Track the committed state (status and headers frozen after first body write)
//! - Fail fast once the client connection is gone
//!
//! # Design Decisions
//! - Writes are never rolled back; a handler that declines after writing
//!   leaves its output in place
//! - Connection loss is observed through a shared `ConnectionSignal` that
//!   the transport closes when the client disconnects

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Response, StatusCode};

use crate::error::WriteAfterCloseError;
use crate::net::ConnectionSignal;

/// Response under construction.
#[derive(Debug)]
pub struct ResponseWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    committed: bool,
    connection: ConnectionSignal,
}

impl ResponseWriter {
    pub fn new(connection: ConnectionSignal) -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
            committed: false,
            connection,
        }
    }

    /// A writer whose connection never closes.
    pub fn detached() -> Self {
        Self::new(ConnectionSignal::new())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    fn ensure_open(&self) -> Result<(), WriteAfterCloseError> {
        if self.connection.is_closed() {
            Err(WriteAfterCloseError)
        } else {
            Ok(())
        }
    }

    pub fn set_status(&mut self, status: StatusCode) -> Result<(), WriteAfterCloseError> {
        self.ensure_open()?;
        if self.committed {
            tracing::trace!(%status, "Status change ignored on committed response");
            return Ok(());
        }
        self.status = status;
        Ok(())
    }

    pub fn set_header(
        &mut self,
        name: HeaderName,
        value: HeaderValue,
    ) -> Result<(), WriteAfterCloseError> {
        self.ensure_open()?;
        if self.committed {
            tracing::trace!(header = %name, "Header ignored on committed response");
            return Ok(());
        }
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn set_content_type(&mut self, content_type: &'static str) -> Result<(), WriteAfterCloseError> {
        self.set_header(header::CONTENT_TYPE, HeaderValue::from_static(content_type))
    }

    pub fn set_content_length(&mut self, len: u64) -> Result<(), WriteAfterCloseError> {
        self.set_header(header::CONTENT_LENGTH, HeaderValue::from(len))
    }

    /// Append body bytes, committing the response.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), WriteAfterCloseError> {
        self.ensure_open()?;
        self.committed = true;
        self.body.extend_from_slice(bytes);
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), WriteAfterCloseError> {
        self.write(s.as_bytes())
    }

    /// Send a 302 redirect to `location` with an empty body.
    pub fn send_redirect(&mut self, location: &str) -> Result<(), WriteAfterCloseError> {
        self.set_status(StatusCode::FOUND)?;
        match HeaderValue::from_str(location) {
            Ok(value) => self.set_header(header::LOCATION, value)?,
            Err(_) => {
                tracing::warn!(location = %location, "Redirect target is not a valid header value");
                self.set_status(StatusCode::INTERNAL_SERVER_ERROR)?;
            }
        }
        self.set_content_length(0)
    }

    /// Send an error status with a short plain-text message.
    pub fn send_error(&mut self, status: StatusCode, message: &str) -> Result<(), WriteAfterCloseError> {
        self.set_status(status)?;
        self.set_content_type("text/plain; charset=utf-8")?;
        self.write_str(message)
    }

    /// Convert into an axum response.
    pub fn into_response(self) -> Response<Body> {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_has_zero_length() {
        let mut resp = ResponseWriter::detached();
        resp.send_redirect("https://host:443/test1").unwrap();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[header::LOCATION], "https://host:443/test1");
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], "0");
        assert!(resp.body().is_empty());
    }

    #[test]
    fn test_status_frozen_after_commit() {
        let mut resp = ResponseWriter::detached();
        resp.write_str("partial").unwrap();
        resp.set_status(StatusCode::NOT_FOUND).unwrap();
        resp.write_str(" output").unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.body(), b"partial output");
    }

    #[test]
    fn test_write_after_close_fails_fast() {
        let signal = ConnectionSignal::new();
        let mut resp = ResponseWriter::new(signal.clone());
        resp.write_str("before").unwrap();
        signal.close();
        assert_eq!(resp.write_str("after"), Err(WriteAfterCloseError));
        assert_eq!(resp.body(), b"before");
    }
}
