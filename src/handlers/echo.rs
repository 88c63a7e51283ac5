//! Fixed-message handler.

use crate::error::WriteAfterCloseError;
use crate::handlers::Handler;
use crate::http::{InboundRequest, ResponseWriter};

/// Writes a fixed plain-text message followed by a newline.
#[derive(Debug, Clone)]
pub struct EchoHandler {
    message: String,
}

impl EchoHandler {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Handler for EchoHandler {
    fn handle(
        &self,
        _request: &InboundRequest,
        response: &mut ResponseWriter,
    ) -> Result<bool, WriteAfterCloseError> {
        response.set_content_type("text/plain; charset=utf-8")?;
        response.write_str(&self.message)?;
        response.write_str("\n")?;
        Ok(true)
    }
}
