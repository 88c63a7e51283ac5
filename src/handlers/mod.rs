//! Request handlers and handler chains.
//!
//! # Data Flow
//! ```text
//! Context selected by the dispatcher
//!     → HandlerChain::dispatch (registration order)
//!         → scheme.rs    (redirect / forbid plaintext requests)
//!         → echo.rs      (fixed text body)
//!         → index.rs     (HTML list of child contexts)
//!         → directory.rs (files under a root directory)
//!     → first handler returning `true` ends the chain
//! ```
//!
//! # Design Decisions
//! - Handlers are synchronous; the server runs chains on the blocking pool
//! - Handlers own no reference back to the server or registry
//! - A declining handler's partial output is kept, never rolled back

pub mod directory;
pub mod echo;
pub mod index;
pub mod scheme;

use crate::error::WriteAfterCloseError;
use crate::http::{InboundRequest, ResponseWriter};

pub use directory::DirectoryListingHandler;
pub use echo::EchoHandler;
pub use index::ContextIndexHandler;
pub use scheme::{RedirectDecision, SchemeEnforcementHandler, SecureTarget};

/// A request handler.
pub trait Handler: Send + Sync + std::fmt::Debug {
    /// Handle the request. Returns `Ok(true)` if the request was claimed.
    fn handle(
        &self,
        request: &InboundRequest,
        response: &mut ResponseWriter,
    ) -> Result<bool, WriteAfterCloseError>;
}

/// Ordered handlers tried until one claims the request.
#[derive(Debug, Default)]
pub struct HandlerChain {
    handlers: Vec<Box<dyn Handler>>,
}

impl HandlerChain {
    pub fn new(handlers: Vec<Box<dyn Handler>>) -> Self {
        Self { handlers }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run handlers in order, stopping at the first that claims the request.
    pub fn dispatch(
        &self,
        request: &InboundRequest,
        response: &mut ResponseWriter,
    ) -> Result<bool, WriteAfterCloseError> {
        for handler in &self.handlers {
            if handler.handle(request, response)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::ConnectionSignal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Recording {
        output: &'static str,
        claims: bool,
        calls: Arc<AtomicUsize>,
    }

    impl Handler for Recording {
        fn handle(
            &self,
            _request: &InboundRequest,
            response: &mut ResponseWriter,
        ) -> Result<bool, WriteAfterCloseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            response.write_str(self.output)?;
            Ok(self.claims)
        }
    }

    fn recording(output: &'static str, claims: bool, calls: &Arc<AtomicUsize>) -> Box<dyn Handler> {
        Box::new(Recording {
            output,
            claims,
            calls: Arc::clone(calls),
        })
    }

    #[test]
    fn test_stops_at_first_claim() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = HandlerChain::new(vec![
            recording("a", false, &calls),
            recording("b", true, &calls),
            recording("c", true, &calls),
        ]);

        let request = InboundRequest::new("c", false, "host", "/");
        let mut response = ResponseWriter::detached();
        assert!(chain.dispatch(&request, &mut response).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // Output from the declining handler is not rolled back.
        assert_eq!(response.body(), b"ab");
    }

    /// Writes once, then the client goes away before the second write.
    #[derive(Debug)]
    struct Disconnecting {
        signal: ConnectionSignal,
    }

    impl Handler for Disconnecting {
        fn handle(
            &self,
            _request: &InboundRequest,
            response: &mut ResponseWriter,
        ) -> Result<bool, WriteAfterCloseError> {
            response.write_str("partial")?;
            self.signal.close();
            response.write_str("never sent")?;
            Ok(true)
        }
    }

    #[test]
    fn test_write_after_close_stops_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let signal = ConnectionSignal::new();
        let disconnecting: Box<dyn Handler> = Box::new(Disconnecting { signal: signal.clone() });
        let chain = HandlerChain::new(vec![
            recording("a", false, &calls),
            disconnecting,
            recording("b", true, &calls),
        ]);

        let request = InboundRequest::new("c", false, "host", "/");
        let mut response = ResponseWriter::new(signal);
        let err = chain.dispatch(&request, &mut response).unwrap_err();
        assert_eq!(err, WriteAfterCloseError);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.body(), b"apartial");
    }

    #[test]
    fn test_unclaimed_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = HandlerChain::new(vec![recording("", false, &calls)]);
        let request = InboundRequest::new("c", false, "host", "/");
        let mut response = ResponseWriter::detached();
        assert!(!chain.dispatch(&request, &mut response).unwrap());
        assert!(!HandlerChain::default()
            .dispatch(&request, &mut response)
            .unwrap());
    }
}
