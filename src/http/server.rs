//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build one Axum Router per connector
//! - Bind plaintext connectors and serve TLS connectors via axum-server
//! - Wire up middleware (tracing, timeout)
//! - Convert each request into an `InboundRequest` and dispatch it
//! - Graceful shutdown across all connectors

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::error::{ConfigurationError, NotFoundError};
use crate::http::request::{InboundRequest, X_REQUEST_ID};
use crate::http::response::ResponseWriter;
use crate::lifecycle::{assemble, Gateway, Shutdown};
use crate::net::listener::{self, ListenerError};
use crate::net::{tls, ConnectionSignal, Connector, InFlightLimit};
use crate::observability::metrics as gateway_metrics;
use crate::observability::tracing::request_span;
use crate::routing::{ContextDispatcher, DispatchOutcome};

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("connector `{connector}` stopped serving: {source}")]
    Io {
        connector: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serve task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// State injected into each connector's handler.
#[derive(Clone)]
struct ConnectorState {
    connector: Arc<Connector>,
    dispatcher: Arc<ContextDispatcher>,
    limit: InFlightLimit,
    default_server_name: Arc<str>,
}

/// Multi-connector HTTP front end.
pub struct GatewayServer {
    gateway: Gateway,
}

impl GatewayServer {
    /// Assemble the gateway from configuration. Fails before anything binds.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            gateway: assemble(config)?,
        })
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Build the router serving the named connector.
    pub fn router(&self, connector_name: &str) -> Result<Router, NotFoundError> {
        let connector = self.gateway.registry.resolve_by_name(connector_name)?;
        Ok(self.build_router(connector))
    }

    #[allow(deprecated)]
    fn build_router(&self, connector: &Connector) -> Router {
        let server = &self.gateway.config.server;
        let state = ConnectorState {
            connector: Arc::new(connector.clone()),
            dispatcher: Arc::clone(&self.gateway.dispatcher),
            limit: InFlightLimit::new(server.max_in_flight),
            default_server_name: Arc::from(server.default_server_name.as_str()),
        };

        Router::new()
            .fallback(gateway_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve every connector until `shutdown` is triggered or one fails.
    ///
    /// TLS material is loaded and plaintext ports are bound before any
    /// connector starts serving.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), ServeError> {
        let config = Arc::clone(&self.gateway.config);
        let grace = Duration::from_secs(config.server.shutdown_grace_secs);

        let mut secure: Vec<(Connector, RustlsConfig)> = Vec::new();
        let mut plaintext: Vec<(Connector, TcpListener)> = Vec::new();
        for connector in self.gateway.registry.iter() {
            if connector.kind().is_secure() {
                let tls_config = tls::load_for_connector(connector.name(), config.tls.as_ref()).await?;
                secure.push((connector.clone(), tls_config));
            }
        }
        for connector in self.gateway.registry.iter() {
            if !connector.kind().is_secure() {
                let bound = listener::bind(&config.server.bind_host, connector).await?;
                plaintext.push((connector.clone(), bound));
            }
        }

        let mut tasks = JoinSet::new();

        for (connector, bound) in plaintext {
            let router = self.build_router(&connector);
            let stop = shutdown.signalled();
            tasks.spawn(async move {
                let result = axum::serve(bound, router).with_graceful_shutdown(stop).await;
                (connector, result)
            });
        }

        for (connector, tls_config) in secure {
            let router = self.build_router(&connector);
            let addr = listener::bind_address(&config.server.bind_host, &connector)?;
            let handle = axum_server::Handle::new();

            let watcher = handle.clone();
            let stop = shutdown.signalled();
            tokio::spawn(async move {
                stop.await;
                watcher.graceful_shutdown(Some(grace));
            });

            tracing::info!(
                connector = %connector.name(),
                address = %addr,
                kind = %connector.kind(),
                "TLS listener starting"
            );
            tasks.spawn(async move {
                let result = axum_server::bind_rustls(addr, tls_config)
                    .handle(handle)
                    .serve(router.into_make_service())
                    .await;
                (connector, result)
            });
        }

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let failure = match joined {
                Ok((connector, Ok(()))) => {
                    tracing::info!(connector = %connector.name(), "Connector stopped");
                    None
                }
                Ok((connector, Err(source))) => {
                    tracing::error!(connector = %connector.name(), error = %source, "Connector failed");
                    Some(ServeError::Io {
                        connector: connector.name().to_string(),
                        source,
                    })
                }
                Err(e) => Some(ServeError::Task(e)),
            };
            if let Some(err) = failure {
                shutdown.trigger();
                first_error.get_or_insert(err);
            }
        }

        tracing::info!("Gateway stopped");
        first_error.map_or(Ok(()), Err)
    }
}

/// Single entry point for every request on a connector.
async fn gateway_handler(State(state): State<ConnectorState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let inbound = InboundRequest::from_http(
        &request,
        state.connector.name(),
        state.connector.kind().is_secure(),
        &state.default_server_name,
    );
    let connector_name = inbound.connector_name.clone();
    let request_id = inbound.request_id.clone();
    let path = inbound.path.clone();

    let Some(_permit) = state.limit.acquire().await else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Server shutting down").into_response();
    };

    let signal = ConnectionSignal::new();
    let guard = signal.close_on_drop();
    let dispatcher = Arc::clone(&state.dispatcher);

    let joined = tokio::task::spawn_blocking(move || {
        let span = request_span(&inbound);
        let _entered = span.enter();
        let mut response = ResponseWriter::new(signal);
        let outcome = dispatcher.dispatch(&inbound, &mut response);
        (outcome, response)
    })
    .await;
    guard.disarm();

    let mut response = match joined {
        Ok((Ok(outcome), writer)) => {
            if outcome == DispatchOutcome::NotFound {
                gateway_metrics::record_not_found(&connector_name);
            }
            writer.into_response()
        }
        Ok((Err(e), _)) => {
            tracing::debug!(request_id = %request_id, error = %e, "Response abandoned");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Handler task failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = response.status();
    tracing::debug!(
        request_id = %request_id,
        connector = %connector_name,
        path = %path,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request complete"
    );
    gateway_metrics::record_request(&connector_name, status.as_u16(), start);

    response
}
