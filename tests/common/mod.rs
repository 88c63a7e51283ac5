//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use secure_gateway::config::loader::parse_config;
use secure_gateway::{GatewayServer, Shutdown};

/// Contexts `/test1` and `/test2` guarded by scheme enforcement and, when a
/// secure connector exists, reachable only from it. The plaintext root
/// enforces the scheme for everything else.
pub fn secure_contexts_config(plain_port: u16, secure_port: Option<u16>) -> String {
    let mut config = format!(
        r#"
        [server]
        bind_host = "127.0.0.1"

        [tls]
        cert_path = "missing.crt"
        key_path = "missing.key"

        [[connectors]]
        name = "unsecured"
        port = {plain_port}
        kind = "plaintext"
        "#
    );
    if let Some(port) = secure_port {
        config.push_str(&format!(
            r#"
        [[connectors]]
        name = "secured"
        port = {port}
        kind = "secure"
        "#
        ));
    }
    let secure_hosts = if secure_port.is_some() { r#"["secured"]"# } else { "[]" };
    config.push_str(&format!(
        r#"
        [[contexts]]
        path = "/test1"
        virtual_hosts = {secure_hosts}
        handlers = [{{ type = "scheme_enforcement" }}, {{ type = "echo", message = "Hello1" }}]

        [[contexts]]
        path = "/test2"
        virtual_hosts = {secure_hosts}
        handlers = [{{ type = "scheme_enforcement" }}, {{ type = "echo", message = "Hello2" }}]

        [[contexts]]
        path = "/"
        virtual_hosts = ["unsecured"]
        handlers = [{{ type = "scheme_enforcement" }}]
        "#
    ));
    config
}

pub fn server(config: &str) -> GatewayServer {
    GatewayServer::new(parse_config(config).unwrap()).unwrap()
}

/// Serve one connector's router on an ephemeral local port.
pub async fn serve_connector(server: &GatewayServer, connector: &str, shutdown: &Shutdown) -> SocketAddr {
    let router = server.router(connector).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let stop = shutdown.signalled();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).with_graceful_shutdown(stop).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
