//! Secure gateway (v1)
//!
//! Serves named plaintext and TLS connectors from one process.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                  SECURE GATEWAY                  │
//!   http://host:8080     │  ┌───────────┐                                   │
//!   ─────────────────────┼─▶│ unsecured │──┐    ┌────────────┐              │
//!                        │  └───────────┘  ├───▶│  context   │              │
//!   https://host:443     │  ┌───────────┐  │    │ dispatcher │              │
//!   ─────────────────────┼─▶│  secured  │──┘    └─────┬──────┘              │
//!                        │  └───────────┘             │                     │
//!                        │                            ▼                     │
//!                        │    ┌──────────────────────────────────────────┐  │
//!                        │    │ handler chains                           │  │
//!                        │    │  scheme enforcement · echo · index · dir │  │
//!                        │    └──────────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use secure_gateway::config::loader::load_config;
use secure_gateway::lifecycle::signals::spawn_signal_listener;
use secure_gateway::observability::{logging, metrics};
use secure_gateway::{GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "secure-gateway")]
#[command(about = "HTTP gateway enforcing secure-only contexts", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.observability);

    tracing::info!(
        config = %cli.config.display(),
        connectors = config.connectors.len(),
        contexts = config.contexts.len(),
        "secure-gateway v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = GatewayServer::new(config)?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    server.run(shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
