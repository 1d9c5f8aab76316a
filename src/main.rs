//! GST API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 GST GATEWAY                  │
//!   Browser request      │  ┌────────┐   ┌─────────┐   ┌────────────┐   │
//!   ─────────────────────┼─▶│  http  │──▶│ extract │──▶│ auth /     │   │
//!                        │  │ server │   │ headers │   │ returns    │   │
//!                        │  └────────┘   └─────────┘   └─────┬──────┘   │
//!                        │                                   │          │
//!                        │                    ┌──────────────┴───────┐  │
//!                        │                    │ gstr1a aggregator    │  │
//!                        │                    │ (N parallel tasks)   │  │
//!                        │                    └──────────────┬───────┘  │
//!                        │                                   ▼          │
//!   Envelope response    │  ┌──────────┐              ┌────────────┐    │
//!   ◀────────────────────┼──│ response │◀─────────────│ upstream   │◀───┼──── GST API
//!                        │  │ envelope │              │ (reqwest)  │    │
//!                        │  └──────────┘              └────────────┘    │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use gst_gateway::config::{load_config, GatewayConfig};
use gst_gateway::observability::{init_logging, metrics};
use gst_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "gst-gateway", version, about = "Pass-through gateway for the GST API")]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "GST_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!("gst-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        max_concurrency = ?config.fanout.max_concurrency,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
