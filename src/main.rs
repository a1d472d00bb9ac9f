//! Publishing API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (layers) ──▶ resource handlers ──▶ services ──▶ db
//!                                                    │
//!     Client Response                                ▼
//!     ◀────────────── http::response (Location) ◀── hateoas (envelope + links)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use publishing_api::config::{load_config, AppConfig};
use publishing_api::observability::{logging, metrics};
use publishing_api::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "publishing-api")]
#[command(about = "Story and article publishing API with hypermedia links", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "publishing-api starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base = %format!("{}/{}", config.api.prefix, config.api.version),
        request_timeout_secs = config.timeouts.request_secs,
        session_ttl_secs = config.auth.session_ttl_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
