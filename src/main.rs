//! File forwarder (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────┐
//!                   │                FILE FORWARDER                │
//!   GET /send-file  │  ┌─────────┐   ┌───────────┐   ┌──────────┐  │
//!   ────────────────┼─▶│  http   │──▶│  payload  │──▶│  upload  │  │
//!                   │  │ server  │   │  (disk)   │   │multipart │  │
//!                   │  └─────────┘   └───────────┘   └────┬─────┘  │
//!                   │                                     ▼        │
//!   text/plain      │  ┌─────────┐                  ┌──────────┐   │  POST
//!   ◀───────────────┼──│  relay  │◀─────────────────│transport │◀──┼──────▶ Upstream
//!                   │  └─────────┘                  └──────────┘   │
//!                   │                                              │
//!                   │   config (+ watcher) · observability ·       │
//!                   │   lifecycle (signals, shutdown)              │
//!                   └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use file_forwarder::config::{load_config, ConfigWatcher, ServiceConfig};
use file_forwarder::http::HttpServer;
use file_forwarder::lifecycle::{wait_for_signal, Shutdown};
use file_forwarder::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "file-forwarder")]
#[command(about = "Uploads a local file to an upstream API and relays the answer", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!("file-forwarder v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        endpoint = %config.endpoint.path,
        upstream = %config.upstream.url,
        source_directory = %config.source.directory,
        source_file = %config.source.file_name,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    // Keep the watcher alive for the lifetime of the server.
    let (config_updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_signal().await;
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
