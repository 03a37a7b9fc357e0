//! Multi-chain wallet gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http (axum + tower-http layers) ──▶ WalletService ──┬─▶ EthereumHelper ──▶ alloy provider ──▶ EVM node
//!                                                                    └─▶ SolanaHelper  ──▶ JSON-RPC client ──▶ Solana node
//!
//!   Cross-cutting: config (TOML), observability (tracing, Prometheus), lifecycle (signals, graceful drain)
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use multichain_wallet::config::{load_config, GatewayConfig};
use multichain_wallet::observability::{logging, metrics};
use multichain_wallet::{HttpServer, Shutdown, WalletService};

#[derive(Parser)]
#[command(name = "multichain-wallet")]
#[command(about = "HTTP gateway for ethereum and solana wallet operations", long_about = None)]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "multichain-wallet starting");
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        networks = ?config.networks.enabled,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let wallet = Arc::new(WalletService::from_config(&config.networks));
    let shutdown = Shutdown::new();
    let signal_task = shutdown.trigger_on_signal();
    let rx = shutdown.subscribe();

    let addr: SocketAddr = config.listener.bind_address.parse()?;
    let server = HttpServer::new(config, wallet);

    match server.config().listener.tls.clone() {
        Some(tls) => server.run_tls(addr, &tls, rx).await?,
        None => {
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, rx).await?;
        }
    }

    signal_task.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}
