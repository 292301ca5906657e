//! OTP statistics relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  OTP RELAY                   │
//!   Browser request    │  ┌──────────┐    ┌──────────┐    ┌────────┐  │
//!   ───────────────────┼─▶│   http   │───▶│ handlers │───▶│upstream│──┼──▶ Statistics
//!                      │  │  server  │    │          │    │ client │  │    endpoint
//!   Envelope           │  └──────────┘    └────┬─────┘    └───┬────┘  │
//!   ◀──────────────────┼───────────────────────┘   payload /  │       │
//!                      │                          error  ◀────┘       │
//!                      │                                              │
//!                      │  config · observability · lifecycle · probe  │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use otp_relay::config::load_config;
use otp_relay::observability::{logging, metrics};
use otp_relay::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "otp-relay")]
#[command(about = "Relay for the OTP statistics API", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability);

    tracing::info!("otp-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.url,
        fetch_timeout_ms = config.upstream.fetch_timeout_ms,
        probe_timeout_ms = config.upstream.probe_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already checked by validation.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
