//! UDP server for Open Sound Control.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use osc_core::AddressSpace;
use osc_server::config::Config;
use osc_server::{handler, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "osc-server")]
#[clap(about = "Receive OSC messages over UDP and dispatch them")]
struct Cli {
    /// Address to listen on [default: 0.0.0.0]
    #[clap(short, long)]
    address: Option<String>,

    /// UDP port to listen on [default: 9001]
    #[clap(short, long)]
    port: Option<u16>,

    /// TOML configuration file; without it OSC_* environment variables apply
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging (every received message)
    #[clap(short, long)]
    verbose: bool,

    /// Reject messages without a type-tag string
    #[clap(long, conflicts_with = "lenient")]
    strict: bool,

    /// Decode messages without a type-tag string with no arguments
    #[clap(long)]
    lenient: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(address) = cli.address {
        config.bind_addr = address;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.strict {
        config.strict = true;
    }
    if cli.lenient {
        config.strict = false;
    }

    let space = Arc::new(AddressSpace::new());
    space.register_any(
        handler(|req| {
            info!("ping: {}", req);
            Ok(())
        }),
        "/ping",
    )?;

    info!(
        "Starting osc-server on {} (max datagram = {}, strict = {})",
        config.socket_addr_string(),
        config.max_datagram_size,
        config.strict
    );

    server::run(config, space).await
}
