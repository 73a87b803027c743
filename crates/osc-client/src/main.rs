// crates/osc-client/src/main.rs

use anyhow::Result;
use clap::Parser;
use osc_core::{Bundle, BundleElement};
use osc_client::{parse_args, Client};
use osc_protocol::CodecOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "osc-send")]
#[clap(about = "Send one OSC message over UDP")]
struct Cli {
    /// Destination host
    #[clap(long, default_value = "127.0.0.1")]
    host: String,

    /// Destination port
    #[clap(short, long, default_value = "9001")]
    port: u16,

    /// Wrap the message in a bundle stamped with the current time
    #[clap(short, long)]
    bundle: bool,

    /// Allow non-ASCII strings (sent as UTF-8)
    #[clap(long)]
    lenient: bool,

    /// Enable debug logging
    #[clap(short, long)]
    verbose: bool,

    /// OSC address, e.g. /mixer/fader1
    address: String,

    /// Arguments: 42, 4.2, true, nil, text, or tag:value (e.g. h:42, m:0,144,60,100)
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let args = parse_args(cli.args.iter().map(String::as_str))?;
    let options = if cli.lenient {
        CodecOptions::lenient()
    } else {
        CodecOptions::strict()
    };

    let client = Client::connect_with((cli.host.as_str(), cli.port), options).await?;

    if cli.bundle {
        let bundle = Bundle::now().with(BundleElement::Shorthand(cli.address.clone(), args));
        client.send_bundle(&bundle).await?;
    } else {
        client.send_args(&cli.address, args).await?;
    }

    info!("Sent {} to {}", cli.address, client.dest());
    Ok(())
}
