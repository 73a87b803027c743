//! Interactive sender: type `/address arg arg ...`, one message per line.
//!
//!     OSC_CLIENT_ADDR=127.0.0.1:9001 cargo run -p osc-server --example osc_prompt

use std::env;
use std::io::{self, Write};

use anyhow::Result;
use osc_client::{parse_args, Client};

#[tokio::main]
async fn main() -> Result<()> {
    // Where to send: env override or default.
    let addr = env::var("OSC_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:9001".to_string());

    let client = Client::connect(addr.as_str()).await?;
    println!("Sending to {}.", client.dest());
    println!("Type messages like:");
    println!("  /ping");
    println!("  /mixer/fader1 0.75");
    println!("  /synth/note i:60 h:100 s:on");
    println!("Type 'quit' or 'exit' to leave.\n");

    let stdin = io::stdin();

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            println!("\nEOF on stdin, exiting.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        let mut words = trimmed.split_whitespace();
        let address = words.next().unwrap_or_default();

        let sent = match parse_args(words) {
            Ok(args) => client.send_args(address, args).await,
            Err(e) => Err(e),
        };
        match sent {
            Ok(()) => println!("sent {}", address),
            Err(e) => eprintln!("error: {}", e),
        }
    }

    Ok(())
}
