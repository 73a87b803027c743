//! UDP socket and top-level server wiring.
//!
//! This module:
//! - Binds the configured address/port.
//! - Receives datagrams one at a time.
//! - Hands each datagram to `dispatch::handle_datagram`.
//!
//! Nothing received from the network can stop the loop: decode and
//! handler failures are logged per datagram, receive errors are logged
//! and the next datagram is awaited.

use anyhow::{Context, Result};
use bytes::BytesMut;
use osc_protocol::CodecOptions;
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dispatch::handle_datagram;
use crate::types::SharedAddressSpace;

/// Bind the configured address and serve until the task is dropped or
/// the socket fails to bind.
pub async fn run(config: Config, space: SharedAddressSpace) -> Result<()> {
    let socket = bind(&config).await?;
    serve(socket, space, &config).await
}

/// Bind a UDP socket for `config`.
pub async fn bind(config: &Config) -> Result<UdpSocket> {
    let addr = config.socket_addr_string();
    let socket = UdpSocket::bind(&addr)
        .await
        .with_context(|| format!("binding UDP socket on {}", addr))?;
    info!("Listening for OSC on {}", socket.local_addr()?);
    Ok(socket)
}

/// Receive loop on an already bound socket.
pub async fn serve(socket: UdpSocket, space: SharedAddressSpace, config: &Config) -> Result<()> {
    let options: CodecOptions = config.codec_options();
    let max = config.max_datagram_size;

    // One spare byte tells an oversized datagram from one that fits exactly.
    let mut buf = BytesMut::zeroed(max + 1);

    loop {
        let (n, source) = match socket.recv_from(&mut buf[..]).await {
            Ok(received) => received,
            Err(e) => {
                warn!("UDP receive error: {}", e);
                continue;
            }
        };

        if n > max {
            warn!(%source, max, "dropping oversized datagram");
            continue;
        }

        let stats = handle_datagram(&space, &buf[..n], source, options);
        debug!(%source, len = n, ?stats, "datagram done");
    }
}
