// crates/osc-client/src/client.rs

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use osc_core::{Arg, Bundle, Message};
use osc_protocol::{
    encode_bundle_with, encode_message_value_with, encode_message_with, CodecOptions,
    MAX_DATAGRAM_SIZE,
};
use tokio::net::{lookup_host, ToSocketAddrs, UdpSocket};
use tracing::debug;

use crate::error::{ClientError, Result};

/// Sends OSC packets to one destination over UDP.
///
/// Fire and forget: nothing is acknowledged and nothing is retried.
pub struct Client {
    socket: UdpSocket,
    dest: SocketAddr,
    options: CodecOptions,
}

impl Client {
    /// Resolve `dest` and open a socket for it, with strict encoding.
    pub async fn connect(dest: impl ToSocketAddrs + fmt::Debug) -> Result<Self> {
        Self::connect_with(dest, CodecOptions::default()).await
    }

    pub async fn connect_with(
        dest: impl ToSocketAddrs + fmt::Debug,
        options: CodecOptions,
    ) -> Result<Self> {
        let label = format!("{:?}", dest);
        let dest = lookup_host(dest)
            .await?
            .next()
            .ok_or(ClientError::Resolve(label))?;

        let local: SocketAddr = if dest.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(dest).await?;

        debug!("OSC client for {} bound to {}", dest, socket.local_addr()?);
        Ok(Client {
            socket,
            dest,
            options,
        })
    }

    pub fn dest(&self) -> SocketAddr {
        self.dest
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Encode and send one message built from encoder arguments.
    pub async fn send_args(&self, address: &str, args: Vec<Arg>) -> Result<()> {
        let packet = encode_message_with(address, args, self.options)?;
        self.send_raw(&packet).await
    }

    pub async fn send_message(&self, msg: &Message) -> Result<()> {
        let packet = encode_message_value_with(msg, self.options)?;
        self.send_raw(&packet).await
    }

    pub async fn send_bundle(&self, bundle: &Bundle) -> Result<()> {
        let packet = encode_bundle_with(bundle, self.options)?;
        self.send_raw(&packet).await
    }

    /// Send an already encoded packet as one datagram.
    pub async fn send_raw(&self, packet: &[u8]) -> Result<()> {
        if packet.len() > MAX_DATAGRAM_SIZE {
            return Err(ClientError::TooLarge {
                size: packet.len(),
                max: MAX_DATAGRAM_SIZE,
            });
        }

        self.socket.send(packet).await?;
        debug!("Sent {} bytes to {}", packet.len(), self.dest);
        Ok(())
    }
}

/// One-shot helper: open a client for `dest`, send one message, close.
pub async fn send(
    dest: impl ToSocketAddrs + fmt::Debug,
    address: &str,
    args: Vec<Arg>,
) -> Result<()> {
    Client::connect(dest).await?.send_args(address, args).await
}
