//! Shared types for the OSC UDP server.
//!
//! This module defines:
//! - `Request`: what a handler gets for each matched message
//! - `Handler`: the callable stored in the address space
//! - `SharedAddressSpace`: the address space shared with the receive loop

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use osc_core::{AddressSpace, Message, TimeTag};

/// One message delivered to a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Timetag of the bundle the message came in, `None` for a bare
    /// message.
    pub timetag: Option<TimeTag>,
    pub message: Message,
    /// Where the datagram came from.
    pub source: SocketAddr,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ,{} {:?} from {}",
            self.message.address,
            self.message.typetags(),
            self.message.args,
            self.source
        )?;
        if let Some(t) = self.timetag {
            write!(f, " @ {}", t)?;
        }
        Ok(())
    }
}

/// Handler invoked for every message whose address matches its method.
///
/// An `Err` is logged by the server; it never stops the receive loop.
pub type Handler = Arc<dyn Fn(&Request) -> anyhow::Result<()> + Send + Sync>;

/// Address space shared between the caller and the receive loop.
///
/// Methods can still be registered while the server runs.
pub type SharedAddressSpace = Arc<AddressSpace<Handler>>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Request) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}
