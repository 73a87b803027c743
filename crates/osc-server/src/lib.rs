//! osc-server
//!
//! Async UDP server that decodes OSC datagrams and dispatches each
//! message through an `osc_core::AddressSpace`.

pub mod config;
pub mod dispatch;
pub mod server;
pub mod types;

pub use config::Config;
pub use dispatch::{handle_datagram, DispatchStats};
pub use types::{handler, Handler, Request, SharedAddressSpace};
