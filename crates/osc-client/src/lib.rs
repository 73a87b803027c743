//! osc-client
//!
//! UDP senders for Open Sound Control packets.
//!
//! - [`Client`]       : encode and send directly from the caller's task
//! - [`QueuedClient`] : enqueue; a background task does the sending
//! - [`parse_arg`]    : command-line words to encoder arguments

pub mod args;
pub mod client;
pub mod error;
pub mod queued;

pub use args::{parse_arg, parse_args};
pub use client::{send, Client};
pub use error::{ClientError, Result};
pub use queued::{QueuedClient, DEFAULT_TIMEOUT, QUEUE_CAPACITY};
