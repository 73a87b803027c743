// crates/osc-client/src/error.rs

use std::io;

use osc_protocol::ProtocolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("could not resolve destination {0:?}")]
    Resolve(String),

    #[error("packet of {size} bytes exceeds the {max} byte datagram limit")]
    TooLarge { size: usize, max: usize },

    #[error("invalid argument {0:?}: {1}")]
    Argument(String, String),

    #[error("send queue is full")]
    QueueFull,

    #[error("client is closed")]
    Closed,

    #[error("timed out waiting for the send task to finish")]
    Timeout,

    #[error("send task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
