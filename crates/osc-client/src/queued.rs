// crates/osc-client/src/queued.rs

use std::fmt;
use std::time::Duration;

use osc_core::{Arg, Bundle};
use tokio::net::ToSocketAddrs;
use tokio::sync::mpsc::{self, error::SendTimeoutError};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::client::Client;
use crate::error::{ClientError, Result};

/// Packets waiting for the send task.
pub const QUEUE_CAPACITY: usize = 1024;

/// Default time to wait for queue space, and for the task on `close`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug)]
enum Outgoing {
    Message(String, Vec<Arg>),
    Bundle(Bundle),
}

/// A [`Client`] driven by a background task.
///
/// `send` only enqueues, so callers never wait on the socket. Encoding
/// and send errors happen in the task and are logged there.
pub struct QueuedClient {
    tx: mpsc::Sender<Outgoing>,
    worker: JoinHandle<()>,
    timeout: Duration,
}

impl QueuedClient {
    pub async fn start(dest: impl ToSocketAddrs + fmt::Debug) -> Result<Self> {
        Self::start_with_timeout(dest, DEFAULT_TIMEOUT).await
    }

    pub async fn start_with_timeout(
        dest: impl ToSocketAddrs + fmt::Debug,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::connect(dest).await?;
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let worker = tokio::spawn(run_queue(client, rx));

        Ok(QueuedClient {
            tx,
            worker,
            timeout,
        })
    }

    /// Queue one message. Fails with [`ClientError::QueueFull`] if no
    /// slot frees up within the timeout.
    pub async fn send(&self, address: &str, args: Vec<Arg>) -> Result<()> {
        self.enqueue(Outgoing::Message(address.to_string(), args))
            .await
    }

    pub async fn send_bundle(&self, bundle: Bundle) -> Result<()> {
        self.enqueue(Outgoing::Bundle(bundle)).await
    }

    async fn enqueue(&self, item: Outgoing) -> Result<()> {
        self.tx
            .send_timeout(item, self.timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => ClientError::QueueFull,
                SendTimeoutError::Closed(_) => ClientError::Closed,
            })
    }

    /// Stop accepting packets, let the task send what is already queued
    /// and wait for it to finish. A task still running after the timeout
    /// is aborted, dropping whatever it had not sent yet.
    pub async fn close(self) -> Result<()> {
        let QueuedClient {
            tx,
            mut worker,
            timeout,
        } = self;
        drop(tx);

        debug!("Joining OSC send task...");
        match tokio::time::timeout(timeout, &mut worker).await {
            Ok(joined) => Ok(joined?),
            Err(_) => {
                warn!("OSC send task still running after {:?}, aborting", timeout);
                worker.abort();
                Err(ClientError::Timeout)
            }
        }
    }
}

async fn run_queue(client: Client, mut rx: mpsc::Receiver<Outgoing>) {
    while let Some(item) = rx.recv().await {
        debug!("Sending OSC packet {:?}", item);

        let sent = match item {
            Outgoing::Message(address, args) => client.send_args(&address, args).await,
            Outgoing::Bundle(bundle) => client.send_bundle(&bundle).await,
        };

        if let Err(e) = sent {
            error!("Failed to send OSC packet to {}: {}", client.dest(), e);
        }
    }

    debug!("OSC send queue closed");
}
