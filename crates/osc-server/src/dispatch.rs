//! Per-datagram dispatch.
//!
//! Decodes one datagram, matches every message it carries against the
//! address space and invokes the matched handlers.
//!
//! Failure policy:
//! - undecodable datagram: logged, nothing dispatched;
//! - undecodable bundle element: logged, the other elements still run;
//! - handler returning `Err` or panicking: logged, sibling handlers and
//!   messages still run.

use std::any::Any;
use std::net::SocketAddr;
use std::panic::{catch_unwind, AssertUnwindSafe};

use osc_core::AddressSpace;
use osc_protocol::{decode_packet, CodecOptions};
use tracing::{debug, error, warn};

use crate::types::{Handler, Request};

/// Counters for one datagram, mostly useful to tests and debug logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Messages decoded from the datagram.
    pub messages: usize,
    /// Handlers that returned `Ok`.
    pub handled: usize,
    /// Handlers that returned `Err` or panicked.
    pub failed: usize,
    /// Messages or bundle elements that failed to decode.
    pub malformed: usize,
}

/// Decode `data` and run every matching handler.
pub fn handle_datagram(
    space: &AddressSpace<Handler>,
    data: &[u8],
    source: SocketAddr,
    options: CodecOptions,
) -> DispatchStats {
    let mut stats = DispatchStats::default();

    let packet = match decode_packet(data, options) {
        Ok(packet) => packet,
        Err(e) => {
            debug!(%source, len = data.len(), "could not parse datagram: {}", e);
            stats.malformed += 1;
            return stats;
        }
    };

    for decoded in packet.into_messages() {
        let (timetag, message) = match decoded {
            Ok(pair) => pair,
            Err(e) => {
                warn!(%source, "skipping bundle element: {}", e);
                stats.malformed += 1;
                continue;
            }
        };
        stats.messages += 1;

        let typetags = message.typetags();
        debug!(
            %source,
            address = %message.address,
            typetags = %typetags,
            args = ?message.args,
            "OSC message"
        );

        let methods = match space.match_pattern(&message.address, Some(&typetags)) {
            Ok(methods) => methods,
            Err(e) => {
                warn!(%source, address = %message.address, "bad address pattern: {}", e);
                stats.malformed += 1;
                continue;
            }
        };

        if methods.is_empty() {
            debug!(address = %message.address, "no method matched");
            continue;
        }

        let request = Request {
            timetag,
            message,
            source,
        };

        for method in methods {
            match catch_unwind(AssertUnwindSafe(|| (method.handler())(&request))) {
                Ok(Ok(())) => stats.handled += 1,
                Ok(Err(e)) => {
                    error!(method = method.address(), "exception in OSC handler: {:#}", e);
                    stats.failed += 1;
                }
                Err(payload) => {
                    error!(
                        method = method.address(),
                        "OSC handler panicked: {}",
                        panic_message(payload.as_ref())
                    );
                    stats.failed += 1;
                }
            }
        }
    }

    stats
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
