//! osc-protocol
//!
//! Wire-level encoding/decoding for Open Sound Control.
//!
//! This crate is responsible for turning logical OSC packets
//! (`osc_core::Message` / `Bundle`) into bytes and back again.
//!
//! - [`binary_codec`] : message and bundle codec
//! - [`wire_types`]   : constants and padding helpers

pub mod wire_types;
pub mod binary_codec;

pub use binary_codec::{
    CodecOptions,
    BundleIter,
    Packet,
    ProtocolError,
    decode_bundle,
    decode_bundle_with,
    decode_message,
    decode_message_with,
    decode_packet,
    encode_bundle,
    encode_bundle_with,
    encode_message,
    encode_message_with,
    encode_message_value,
    encode_message_value_with,
};

pub use wire_types::{MAX_BUNDLE_DEPTH, MAX_DATAGRAM_SIZE};
