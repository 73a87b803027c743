//! Low-level wire constants and padding helpers.
//!
//! This module defines:
//! - the bundle header and size limits,
//! - 4-byte alignment helpers,
//! - packers for the OSC string, blob and timetag layouts.
//!
//! The actual message / bundle encode/decode logic lives in `binary_codec`.

use osc_core::TimeTag;

/// Every bundle starts with this 8-byte header.
pub const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// Recommended maximum UDP payload: Ethernet MTU minus IP/UDP headers.
///
/// Enforced by transports, not by the codec.
pub const MAX_DATAGRAM_SIZE: usize = 1472;

/// Deepest bundle nesting `decode_bundle` will follow.
pub const MAX_BUNDLE_DEPTH: usize = 32;

/// Length of `len` bytes rounded up to a multiple of 4.
pub fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// Append `s` as an OSC string: the bytes, one NUL, then NULs up to a
/// multiple of 4. An empty string still takes 4 bytes.
pub fn pack_string(s: &[u8], out: &mut Vec<u8>) {
    let total = padded_len(s.len() + 1);
    out.extend_from_slice(s);
    out.resize(out.len() + total - s.len(), 0);
}

/// Append `b` as an OSC blob: big-endian u32 size, the bytes, then NULs
/// up to a multiple of 4 (the size prefix itself is never padded).
pub fn pack_blob(b: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&(b.len() as u32).to_be_bytes());
    out.extend_from_slice(b);
    out.resize(out.len() + padded_len(b.len()) - b.len(), 0);
}

/// Append the 8 timetag bytes (seconds, fraction; both big-endian).
pub fn pack_timetag(t: &TimeTag, out: &mut Vec<u8>) {
    out.extend_from_slice(&t.to_be_bytes());
}
