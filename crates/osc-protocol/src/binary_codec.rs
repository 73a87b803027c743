//! Binary encoding/decoding for OSC packets.
//!
//! This module converts between:
//! - raw binary packets (`&[u8]`)
//! - high-level `osc_core::Message` / `Bundle` values
//!
//! Layout:
//!
//! ```text
//! Message
//! -------
//! <address>     OSC string, starts with '/'
//! <type tags>   OSC string, ',' followed by one char per argument
//! <arguments>   back to back, each 4-byte aligned:
//!
//!   i  int32 BE                  f  float32 BE
//!   h  int64 BE                  d  float64 BE
//!   s  OSC string                S  OSC string
//!   c  code point as u32 BE      b  u32 BE size, bytes, NUL padding
//!   m  4 raw bytes               r  4 raw bytes
//!   t  u32 BE seconds, u32 BE fraction
//!   T F N I  no payload
//!
//! OSC string: bytes, one NUL, NUL padding to a multiple of 4.
//!
//! Bundle
//! ------
//! [0..8]    "#bundle\0"
//! [8..16]   timetag
//! [16..]    repeated: u32 BE element size, element (message or bundle)
//! ```
//!
//! NOTE: This module encodes/decodes **one packet per buffer**. Datagram
//! size limits belong to the transport.

use osc_core::{
    check_address, Arg, Bundle, BundleElement, Message, OscError, OscValue, TimeTag, TypeTag,
};
use thiserror::Error;
use tracing::warn;

use crate::wire_types::{
    pack_blob, pack_string, pack_timetag, padded_len, BUNDLE_TAG, MAX_BUNDLE_DEPTH,
};

/// Errors that can arise when encoding/decoding a packet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Address missing its leading slash.
    #[error("invalid OSC address: {0}")]
    Address(String),

    /// Unsupported value / tag combination.
    #[error("cannot encode OSC value: {0}")]
    Encode(String),

    /// Truncated buffer, unknown type tag, missing type-tag string or
    /// missing bundle header.
    #[error("cannot decode OSC packet: {0}")]
    Decode(String),
}

impl From<OscError> for ProtocolError {
    fn from(e: OscError) -> Self {
        match e {
            OscError::Address(msg) | OscError::Pattern(msg) => ProtocolError::Address(msg),
            OscError::Encode(msg) => ProtocolError::Encode(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Strict or lenient handling of the two soft spots of the format.
///
/// Strict (the default):
/// - encoding rejects strings that are not plain ASCII;
/// - decoding rejects a message without a type-tag string.
///
/// Lenient:
/// - strings are sent as UTF-8;
/// - a message without type-tag string is logged and decoded with no
///   arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    pub strict: bool,
}

impl CodecOptions {
    pub fn strict() -> Self {
        CodecOptions { strict: true }
    }

    pub fn lenient() -> Self {
        CodecOptions { strict: false }
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        CodecOptions::strict()
    }
}

// ============================================================================
// ENCODE
// ============================================================================

/// Encode a message from an address and encoder arguments.
///
/// Each argument is either inferred from its native type or carries a
/// forced tag, see [`osc_core::Arg`].
pub fn encode_message(address: &str, args: impl IntoIterator<Item = Arg>) -> Result<Vec<u8>> {
    encode_message_with(address, args, CodecOptions::default())
}

pub fn encode_message_with(
    address: &str,
    args: impl IntoIterator<Item = Arg>,
    options: CodecOptions,
) -> Result<Vec<u8>> {
    check_address(address)?;
    let values = args
        .into_iter()
        .map(Arg::into_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut out = Vec::with_capacity(64);
    write_message(address, &values, options, &mut out)?;
    Ok(out)
}

/// Encode an already typed message.
pub fn encode_message_value(msg: &Message) -> Result<Vec<u8>> {
    encode_message_value_with(msg, CodecOptions::default())
}

pub fn encode_message_value_with(msg: &Message, options: CodecOptions) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(64);
    write_message(&msg.address, &msg.args, options, &mut out)?;
    Ok(out)
}

/// Encode a bundle, recursing into nested bundles.
///
/// Every element is prefixed with its size as a big-endian u32.
pub fn encode_bundle(bundle: &Bundle) -> Result<Vec<u8>> {
    encode_bundle_with(bundle, CodecOptions::default())
}

pub fn encode_bundle_with(bundle: &Bundle, options: CodecOptions) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    write_bundle(bundle, options, &mut out)?;
    Ok(out)
}

fn write_bundle(bundle: &Bundle, options: CodecOptions, out: &mut Vec<u8>) -> Result<()> {
    out.extend_from_slice(BUNDLE_TAG);
    pack_timetag(&bundle.timetag, out);

    for element in &bundle.elements {
        // Reserve the size prefix, write the element, then backfill.
        let start = out.len();
        out.extend_from_slice(&[0, 0, 0, 0]);

        match element {
            BundleElement::Message(m) => write_message(&m.address, &m.args, options, out)?,
            BundleElement::Bundle(b) => write_bundle(b, options, out)?,
            BundleElement::Raw(raw) => out.extend_from_slice(raw),
            BundleElement::Shorthand(address, args) => {
                let msg = Message::from_args(address.as_str(), args.clone())?;
                write_message(&msg.address, &msg.args, options, out)?;
            }
        }

        let size = u32::try_from(out.len() - start - 4)
            .map_err(|_| ProtocolError::Encode("bundle element too large".to_string()))?;
        out[start..start + 4].copy_from_slice(&size.to_be_bytes());
    }

    Ok(())
}

fn write_message(
    address: &str,
    args: &[OscValue],
    options: CodecOptions,
    out: &mut Vec<u8>,
) -> Result<()> {
    check_address(address)?;
    check_str(address, options)?;
    pack_string(address.as_bytes(), out);

    let mut tags = String::with_capacity(args.len() + 1);
    tags.push(',');
    tags.extend(args.iter().map(|a| a.tag().as_char()));
    pack_string(tags.as_bytes(), out);

    for arg in args {
        write_value(arg, options, out)?;
    }

    Ok(())
}

fn write_value(value: &OscValue, options: CodecOptions, out: &mut Vec<u8>) -> Result<()> {
    match value {
        OscValue::Int(n) => out.extend_from_slice(&n.to_be_bytes()),
        OscValue::Float(x) => out.extend_from_slice(&x.to_be_bytes()),
        OscValue::Long(n) => out.extend_from_slice(&n.to_be_bytes()),
        OscValue::Double(x) => out.extend_from_slice(&x.to_be_bytes()),
        OscValue::String(s) | OscValue::Symbol(s) => {
            check_str(s, options)?;
            pack_string(s.as_bytes(), out);
        }
        OscValue::Char(c) => {
            if options.strict && !c.is_ascii() {
                return Err(ProtocolError::Encode(format!(
                    "non-ASCII character {:?}",
                    c
                )));
            }
            out.extend_from_slice(&(*c as u32).to_be_bytes());
        }
        OscValue::Blob(b) => {
            if u32::try_from(b.len()).is_err() {
                return Err(ProtocolError::Encode(format!(
                    "blob of {} bytes is too large",
                    b.len()
                )));
            }
            pack_blob(b, out);
        }
        OscValue::Midi(quad) | OscValue::Rgba(quad) => out.extend_from_slice(quad),
        OscValue::TimeTag(t) => pack_timetag(t, out),
        OscValue::Bool(_) | OscValue::Nil | OscValue::Impulse => {}
    }

    Ok(())
}

/// OSC strings are NUL-terminated, so they can't contain NUL; in strict
/// mode they must also be ASCII.
fn check_str(s: &str, options: CodecOptions) -> Result<()> {
    if s.contains('\0') {
        return Err(ProtocolError::Encode(format!(
            "string contains a NUL byte: {:?}",
            s
        )));
    }
    if options.strict && !s.is_ascii() {
        return Err(ProtocolError::Encode(format!(
            "OSC strings may only contain ASCII characters: {:?}",
            s
        )));
    }
    Ok(())
}

// ============================================================================
// DECODE
// ============================================================================

/// Decode a single message.
///
/// The address must start with `/` ([`ProtocolError::Address`]).
/// Arguments are returned typed; [`Message::typetags`] gives the tag
/// string back.
pub fn decode_message(buf: &[u8]) -> Result<Message> {
    decode_message_with(buf, CodecOptions::default())
}

pub fn decode_message_with(buf: &[u8], options: CodecOptions) -> Result<Message> {
    let mut reader = Reader::new(buf);

    let address = reader.read_string()?.to_string();
    if !address.starts_with('/') {
        return Err(ProtocolError::Address(format!(
            "address must start with '/': {:?}",
            address
        )));
    }

    let tags = if reader.peek() == Some(b',') {
        &reader.read_string()?[1..]
    } else if options.strict {
        return Err(ProtocolError::Decode(format!(
            "missing type tag string after {:?}",
            address
        )));
    } else {
        warn!(%address, "missing/invalid OSC type tag string, ignoring arguments");
        ""
    };

    let mut args = Vec::with_capacity(tags.len());
    for c in tags.chars() {
        let tag = TypeTag::from_char(c)
            .ok_or_else(|| ProtocolError::Decode(format!("type tag '{}' not supported", c)))?;
        args.push(reader.read_value(tag)?);
    }

    Ok(Message { address, args })
}

/// Start decoding a bundle.
///
/// Fails right away unless the buffer starts with a complete bundle
/// header. The returned iterator walks the bundle depth first and yields
/// each message paired with the timetag of the bundle directly containing
/// it. It makes a single pass over the buffer.
pub fn decode_bundle(buf: &[u8]) -> Result<BundleIter<'_>> {
    decode_bundle_with(buf, CodecOptions::default())
}

pub fn decode_bundle_with(buf: &[u8], options: CodecOptions) -> Result<BundleIter<'_>> {
    let (timetag, rest) = split_bundle_header(buf)?;
    Ok(BundleIter {
        stack: vec![Frame { timetag, rest }],
        options,
        failed: false,
    })
}

fn split_bundle_header(buf: &[u8]) -> Result<(TimeTag, &[u8])> {
    if !buf.starts_with(BUNDLE_TAG) {
        return Err(ProtocolError::Decode(
            "bundle must start with \"#bundle\\0\"".to_string(),
        ));
    }
    if buf.len() < 16 {
        return Err(ProtocolError::Decode("bundle timetag truncated".to_string()));
    }

    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[8..16]);
    Ok((TimeTag::from_be_bytes(raw), &buf[16..]))
}

/// Depth-first iterator over the messages of an encoded bundle.
///
/// Nested bundles are tracked on an explicit stack (at most
/// [`MAX_BUNDLE_DEPTH`] deep). A message that fails to decode is yielded
/// as an error and iteration carries on with the next element; a broken
/// element size or nesting error is yielded once and ends the iteration.
#[derive(Debug)]
pub struct BundleIter<'a> {
    stack: Vec<Frame<'a>>,
    options: CodecOptions,
    failed: bool,
}

#[derive(Debug)]
struct Frame<'a> {
    timetag: TimeTag,
    rest: &'a [u8],
}

impl<'a> BundleIter<'a> {
    fn fail(&mut self, msg: String) -> Option<Result<(TimeTag, Message)>> {
        self.failed = true;
        self.stack.clear();
        Some(Err(ProtocolError::Decode(msg)))
    }
}

impl<'a> Iterator for BundleIter<'a> {
    type Item = Result<(TimeTag, Message)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }

            let depth = self.stack.len();
            let frame = self.stack.last_mut()?;
            if frame.rest.is_empty() {
                self.stack.pop();
                continue;
            }

            let rest = frame.rest;
            if rest.len() < 4 {
                return self.fail("truncated bundle element size".to_string());
            }
            let size = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
            if size > rest.len() - 4 {
                return self.fail(format!(
                    "bundle element of {} bytes overruns the {} bytes left",
                    size,
                    rest.len() - 4
                ));
            }

            let element = &rest[4..4 + size];
            frame.rest = &rest[4 + size..];
            let timetag = frame.timetag;

            if element.starts_with(b"#bundle") {
                if depth >= MAX_BUNDLE_DEPTH {
                    return self.fail(format!(
                        "bundles nested deeper than {}",
                        MAX_BUNDLE_DEPTH
                    ));
                }
                match split_bundle_header(element) {
                    Ok((timetag, rest)) => self.stack.push(Frame { timetag, rest }),
                    Err(e) => return self.fail(format!("nested bundle: {}", e)),
                }
                continue;
            }

            return Some(decode_message_with(element, self.options).map(|m| (timetag, m)));
        }
    }
}

/// A decoded datagram: either one message or a bundle to walk.
#[derive(Debug)]
pub enum Packet<'a> {
    Message(Message),
    Bundle(BundleIter<'a>),
}

impl<'a> Packet<'a> {
    /// Flatten into `(timetag, message)` pairs in wire order.
    ///
    /// A bare message has no timetag (`None`, i.e. "immediately").
    /// Per-element bundle errors are kept in place.
    pub fn into_messages(self) -> Vec<Result<(Option<TimeTag>, Message)>> {
        match self {
            Packet::Message(m) => vec![Ok((None, m))],
            Packet::Bundle(iter) => iter.map(|r| r.map(|(t, m)| (Some(t), m))).collect(),
        }
    }
}

/// Classify and decode a datagram by its first bytes.
pub fn decode_packet(buf: &[u8], options: CodecOptions) -> Result<Packet<'_>> {
    if buf.starts_with(b"/") {
        decode_message_with(buf, options).map(Packet::Message)
    } else if buf.starts_with(b"#bundle") {
        decode_bundle_with(buf, options).map(Packet::Bundle)
    } else {
        Err(ProtocolError::Decode(
            "datagram is neither an OSC message nor a bundle".to_string(),
        ))
    }
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

struct Reader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, offset: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.buf.get(self.offset).copied()
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let end = self.offset.checked_add(n).filter(|&end| end <= self.buf.len());
        match end {
            Some(end) => {
                let buf = self.buf;
                let bytes = &buf[self.offset..end];
                self.offset = end;
                Ok(bytes)
            }
            None => Err(ProtocolError::Decode(format!(
                "{} truncated at offset {} ({} bytes needed, {} left)",
                what,
                self.offset,
                n,
                self.buf.len() - self.offset
            ))),
        }
    }

    fn take_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, what)?);
        Ok(out)
    }

    fn read_string(&mut self) -> Result<&'a str> {
        let rest = &self.buf[self.offset..];
        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| ProtocolError::Decode("unterminated OSC string".to_string()))?;

        let raw = self.take(padded_len(nul + 1), "string padding")?;
        std::str::from_utf8(&raw[..nul])
            .map_err(|_| ProtocolError::Decode("OSC string is not valid UTF-8".to_string()))
    }

    fn read_value(&mut self, tag: TypeTag) -> Result<OscValue> {
        let value = match tag {
            TypeTag::Int => OscValue::Int(i32::from_be_bytes(self.take_array("'i' argument")?)),
            TypeTag::Float => {
                OscValue::Float(f32::from_be_bytes(self.take_array("'f' argument")?))
            }
            TypeTag::Long => OscValue::Long(i64::from_be_bytes(self.take_array("'h' argument")?)),
            TypeTag::Double => {
                OscValue::Double(f64::from_be_bytes(self.take_array("'d' argument")?))
            }
            TypeTag::String => OscValue::String(self.read_string()?.to_string()),
            TypeTag::Symbol => OscValue::Symbol(self.read_string()?.to_string()),
            TypeTag::Char => {
                let code = u32::from_be_bytes(self.take_array("'c' argument")?);
                let c = char::from_u32(code).ok_or_else(|| {
                    ProtocolError::Decode(format!("invalid character code {:#x}", code))
                })?;
                OscValue::Char(c)
            }
            TypeTag::Blob => {
                let size = u32::from_be_bytes(self.take_array("blob size")?) as usize;
                let padded = self.take(padded_len(size), "blob")?;
                OscValue::Blob(padded[..size].to_vec())
            }
            TypeTag::Midi => OscValue::Midi(self.take_array("'m' argument")?),
            TypeTag::Rgba => OscValue::Rgba(self.take_array("'r' argument")?),
            TypeTag::True => OscValue::Bool(true),
            TypeTag::False => OscValue::Bool(false),
            TypeTag::Nil => OscValue::Nil,
            TypeTag::Impulse => OscValue::Impulse,
            TypeTag::TimeTag => OscValue::TimeTag(TimeTag::from_be_bytes(
                self.take_array("'t' argument")?,
            )),
        };

        Ok(value)
    }
}
