//! OSC argument values.
//!
//! [`OscValue`] is the typed representation, one variant per wire
//! type. Values can also be built from loosely typed [`Native`] input,
//! either letting the tag be inferred ([`OscValue::from_native`]) or
//! forcing a tag ([`OscValue::coerce`]). [`Arg`] carries either form to
//! the encoder.

use crate::error::{OscError, Result};
use crate::time_tag::TimeTag;
use crate::type_tag::TypeTag;

/// A typed OSC argument.
#[derive(Debug, Clone, PartialEq)]
pub enum OscValue {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    String(String),
    Symbol(String),
    Char(char),
    Blob(Vec<u8>),
    Midi([u8; 4]),
    Rgba([u8; 4]),
    /// `T` or `F`.
    Bool(bool),
    Nil,
    Impulse,
    TimeTag(TimeTag),
}

impl OscValue {
    /// The tag this value is sent with.
    pub fn tag(&self) -> TypeTag {
        match self {
            OscValue::Int(_) => TypeTag::Int,
            OscValue::Float(_) => TypeTag::Float,
            OscValue::Long(_) => TypeTag::Long,
            OscValue::Double(_) => TypeTag::Double,
            OscValue::String(_) => TypeTag::String,
            OscValue::Symbol(_) => TypeTag::Symbol,
            OscValue::Char(_) => TypeTag::Char,
            OscValue::Blob(_) => TypeTag::Blob,
            OscValue::Midi(_) => TypeTag::Midi,
            OscValue::Rgba(_) => TypeTag::Rgba,
            OscValue::Bool(true) => TypeTag::True,
            OscValue::Bool(false) => TypeTag::False,
            OscValue::Nil => TypeTag::Nil,
            OscValue::Impulse => TypeTag::Impulse,
            OscValue::TimeTag(_) => TypeTag::TimeTag,
        }
    }

    /// Infer the tag from the native type:
    ///
    /// | native   | tag      |
    /// |----------|----------|
    /// | integer  | `i`      |
    /// | float    | `f`      |
    /// | string   | `s`      |
    /// | bytes    | `b`      |
    /// | bool     | `T`/`F`  |
    /// | none     | `N`      |
    ///
    /// Integers outside the `i32` range and integer sequences have no
    /// inferred tag; pass them through [`OscValue::coerce`] instead.
    pub fn from_native(native: Native) -> Result<OscValue> {
        match native {
            Native::Int(n) => int32(n).map(OscValue::Int),
            Native::Float(x) => float32(x).map(OscValue::Float),
            Native::Str(s) => Ok(OscValue::String(s)),
            Native::Bytes(b) => Ok(OscValue::Blob(b)),
            Native::Bool(b) => Ok(OscValue::Bool(b)),
            Native::None => Ok(OscValue::Nil),
            Native::Ints(_) => Err(OscError::Encode(
                "no type tag can be inferred for an integer sequence".to_string(),
            )),
        }
    }

    /// Convert a native value to the given tag.
    ///
    /// Fails with [`OscError::Encode`] when the pairing makes no sense,
    /// e.g. a float for `i` or anything but 4 bytes for `m`.
    pub fn coerce(tag: TypeTag, native: Native) -> Result<OscValue> {
        match (tag, native) {
            (TypeTag::Int, Native::Int(n)) => int32(n).map(OscValue::Int),
            (TypeTag::Float, Native::Float(x)) => float32(x).map(OscValue::Float),
            (TypeTag::Float, Native::Int(n)) => Ok(OscValue::Float(n as f32)),
            (TypeTag::Double, Native::Float(x)) => Ok(OscValue::Double(x)),
            (TypeTag::Double, Native::Int(n)) => Ok(OscValue::Double(n as f64)),
            (TypeTag::Long, Native::Int(n)) => Ok(OscValue::Long(n)),
            (TypeTag::String, Native::Str(s)) => Ok(OscValue::String(s)),
            (TypeTag::Symbol, Native::Str(s)) => Ok(OscValue::Symbol(s)),
            (TypeTag::Char, Native::Str(s)) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(OscValue::Char(c)),
                    _ => Err(OscError::Encode(format!(
                        "'c' needs exactly one character, got {:?}",
                        s
                    ))),
                }
            }
            (TypeTag::Blob, Native::Bytes(b)) => Ok(OscValue::Blob(b)),
            (TypeTag::Blob, Native::Str(s)) => Ok(OscValue::Blob(s.into_bytes())),
            (TypeTag::Blob, Native::Ints(v)) => byte_seq(&v).map(OscValue::Blob),
            (TypeTag::Midi, native) => quad(tag, native).map(OscValue::Midi),
            (TypeTag::Rgba, native) => quad(tag, native).map(OscValue::Rgba),
            (TypeTag::TimeTag, Native::Float(x)) => Ok(OscValue::TimeTag(TimeTag::from_secs_f64(x))),
            (TypeTag::TimeTag, Native::Int(n)) => {
                Ok(OscValue::TimeTag(TimeTag::from_secs_f64(n as f64)))
            }
            // Payload-less tags ignore whatever value came with them.
            (TypeTag::True, _) => Ok(OscValue::Bool(true)),
            (TypeTag::False, _) => Ok(OscValue::Bool(false)),
            (TypeTag::Nil, _) => Ok(OscValue::Nil),
            (TypeTag::Impulse, _) => Ok(OscValue::Impulse),
            (tag, native) => Err(OscError::Encode(format!(
                "type tag '{}' cannot carry {}",
                tag,
                native.kind()
            ))),
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            OscValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            OscValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// String contents of `s` and `S` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscValue::String(s) | OscValue::Symbol(s) => Some(s),
            _ => None,
        }
    }
}

fn int32(n: i64) -> Result<i32> {
    i32::try_from(n)
        .map_err(|_| OscError::Encode(format!("integer {} does not fit type tag 'i'", n)))
}

/// Narrow to `f32`. NaN and infinities pass through; finite values
/// beyond the `f32` range are an error rather than a silent `inf`.
fn float32(x: f64) -> Result<f32> {
    let narrowed = x as f32;
    if x.is_finite() && !narrowed.is_finite() {
        return Err(OscError::Encode(format!(
            "float {} is out of range for type tag 'f'",
            x
        )));
    }
    Ok(narrowed)
}

fn byte_seq(ints: &[i64]) -> Result<Vec<u8>> {
    ints.iter()
        .map(|&n| {
            u8::try_from(n)
                .map_err(|_| OscError::Encode(format!("byte value {} out of range 0..=255", n)))
        })
        .collect()
}

fn quad(tag: TypeTag, native: Native) -> Result<[u8; 4]> {
    let bytes = match native {
        Native::Bytes(b) => b,
        Native::Ints(v) => byte_seq(&v)?,
        other => {
            return Err(OscError::Encode(format!(
                "type tag '{}' needs 4 bytes or 4 integers, got {}",
                tag,
                other.kind()
            )))
        }
    };

    <[u8; 4]>::try_from(bytes.as_slice()).map_err(|_| {
        OscError::Encode(format!(
            "type tag '{}' needs exactly 4 bytes, got {}",
            tag,
            bytes.len()
        ))
    })
}

impl From<i32> for OscValue {
    fn from(v: i32) -> Self {
        OscValue::Int(v)
    }
}

impl From<f32> for OscValue {
    fn from(v: f32) -> Self {
        OscValue::Float(v)
    }
}

impl From<i64> for OscValue {
    fn from(v: i64) -> Self {
        OscValue::Long(v)
    }
}

impl From<f64> for OscValue {
    fn from(v: f64) -> Self {
        OscValue::Double(v)
    }
}

impl From<&str> for OscValue {
    fn from(v: &str) -> Self {
        OscValue::String(v.to_string())
    }
}

impl From<String> for OscValue {
    fn from(v: String) -> Self {
        OscValue::String(v)
    }
}

impl From<Vec<u8>> for OscValue {
    fn from(v: Vec<u8>) -> Self {
        OscValue::Blob(v)
    }
}

impl From<bool> for OscValue {
    fn from(v: bool) -> Self {
        OscValue::Bool(v)
    }
}

impl From<char> for OscValue {
    fn from(v: char) -> Self {
        OscValue::Char(v)
    }
}

impl From<TimeTag> for OscValue {
    fn from(v: TimeTag) -> Self {
        OscValue::TimeTag(v)
    }
}

/// Loosely typed input for [`OscValue::from_native`] / [`OscValue::coerce`].
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Bool(bool),
    /// A sequence of small integers (MIDI / RGBA quads, blobs).
    Ints(Vec<i64>),
    None,
}

impl Native {
    fn kind(&self) -> &'static str {
        match self {
            Native::Int(_) => "an integer",
            Native::Float(_) => "a float",
            Native::Str(_) => "a string",
            Native::Bytes(_) => "bytes",
            Native::Bool(_) => "a bool",
            Native::Ints(_) => "an integer sequence",
            Native::None => "nothing",
        }
    }
}

impl From<i32> for Native {
    fn from(v: i32) -> Self {
        Native::Int(v as i64)
    }
}

impl From<i64> for Native {
    fn from(v: i64) -> Self {
        Native::Int(v)
    }
}

impl From<f32> for Native {
    fn from(v: f32) -> Self {
        Native::Float(v as f64)
    }
}

impl From<f64> for Native {
    fn from(v: f64) -> Self {
        Native::Float(v)
    }
}

impl From<&str> for Native {
    fn from(v: &str) -> Self {
        Native::Str(v.to_string())
    }
}

impl From<String> for Native {
    fn from(v: String) -> Self {
        Native::Str(v)
    }
}

impl From<Vec<u8>> for Native {
    fn from(v: Vec<u8>) -> Self {
        Native::Bytes(v)
    }
}

impl From<&[u8]> for Native {
    fn from(v: &[u8]) -> Self {
        Native::Bytes(v.to_vec())
    }
}

impl From<bool> for Native {
    fn from(v: bool) -> Self {
        Native::Bool(v)
    }
}

impl From<Vec<i64>> for Native {
    fn from(v: Vec<i64>) -> Self {
        Native::Ints(v)
    }
}

impl<T: Into<Native>> From<Option<T>> for Native {
    fn from(v: Option<T>) -> Self {
        v.map_or(Native::None, Into::into)
    }
}

/// One argument handed to the message encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Tag inferred from the native type.
    Inferred(Native),
    /// Tag forced by the caller.
    Tagged(TypeTag, Native),
    /// Already typed.
    Value(OscValue),
}

impl Arg {
    pub fn infer(v: impl Into<Native>) -> Self {
        Arg::Inferred(v.into())
    }

    pub fn tagged(tag: TypeTag, v: impl Into<Native>) -> Self {
        Arg::Tagged(tag, v.into())
    }

    /// Resolve to a typed value.
    pub fn into_value(self) -> Result<OscValue> {
        match self {
            Arg::Inferred(native) => OscValue::from_native(native),
            Arg::Tagged(tag, native) => OscValue::coerce(tag, native),
            Arg::Value(value) => Ok(value),
        }
    }
}

impl From<OscValue> for Arg {
    fn from(v: OscValue) -> Self {
        Arg::Value(v)
    }
}
