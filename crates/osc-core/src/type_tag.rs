//! OSC type tags.

use std::fmt;

/// A single OSC argument type tag.
///
/// On the wire each tag is one ASCII character in the type-tag string
/// that follows the address (`",ifs"` and so on).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `i`: 32-bit big-endian signed int.
    Int,
    /// `f`: 32-bit big-endian IEEE-754 float.
    Float,
    /// `h`: 64-bit big-endian signed int.
    Long,
    /// `d`: 64-bit big-endian IEEE-754 double.
    Double,
    /// `s`: NUL-terminated, 4-byte padded string.
    String,
    /// `S`: alternate string type ("symbol"), same layout as `s`.
    Symbol,
    /// `c`: character, sent as a 32-bit int holding the code point.
    Char,
    /// `b`: size-prefixed opaque blob.
    Blob,
    /// `m`: 4-byte MIDI message (port, status, data1, data2).
    Midi,
    /// `r`: 4-byte RGBA color.
    Rgba,
    /// `T`: true, no payload.
    True,
    /// `F`: false, no payload.
    False,
    /// `N`: nil, no payload.
    Nil,
    /// `I`: impulse ("bang"), no payload.
    Impulse,
    /// `t`: 64-bit NTP timetag.
    TimeTag,
}

impl TypeTag {
    /// Every supported tag, in the order they are documented.
    pub const ALL: [TypeTag; 15] = [
        TypeTag::Int,
        TypeTag::Float,
        TypeTag::Long,
        TypeTag::Double,
        TypeTag::String,
        TypeTag::Symbol,
        TypeTag::Char,
        TypeTag::Blob,
        TypeTag::Midi,
        TypeTag::Rgba,
        TypeTag::True,
        TypeTag::False,
        TypeTag::Nil,
        TypeTag::Impulse,
        TypeTag::TimeTag,
    ];

    /// The tag's character on the wire.
    pub fn as_char(self) -> char {
        match self {
            TypeTag::Int => 'i',
            TypeTag::Float => 'f',
            TypeTag::Long => 'h',
            TypeTag::Double => 'd',
            TypeTag::String => 's',
            TypeTag::Symbol => 'S',
            TypeTag::Char => 'c',
            TypeTag::Blob => 'b',
            TypeTag::Midi => 'm',
            TypeTag::Rgba => 'r',
            TypeTag::True => 'T',
            TypeTag::False => 'F',
            TypeTag::Nil => 'N',
            TypeTag::Impulse => 'I',
            TypeTag::TimeTag => 't',
        }
    }

    /// Parse a tag character (case-sensitive). Unknown tags give `None`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'i' => Some(TypeTag::Int),
            'f' => Some(TypeTag::Float),
            'h' => Some(TypeTag::Long),
            'd' => Some(TypeTag::Double),
            's' => Some(TypeTag::String),
            'S' => Some(TypeTag::Symbol),
            'c' => Some(TypeTag::Char),
            'b' => Some(TypeTag::Blob),
            'm' => Some(TypeTag::Midi),
            'r' => Some(TypeTag::Rgba),
            'T' => Some(TypeTag::True),
            'F' => Some(TypeTag::False),
            'N' => Some(TypeTag::Nil),
            'I' => Some(TypeTag::Impulse),
            't' => Some(TypeTag::TimeTag),
            _ => None,
        }
    }

    /// Tags that contribute only to the type-tag string, never to the
    /// argument payload.
    pub fn has_payload(self) -> bool {
        !matches!(
            self,
            TypeTag::True | TypeTag::False | TypeTag::Nil | TypeTag::Impulse
        )
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
