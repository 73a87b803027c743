//! OSC messages and bundles.
//!
//! These are **transport-agnostic** logical packets. Binary encoders
//! live in the `osc-protocol` crate; this module is purely logical.

use crate::error::{OscError, Result};
use crate::time_tag::TimeTag;
use crate::value::{Arg, OscValue};

/// A single OSC message: an address (pattern) and typed arguments.
///
/// The type-tag string is derived from the arguments, so it always has
/// exactly one tag per argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub address: String,
    pub args: Vec<OscValue>,
}

impl Message {
    pub fn new(address: impl Into<String>) -> Self {
        Message {
            address: address.into(),
            args: Vec::new(),
        }
    }

    /// Build a message from encoder arguments, resolving each tag.
    ///
    /// The address must start with `/`.
    pub fn from_args(address: impl Into<String>, args: Vec<Arg>) -> Result<Self> {
        let address = address.into();
        check_address(&address)?;

        let args = args
            .into_iter()
            .map(Arg::into_value)
            .collect::<Result<Vec<_>>>()?;

        Ok(Message { address, args })
    }

    pub fn with_arg(mut self, value: impl Into<OscValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Type tags without the leading comma, e.g. `"ifs"`.
    pub fn typetags(&self) -> String {
        self.args.iter().map(|a| a.tag().as_char()).collect()
    }
}

/// Fail with [`OscError::Address`] unless `address` starts with a slash.
pub fn check_address(address: &str) -> Result<()> {
    if address.starts_with('/') {
        Ok(())
    } else {
        Err(OscError::Address(format!(
            "address must start with '/': {:?}",
            address
        )))
    }
}

/// A timestamped group of messages and nested bundles.
///
/// The timetag applies to the messages directly inside this bundle.
/// Nested bundles carry their own timetag.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    pub timetag: TimeTag,
    pub elements: Vec<BundleElement>,
}

/// One element of a bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum BundleElement {
    Message(Message),
    Bundle(Bundle),
    /// Pre-encoded message or bundle bytes, passed through unchanged.
    Raw(Vec<u8>),
    /// `(address, args)` shorthand, resolved when the bundle is encoded.
    Shorthand(String, Vec<Arg>),
}

impl Bundle {
    pub fn new(timetag: TimeTag) -> Self {
        Bundle {
            timetag,
            elements: Vec::new(),
        }
    }

    /// A bundle stamped with the current wall-clock time.
    pub fn now() -> Self {
        Bundle::new(TimeTag::now())
    }

    pub fn add(&mut self, element: impl Into<BundleElement>) -> &mut Self {
        self.elements.push(element.into());
        self
    }

    pub fn with(mut self, element: impl Into<BundleElement>) -> Self {
        self.elements.push(element.into());
        self
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Depth-first, pre-order walk over the typed messages, each paired
    /// with the timetag of the bundle that directly contains it.
    ///
    /// `Raw` and `Shorthand` elements are not visited.
    pub fn messages(&self) -> Vec<(TimeTag, &Message)> {
        let mut out = Vec::new();
        self.collect_messages(&mut out);
        out
    }

    fn collect_messages<'a>(&'a self, out: &mut Vec<(TimeTag, &'a Message)>) {
        for element in &self.elements {
            match element {
                BundleElement::Message(m) => out.push((self.timetag, m)),
                BundleElement::Bundle(b) => b.collect_messages(out),
                BundleElement::Raw(_) | BundleElement::Shorthand(..) => {}
            }
        }
    }
}

impl From<Message> for BundleElement {
    fn from(m: Message) -> Self {
        BundleElement::Message(m)
    }
}

impl From<Bundle> for BundleElement {
    fn from(b: Bundle) -> Self {
        BundleElement::Bundle(b)
    }
}

impl From<Vec<u8>> for BundleElement {
    fn from(raw: Vec<u8>) -> Self {
        BundleElement::Raw(raw)
    }
}
