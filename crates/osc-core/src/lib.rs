//! osc-core
//!
//! Open Sound Control data model and dispatching, with no I/O:
//! - type tags, argument values and NTP timetags
//! - messages and (nested) bundles
//! - the address space: a tree of methods matched by address pattern

pub mod type_tag;
pub mod time_tag;
pub mod value;
pub mod message;
pub mod pattern;
pub mod address_space;
pub mod error;

pub use type_tag::TypeTag;
pub use time_tag::{TimeTag, NTP_DELTA};

pub use value::{
    Arg,
    Native,
    OscValue,
};

pub use message::{
    check_address,
    Bundle,
    BundleElement,
    Message,
};

pub use address_space::{AddressSpace, MatchOptions, Method, TYPETAGS_ANY};
pub use error::{OscError, Result};
