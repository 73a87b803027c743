//! Configuration for the OSC UDP server.
//!
//! Defaults can be overridden by a TOML file or by a few environment
//! variables:
//!
//! - `OSC_BIND_ADDR`    (default: "0.0.0.0")
//! - `OSC_PORT`         (default: "9001")
//! - `OSC_MAX_DATAGRAM` (default: "1472")
//! - `OSC_STRICT`       (default: "false")

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use osc_protocol::{CodecOptions, MAX_DATAGRAM_SIZE};
use serde::Deserialize;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9001;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// UDP port to listen on.
    pub port: u16,

    /// Largest datagram accepted; anything bigger is dropped.
    pub max_datagram_size: usize,

    /// Reject messages without a type-tag string instead of decoding
    /// them with no arguments.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            port: DEFAULT_PORT,
            max_datagram_size: MAX_DATAGRAM_SIZE,
            strict: false,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            bind_addr: env::var("OSC_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: read_env_or_default("OSC_PORT", defaults.port)?,
            max_datagram_size: read_env_or_default("OSC_MAX_DATAGRAM", defaults.max_datagram_size)?,
            strict: read_env_or_default("OSC_STRICT", defaults.strict)?,
        })
    }

    /// Load a TOML file; missing keys keep their defaults.
    ///
    /// ```toml
    /// bind_addr = "127.0.0.1"
    /// port = 9001
    /// strict = true
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            strict: self.strict,
        }
    }
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {}: {:?}", key, val)),
        Err(_) => Ok(default),
    }
}
