//! Session configuration.
//!
//! Every field has a default matching the classic behavior, so an empty
//! file (or no file at all) gives a 2 KB output buffer, a 1 KB `printf`
//! scratch area, and a 0.1 s read timeout on stdout's terminal.
//!
//! # File format
//!
//! ```toml
//! # Bytes allocated for the output buffer at initialize.
//! initial_capacity = 2048
//!
//! # Size of the printf scratch buffer. At most format_limit - 1 bytes
//! # of any single printf call reach the output.
//! format_limit = 1024
//!
//! # Raw-mode read behavior: VMIN and VTIME (tenths of a second).
//! read_min = 0
//! read_timeout_ds = 1
//!
//! # File descriptor of the terminal device.
//! fd = 1
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunables for a [`Session`](crate::session::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output buffer capacity allocated by `initialize`.
    pub initial_capacity: usize,
    /// Size of the bounded `printf` scratch buffer.
    pub format_limit: usize,
    /// VMIN: minimum bytes for a raw-mode `read()` to return.
    pub read_min: u8,
    /// VTIME: raw-mode read deadline in deciseconds.
    pub read_timeout_ds: u8,
    /// Terminal file descriptor.
    pub fd: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 2048,
            format_limit: 1024,
            read_min: 0,
            read_timeout_ds: 1,
            fd: 1,
        }
    }
}

impl Config {
    /// Parse a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed TOML, unknown keys, or values
    /// rejected by [`validate`](Self::validate).
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigIo`] if the file cannot be read, otherwise
    /// whatever [`from_toml_str`](Self::from_toml_str) returns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(Error::ConfigIo)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Check that sizes are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `initial_capacity` or `format_limit`
    /// is zero, or `fd` is negative.
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::Config("initial_capacity must be at least 1".into()));
        }
        if self.format_limit == 0 {
            return Err(Error::Config("format_limit must be at least 1".into()));
        }
        if self.fd < 0 {
            return Err(Error::Config(format!("fd must not be negative (got {})", self.fd)));
        }
        Ok(())
    }
}
