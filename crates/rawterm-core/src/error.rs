// SPDX-License-Identifier: MIT
//
// Error types for the terminal session.
//
// Only initialization failures are meant to reach the caller in practice:
// without a known-good raw terminal there is nothing useful to do, so the
// binary treats them as fatal. Flush and restore failures are logged and
// swallowed by the session; `Write` exists for the strict `try_flush` path.

use std::io;

use thiserror::Error;

/// Everything that can go wrong while driving a terminal session.
#[derive(Debug, Error)]
pub enum Error {
    /// `tcgetattr()` failed — usually because the fd is not a terminal.
    #[error("tcgetattr() failed: {0}")]
    GetAttributes(#[source] io::Error),

    /// `tcsetattr()` failed while installing raw mode.
    #[error("tcsetattr() failed: {0}")]
    SetAttributes(#[source] io::Error),

    /// `ioctl(TIOCGWINSZ)` failed.
    #[error("ioctl() failed - get window size: {0}")]
    WindowSize(#[source] io::Error),

    /// The window size query succeeded but reported zero columns.
    #[error("ioctl() failed - get window size: terminal reports zero columns")]
    ZeroSize,

    /// Writing buffered output to the device failed.
    #[error("write to terminal failed: {0}")]
    Write(#[source] io::Error),

    /// A configuration value is out of range or could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    ConfigIo(#[source] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
