// SPDX-License-Identifier: MIT
//
// rawterm-core — a raw-mode terminal session with buffered ANSI output.
//
// The whole crate revolves around `session::Session`: it puts the terminal
// into raw mode, remembers how to put it back, caches the window size, and
// collects every cursor move, color change and piece of text in one
// growable buffer that reaches the terminal in a single write.
//
// No external TUI framework sits underneath. The escape sequences are
// written by hand (`ansi`), the 16-color palette is a fixed table
// (`color`), and the operating system is reached through a four-call
// `Device` seam whose real implementation (`terminal::Tty`) talks termios
// directly through libc.

pub mod ansi;
pub mod color;
pub mod config;
pub mod error;
pub mod output;

#[cfg(unix)]
pub mod attrs;
#[cfg(unix)]
pub mod device;
#[cfg(unix)]
pub mod session;
#[cfg(unix)]
pub mod terminal;

pub use color::Color;
pub use config::Config;
pub use error::{Error, Result};

#[cfg(unix)]
pub use device::{Device, Size};
#[cfg(unix)]
pub use session::{Key, Session};
#[cfg(unix)]
pub use terminal::Tty;
