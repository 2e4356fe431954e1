// SPDX-License-Identifier: MIT
//
// The terminal device seam.
//
// A session needs exactly four things from the operating system: read the
// current attributes, install new ones, ask for the window size, and write
// bytes. `Device` names those four, so the session logic can run against
// the real tty (`terminal::Tty`) or against an in-memory recorder in tests.

use std::io;

use crate::attrs::TermAttrs;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    /// Number of rows (height in character cells).
    pub rows: u16,
    /// Number of columns (width in character cells).
    pub cols: u16,
}

impl Size {
    /// Total number of cells (`rows × cols`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.rows as u32 * self.cols as u32
    }
}

// ─── Device ─────────────────────────────────────────────────────────────────

/// The system calls a [`Session`](crate::session::Session) is built on.
pub trait Device {
    /// Current terminal attributes (`tcgetattr`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be read.
    fn attributes(&mut self) -> io::Result<TermAttrs>;

    /// Install attributes after draining pending output and discarding
    /// pending input (`tcsetattr(TCSAFLUSH)`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the attributes cannot be applied.
    fn set_attributes(&mut self, attrs: &TermAttrs) -> io::Result<()>;

    /// Window size (`ioctl(TIOCGWINSZ)`).
    ///
    /// # Errors
    ///
    /// Returns the OS error if the size cannot be queried.
    fn window_size(&mut self) -> io::Result<Size>;

    /// Write every byte of `bytes` to the terminal.
    ///
    /// # Errors
    ///
    /// Returns the OS error of the first failing `write()`.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Raw mode is now in place; `original` must be restored if the process
    /// goes down without running cleanup.
    fn arm_restore(&mut self, _original: &TermAttrs) {}

    /// The original attributes are back; nothing to restore on panic.
    fn disarm_restore(&mut self) {}
}

impl<D: Device + ?Sized> Device for &mut D {
    fn attributes(&mut self) -> io::Result<TermAttrs> {
        (**self).attributes()
    }

    fn set_attributes(&mut self, attrs: &TermAttrs) -> io::Result<()> {
        (**self).set_attributes(attrs)
    }

    fn window_size(&mut self) -> io::Result<Size> {
        (**self).window_size()
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }

    fn arm_restore(&mut self, original: &TermAttrs) {
        (**self).arm_restore(original);
    }

    fn disarm_restore(&mut self) {
        (**self).disarm_restore();
    }
}

// ─── Test double ────────────────────────────────────────────────────────────
