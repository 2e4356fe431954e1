// SPDX-License-Identifier: MIT
//
// The terminal session — raw mode, cached size, and buffered output.
//
// A session starts uninitialized. `initialize` snapshots the terminal's
// attributes, installs raw mode, caches the window size and allocates the
// output buffer. From then on every drawing call (clear, locate, color,
// print, printf) only appends bytes; nothing reaches the terminal until
// `flush`, which hands the whole buffer to the device in one write.
//
// `cleanup` puts the snapshot back and frees the buffer. It also runs from
// `Drop`, and the device's panic hook covers unwinding that skips `Drop`,
// so the user's terminal is never left raw.
//
// Coordinates and palette indices are clamped, never rejected. A caller
// that asks for row 0 gets row 1; a caller that asks for color 20 gets 15.

use std::fmt;

use crate::ansi;
use crate::attrs::TermAttrs;
use crate::color::Color;
use crate::config::Config;
use crate::device::{Device, Size};
use crate::error::{Error, Result};
use crate::output::OutputBuffer;

/// A key code returned by [`Session::read_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(pub u32);

/// State that only exists while raw mode is in effect.
#[derive(Debug)]
struct Active {
    /// Attributes found at initialize, restored at cleanup.
    original: TermAttrs,
    /// Attributes installed at initialize.
    raw: TermAttrs,
    size: Size,
}

// ─── Session ────────────────────────────────────────────────────────────────

/// A terminal in raw mode with a buffered drawing API.
///
/// # Example
///
/// ```no_run
/// use rawterm_core::session::Session;
/// use rawterm_core::terminal::Tty;
/// use rawterm_core::{printf, Color, Config};
///
/// let mut term = Session::new(Tty::stdout(), Config::default());
/// term.initialize()?;
/// term.clear();
/// term.set_colors(Color::LightYellow, Color::Blue);
/// term.locate(2, 3);
/// let (rows, cols) = (term.rows(), term.cols());
/// printf!(term, "{rows} x {cols}");
/// term.flush();
/// // Terminal is restored automatically on drop.
/// # Ok::<(), rawterm_core::Error>(())
/// ```
pub struct Session<D: Device> {
    device: D,
    config: Config,
    out: OutputBuffer,
    active: Option<Active>,
}

impl<D: Device> Session<D> {
    /// Create an uninitialized session. Touches neither the terminal nor
    /// the allocator.
    #[must_use]
    pub const fn new(device: D, config: Config) -> Self {
        Self {
            device,
            config,
            out: OutputBuffer::unallocated(),
            active: None,
        }
    }

    /// Enter raw mode and start buffering.
    ///
    /// Idempotent: calling `initialize()` while already active is a no-op.
    /// If the window size can't be determined after raw mode was installed,
    /// the original attributes are put back before the error is returned.
    ///
    /// # Errors
    ///
    /// [`Error::GetAttributes`], [`Error::SetAttributes`],
    /// [`Error::WindowSize`] or [`Error::ZeroSize`]. All of them mean the
    /// terminal is unusable; callers are expected to give up.
    pub fn initialize(&mut self) -> Result<()> {
        if self.active.is_some() {
            return Ok(());
        }

        let original = self.device.attributes().map_err(Error::GetAttributes)?;
        let raw_mode = original.raw(self.config.read_min, self.config.read_timeout_ds);
        self.device
            .set_attributes(&raw_mode)
            .map_err(Error::SetAttributes)?;

        let size = match self.device.window_size() {
            Ok(size) if size.cols > 0 => size,
            Ok(_) => {
                let _ = self.device.set_attributes(&original);
                return Err(Error::ZeroSize);
            }
            Err(e) => {
                let _ = self.device.set_attributes(&original);
                return Err(Error::WindowSize(e));
            }
        };
        self.device.arm_restore(&original);

        self.out = OutputBuffer::with_capacity(self.config.initial_capacity);
        self.active = Some(Active {
            original,
            raw: raw_mode,
            size,
        });

        tracing::debug!(
            rows = size.rows,
            cols = size.cols,
            capacity = self.config.initial_capacity,
            "terminal session initialized"
        );
        Ok(())
    }

    /// Free the buffer and restore the attributes saved by `initialize`.
    ///
    /// No-op if the session is not active. Unflushed output is discarded.
    /// A failure to restore is logged and otherwise ignored: cleanup usually
    /// runs on the way out of the process, where nobody could act on it.
    pub fn cleanup(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let discarded = self.out.len();
        self.out.release();

        if let Err(e) = self.device.set_attributes(&active.original) {
            tracing::debug!(error = %e, "restoring terminal attributes failed");
        }
        self.device.disarm_restore();

        tracing::debug!(discarded, "terminal session cleaned up");
    }

    /// Whether `initialize` has succeeded and `cleanup` hasn't run since.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Write everything buffered to the terminal in one operation.
    ///
    /// No-op if nothing is buffered. The buffer keeps its capacity. A write
    /// failure is logged and the buffered bytes are dropped; use
    /// [`try_flush`](Self::try_flush) to observe it.
    pub fn flush(&mut self) {
        if let Err(e) = self.try_flush() {
            tracing::warn!(error = %e, "terminal flush failed, output dropped");
        }
    }

    /// Like [`flush`](Self::flush), but reports the write error.
    ///
    /// The buffer is emptied whether or not the write succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the device rejects the write.
    pub fn try_flush(&mut self) -> Result<()> {
        if self.out.is_empty() {
            return Ok(());
        }
        let result = self.device.write_all(self.out.as_bytes());
        self.out.clear();
        result.map_err(Error::Write)
    }

    /// Probe for a key press without blocking.
    ///
    /// Key decoding is not implemented; this always reports no event.
    #[allow(clippy::unused_self)]
    pub const fn read_key(&mut self) -> Option<Key> {
        None
    }

    /// Clear the screen and move the cursor to row 1, column 1.
    pub fn clear(&mut self) {
        if self.accepting() {
            ansi::clear_screen(&mut self.out).ok();
        }
    }

    /// Rows captured at initialize (0 before).
    #[inline]
    #[must_use]
    pub fn rows(&self) -> u16 {
        self.size().rows
    }

    /// Columns captured at initialize (0 before).
    #[inline]
    #[must_use]
    pub fn cols(&self) -> u16 {
        self.size().cols
    }

    /// Size captured at initialize. Never re-queried.
    #[must_use]
    pub fn size(&self) -> Size {
        self.active.as_ref().map_or_else(Size::default, |a| a.size)
    }

    /// Move the cursor to the 1-based `(row, col)`.
    ///
    /// `row` is clamped to `1..=rows`, `col` to `1..=cols`.
    pub fn locate(&mut self, row: i32, col: i32) {
        if !self.accepting() {
            return;
        }
        let size = self.size();
        let row = clamp(row, i32::from(size.rows));
        let col = clamp(col, i32::from(size.cols));
        ansi::cursor_to(&mut self.out, row, col).ok();
    }

    /// Set foreground and background by palette index.
    ///
    /// Both are clamped to `0..=15` independently.
    pub fn color(&mut self, fg: i32, bg: i32) {
        self.set_colors(Color::clamped(fg), Color::clamped(bg));
    }

    /// Set foreground and background.
    pub fn set_colors(&mut self, fg: Color, bg: Color) {
        if self.accepting() {
            ansi::colors(&mut self.out, fg, bg).ok();
        }
    }

    /// Hide the cursor.
    pub fn hide_cursor(&mut self) {
        if self.accepting() {
            ansi::cursor_hide(&mut self.out).ok();
        }
    }

    /// Show the cursor.
    pub fn show_cursor(&mut self) {
        if self.accepting() {
            ansi::cursor_show(&mut self.out).ok();
        }
    }

    /// Append `text` verbatim.
    pub fn print(&mut self, text: &str) {
        if self.accepting() {
            self.out.push_str(text);
        }
    }

    /// Append formatted text.
    ///
    /// Formatting happens in a scratch area of `Config::format_limit` bytes
    /// first; at most `format_limit - 1` bytes of the result are kept. Use
    /// the [`printf!`](crate::printf) macro rather than calling this directly.
    pub fn printf(&mut self, args: fmt::Arguments<'_>) {
        if self.accepting() {
            self.out.push_fmt(args, self.config.format_limit);
        }
    }

    /// Bytes waiting for the next flush.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        self.out.as_bytes()
    }

    /// Current output buffer capacity.
    #[inline]
    #[must_use]
    pub const fn buffer_capacity(&self) -> usize {
        self.out.capacity()
    }

    /// Attributes saved at initialize.
    #[must_use]
    pub fn original_attributes(&self) -> Option<&TermAttrs> {
        self.active.as_ref().map(|a| &a.original)
    }

    /// Attributes installed at initialize.
    #[must_use]
    pub fn raw_attributes(&self) -> Option<&TermAttrs> {
        self.active.as_ref().map(|a| &a.raw)
    }

    /// The configuration this session was created with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying device.
    #[inline]
    #[must_use]
    pub const fn device(&self) -> &D {
        &self.device
    }

    fn accepting(&self) -> bool {
        if self.active.is_none() {
            tracing::trace!("output ignored: session not initialized");
            return false;
        }
        true
    }
}

impl<D: Device> Drop for Session<D> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

impl<D: Device> fmt::Debug for Session<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("active", &self.is_active())
            .field("size", &self.size())
            .field("pending", &self.out.len())
            .field("capacity", &self.out.capacity())
            .finish_non_exhaustive()
    }
}

/// Clamp a 1-based coordinate into `1..=max`.
///
/// The lower bound is applied first, so with `max == 0` the result is 0.
const fn clamp(v: i32, max: i32) -> i32 {
    let v = if v < 1 { 1 } else { v };
    if v > max { max } else { v }
}

/// Append formatted text to a session, `printf`-style.
///
/// ```no_run
/// # use rawterm_core::{printf, session::Session, terminal::Tty, Config};
/// # let mut term = Session::new(Tty::stdout(), Config::default());
/// printf!(term, "{:>3}%", 42);
/// ```
#[macro_export]
macro_rules! printf {
    ($session:expr, $($arg:tt)*) => {
        $session.printf(::std::format_args!($($arg)*))
    };
}

// ─── Tests ───────────────────────────────────────────────────────────────────
