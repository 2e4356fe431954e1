// SPDX-License-Identifier: MIT
//
// The real terminal device, and panic-safe restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control — there is no safe
// alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// `Tty` implements `Device` on a file descriptor (stdout by default). It
// keeps the full `termios` it last read so that applying a `TermAttrs`
// only changes the mode words, never the line discipline or the speeds.
//
// The panic hook writes a short restore sequence straight to the fd and
// puts the saved termios back before the original hook prints its message.
// It bypasses Rust's stdout lock, so a panic in the middle of a flush can't
// deadlock it.

use std::fmt;
use std::io;
use std::os::unix::io::RawFd;
use std::sync::{Mutex, Once};

use crate::attrs::TermAttrs;
use crate::device::{Device, Size};

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the window size of `fd` via `ioctl(TIOCGWINSZ)`.
///
/// # Errors
///
/// Returns the OS error if the ioctl fails.
pub fn get_size(fd: RawFd) -> io::Result<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };
    if result == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(Size {
        rows: ws.ws_row,
        cols: ws.ws_col,
    })
}

/// Check whether `fd` is connected to a terminal.
#[must_use]
pub fn is_tty(fd: RawFd) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// The termios to put back if the process panics while raw, and its fd.
///
/// The session owns its own snapshot, but the panic hook can't reach it.
static TERMIOS_BACKUP: Mutex<Option<(RawFd, libc::termios)>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some((fd, ref original)) = *guard {
            unsafe {
                let _ = libc::tcsetattr(fd, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Reset colors, then show the cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?25h";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this a panic in raw mode leaves the user's shell with no echo
/// and no line editing, and the panic message staircases across the screen.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            original(info);
        }));
    });
}

fn emergency_restore() {
    let fd = TERMIOS_BACKUP
        .lock()
        .ok()
        .and_then(|guard| guard.as_ref().map(|(fd, _)| *fd));
    if let Some(fd) = fd {
        unsafe {
            let _ = libc::write(
                fd,
                EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
                EMERGENCY_RESTORE.len(),
            );
        }
        restore_termios_from_backup();
    }
}

// ─── Tty ────────────────────────────────────────────────────────────────────

/// The controlling terminal, addressed through a file descriptor.
///
/// # Example
///
/// ```no_run
/// use rawterm_core::session::Session;
/// use rawterm_core::terminal::Tty;
/// use rawterm_core::Config;
///
/// let mut session = Session::new(Tty::stdout(), Config::default());
/// session.initialize()?;
/// session.clear();
/// session.print("hello");
/// session.flush();
/// # Ok::<(), rawterm_core::Error>(())
/// ```
pub struct Tty {
    fd: RawFd,
    /// Full termios from the last `attributes()` call.
    base: Option<libc::termios>,
}

impl Tty {
    /// A device on `fd`. The fd is borrowed, not owned; it is never closed.
    #[must_use]
    pub const fn new(fd: RawFd) -> Self {
        Self { fd, base: None }
    }

    /// A device on standard output.
    #[must_use]
    pub const fn stdout() -> Self {
        Self::new(libc::STDOUT_FILENO)
    }

    /// The underlying file descriptor.
    #[inline]
    #[must_use]
    pub const fn fd(&self) -> RawFd {
        self.fd
    }

    fn read_termios(&self) -> io::Result<libc::termios> {
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(self.fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(termios)
        }
    }
}

impl fmt::Debug for Tty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tty")
            .field("fd", &self.fd)
            .field("has_base", &self.base.is_some())
            .finish()
    }
}

impl Device for Tty {
    fn attributes(&mut self) -> io::Result<TermAttrs> {
        let termios = self.read_termios()?;
        self.base = Some(termios);
        Ok(TermAttrs::from_termios(&termios))
    }

    fn set_attributes(&mut self, attrs: &TermAttrs) -> io::Result<()> {
        let mut termios = match self.base {
            Some(t) => t,
            None => self.read_termios()?,
        };
        attrs.apply_to(&mut termios);
        unsafe {
            if libc::tcsetattr(self.fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    fn window_size(&mut self) -> io::Result<Size> {
        get_size(self.fd)
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> io::Result<()> {
        while !bytes.is_empty() {
            let n = unsafe {
                libc::write(self.fd, bytes.as_ptr().cast::<libc::c_void>(), bytes.len())
            };
            if n < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            if n == 0 {
                return Err(io::ErrorKind::WriteZero.into());
            }
            #[allow(clippy::cast_sign_loss)] // n > 0 here.
            let written = n as usize;
            bytes = &bytes[written..];
        }
        Ok(())
    }

    fn arm_restore(&mut self, original: &TermAttrs) {
        install_panic_hook();
        let Some(mut termios) = self.base else {
            return;
        };
        original.apply_to(&mut termios);
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some((self.fd, termios));
        }
    }

    fn disarm_restore(&mut self) {
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
