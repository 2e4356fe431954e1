// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no clamping — the session decides what is in range. This module just knows
// the byte-level encoding of every terminal command rawterm emits.
//
// Cursor coordinates here are already 1-based, exactly as the terminal sees
// them. In practice these never fail when writing to `OutputBuffer`.
use std::io::{self, Write};

use crate::color::Color;

/// Clear screen (ED 2) followed by cursor home (CUP with no parameters).
pub const CLEAR_AND_HOME: &[u8] = b"\x1b[2J\x1b[H";

/// Hide the cursor (DECTCEM reset).
pub const CURSOR_HIDE: &[u8] = b"\x1b[?25l";

/// Show the cursor (DECTCEM set).
pub const CURSOR_SHOW: &[u8] = b"\x1b[?25h";

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(row, col)` using the CUP (Cursor Position) sequence.
#[inline]
pub fn cursor_to(w: &mut impl Write, row: i32, col: i32) -> io::Result<()> {
    write!(w, "\x1b[{row};{col}H")
}

/// Hide the cursor.
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CURSOR_HIDE)
}

/// Show the cursor.
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CURSOR_SHOW)
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen and park the cursor at row 1, column 1.
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(CLEAR_AND_HOME)
}

// ─── Color ───────────────────────────────────────────────────────────────────

/// Set foreground and background in a single SGR sequence: `ESC[fg;bgm`.
pub fn colors(w: &mut impl Write, fg: Color, bg: Color) -> io::Result<()> {
    write!(w, "\x1b[{};{}m", fg.fg_code(), bg.bg_code())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
