// SPDX-License-Identifier: MIT
//
// The 16-color palette.
//
// Palette indices follow the classic PC text-mode order (black, blue, green,
// cyan, red, ...), not the ANSI order (black, red, green, yellow, ...). The
// two tables below translate a palette index into the SGR code the terminal
// expects, so index 4 is red and maps to SGR 31, not SGR 34.

use std::fmt;

/// Foreground SGR codes, indexed by palette index.
pub const FG_CODES: [u8; 16] = [
    30, 34, 32, 36, 31, 35, 33, 37, 90, 94, 92, 96, 91, 95, 93, 97,
];

/// Background SGR codes, indexed by palette index.
pub const BG_CODES: [u8; 16] = [
    40, 44, 42, 46, 41, 45, 43, 47, 100, 104, 102, 106, 101, 105, 103, 107,
];

/// Highest valid palette index.
pub const MAX_INDEX: i32 = 15;

// ─── Color ───────────────────────────────────────────────────────────────────

/// One of the 16 palette entries: eight standard colors and their bright
/// variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue,
    Green,
    Cyan,
    Red,
    Purple,
    Yellow,
    #[default]
    Gray,
    DarkGray,
    LightBlue,
    LightGreen,
    LightCyan,
    LightRed,
    LightPurple,
    LightYellow,
    White,
}

impl Color {
    /// Every palette entry, in index order.
    pub const ALL: [Self; 16] = [
        Self::Black,
        Self::Blue,
        Self::Green,
        Self::Cyan,
        Self::Red,
        Self::Purple,
        Self::Yellow,
        Self::Gray,
        Self::DarkGray,
        Self::LightBlue,
        Self::LightGreen,
        Self::LightCyan,
        Self::LightRed,
        Self::LightPurple,
        Self::LightYellow,
        Self::White,
    ];

    /// Palette entry for `index`, clamped to `0..=15`.
    ///
    /// Out-of-range values are pulled to the nearest edge rather than
    /// rejected: `-1` is black, `20` is white.
    #[must_use]
    #[allow(clippy::cast_sign_loss)] // Clamped to 0..=15 before the cast.
    pub const fn clamped(index: i32) -> Self {
        let i = if index < 0 {
            0
        } else if index > MAX_INDEX {
            MAX_INDEX
        } else {
            index
        };
        Self::ALL[i as usize]
    }

    /// Palette index (`0..=15`).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// SGR code selecting this color as the foreground.
    #[inline]
    #[must_use]
    pub const fn fg_code(self) -> u8 {
        FG_CODES[self as usize]
    }

    /// SGR code selecting this color as the background.
    #[inline]
    #[must_use]
    pub const fn bg_code(self) -> u8 {
        BG_CODES[self as usize]
    }

    /// Whether this is one of the eight bright variants.
    #[inline]
    #[must_use]
    pub const fn is_bright(self) -> bool {
        self as u8 >= 8
    }

    /// Human-readable name, e.g. `"light-cyan"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Cyan => "cyan",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Yellow => "yellow",
            Self::Gray => "gray",
            Self::DarkGray => "dark-gray",
            Self::LightBlue => "light-blue",
            Self::LightGreen => "light-green",
            Self::LightCyan => "light-cyan",
            Self::LightRed => "light-red",
            Self::LightPurple => "light-purple",
            Self::LightYellow => "light-yellow",
            Self::White => "white",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Color> for i32 {
    fn from(c: Color) -> Self {
        Self::from(c.index())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
