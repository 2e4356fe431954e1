// SPDX-License-Identifier: MIT
//
// Terminal attributes — a typed view of the termios mode words.
//
// `TermAttrs` carries the four flag words and the two read-control bytes
// (VMIN, VTIME). The flag types name only the bits rawterm touches, but
// every bit the OS reported is retained, so a snapshot taken before raw
// mode converts back to exactly the original termios on restore.
//
// Raw-mode derivation is a pure function here, which lets it be tested
// without a terminal.

use bitflags::bitflags;

bitflags! {
    /// Input mode flags (`c_iflag`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputFlags: libc::tcflag_t {
        /// Break condition sends SIGINT.
        const BRKINT = libc::BRKINT;
        /// Translate CR to NL on input.
        const ICRNL = libc::ICRNL;
        /// Input parity checking.
        const INPCK = libc::INPCK;
        /// Strip the eighth bit.
        const ISTRIP = libc::ISTRIP;
        /// XON/XOFF output flow control.
        const IXON = libc::IXON;

        const _ = !0;
    }
}

bitflags! {
    /// Output mode flags (`c_oflag`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OutputFlags: libc::tcflag_t {
        /// Implementation-defined output post-processing (e.g. NL → CRNL).
        const OPOST = libc::OPOST;

        const _ = !0;
    }
}

bitflags! {
    /// Control mode flags (`c_cflag`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlFlags: libc::tcflag_t {
        /// Eight-bit characters.
        const CS8 = libc::CS8;

        const _ = !0;
    }
}

bitflags! {
    /// Local mode flags (`c_lflag`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LocalFlags: libc::tcflag_t {
        /// Echo input characters.
        const ECHO = libc::ECHO;
        /// Canonical (line-buffered) input.
        const ICANON = libc::ICANON;
        /// Extended input processing (Ctrl-V and friends).
        const IEXTEN = libc::IEXTEN;
        /// Generate signals for INTR, QUIT, SUSP.
        const ISIG = libc::ISIG;

        const _ = !0;
    }
}

// ─── TermAttrs ───────────────────────────────────────────────────────────────

/// A snapshot of the terminal's mode flags and read controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermAttrs {
    pub input: InputFlags,
    pub output: OutputFlags,
    pub control: ControlFlags,
    pub local: LocalFlags,
    /// Minimum number of bytes a non-canonical `read()` waits for.
    pub vmin: u8,
    /// Non-canonical read deadline in tenths of a second.
    pub vtime: u8,
}

impl TermAttrs {
    /// Derive raw-mode attributes from `self`.
    ///
    /// Clears break-to-signal, CR→NL, parity checking, eighth-bit stripping
    /// and XON/XOFF on input; all output post-processing; echo, canonical
    /// mode, extended processing and signal characters on the local side.
    /// Forces eight-bit characters. Everything else is left as found.
    #[must_use]
    pub fn raw(&self, vmin: u8, vtime: u8) -> Self {
        let mut raw = *self;
        raw.input.remove(
            InputFlags::BRKINT
                | InputFlags::ICRNL
                | InputFlags::INPCK
                | InputFlags::ISTRIP
                | InputFlags::IXON,
        );
        raw.output.remove(OutputFlags::OPOST);
        raw.control.insert(ControlFlags::CS8);
        raw.local.remove(
            LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::IEXTEN | LocalFlags::ISIG,
        );
        raw.vmin = vmin;
        raw.vtime = vtime;
        raw
    }

    /// Whether these attributes describe a raw terminal (no echo, no line
    /// buffering, no signal keys).
    #[must_use]
    pub fn is_raw(&self) -> bool {
        !self
            .local
            .intersects(LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::ISIG)
    }

    /// Read the mode words out of a `termios`.
    #[must_use]
    pub fn from_termios(t: &libc::termios) -> Self {
        Self {
            input: InputFlags::from_bits_retain(t.c_iflag),
            output: OutputFlags::from_bits_retain(t.c_oflag),
            control: ControlFlags::from_bits_retain(t.c_cflag),
            local: LocalFlags::from_bits_retain(t.c_lflag),
            vmin: t.c_cc[libc::VMIN],
            vtime: t.c_cc[libc::VTIME],
        }
    }

    /// Write the mode words into `t`, leaving every other field (line
    /// discipline, speeds, other control characters) untouched.
    pub fn apply_to(&self, t: &mut libc::termios) {
        t.c_iflag = self.input.bits();
        t.c_oflag = self.output.bits();
        t.c_cflag = self.control.bits();
        t.c_lflag = self.local.bits();
        t.c_cc[libc::VMIN] = self.vmin;
        t.c_cc[libc::VTIME] = self.vtime;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A typical cooked terminal, as a fresh login shell leaves it.
    fn cooked() -> TermAttrs {
        TermAttrs {
            input: InputFlags::BRKINT | InputFlags::ICRNL | InputFlags::IXON,
            output: OutputFlags::OPOST,
            control: ControlFlags::CS8,
            local: LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::IEXTEN | LocalFlags::ISIG,
            vmin: 1,
            vtime: 0,
        }
    }

    #[test]
    fn raw_clears_input_processing() {
        let raw = cooked().raw(0, 1);
        for f in [
            InputFlags::BRKINT,
            InputFlags::ICRNL,
            InputFlags::INPCK,
            InputFlags::ISTRIP,
            InputFlags::IXON,
        ] {
            assert!(!raw.input.intersects(f), "{f:?} still set");
        }
    }

    #[test]
    fn raw_clears_output_processing() {
        assert!(!cooked().raw(0, 1).output.contains(OutputFlags::OPOST));
    }

    #[test]
    fn raw_clears_local_modes() {
        let raw = cooked().raw(0, 1);
        assert!(!raw.local.intersects(
            LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::IEXTEN | LocalFlags::ISIG
        ));
        assert!(raw.is_raw());
        assert!(!cooked().is_raw());
    }

    #[test]
    fn raw_sets_eight_bit_chars() {
        let mut attrs = cooked();
        attrs.control = ControlFlags::empty();
        assert!(attrs.raw(0, 1).control.contains(ControlFlags::CS8));
    }

    #[test]
    fn raw_sets_read_controls() {
        let raw = cooked().raw(0, 1);
        assert_eq!((raw.vmin, raw.vtime), (0, 1));
    }

    #[test]
    fn raw_keeps_unrelated_bits() {
        let mut attrs = cooked();
        attrs.input |= InputFlags::from_bits_retain(libc::IUTF8);
        attrs.local |= LocalFlags::from_bits_retain(libc::ECHOCTL);
        let raw = attrs.raw(0, 1);
        assert!(raw.input.contains(InputFlags::from_bits_retain(libc::IUTF8)));
        assert!(raw.local.contains(LocalFlags::from_bits_retain(libc::ECHOCTL)));
    }

    #[test]
    fn raw_does_not_touch_original() {
        let attrs = cooked();
        let _ = attrs.raw(0, 1);
        assert_eq!(attrs, cooked());
    }

    #[test]
    #[allow(unsafe_code)]
    fn termios_round_trip_is_exact() {
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        t.c_iflag = libc::ICRNL | libc::IXON | libc::IUTF8;
        t.c_oflag = libc::OPOST | libc::ONLCR;
        t.c_cflag = libc::CS8 | libc::CREAD;
        t.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG | libc::ECHOE;
        t.c_cc[libc::VMIN] = 1;
        t.c_cc[libc::VTIME] = 0;
        t.c_cc[libc::VINTR] = 3;

        let attrs = TermAttrs::from_termios(&t);
        let mut back: libc::termios = t;
        attrs.raw(0, 1).apply_to(&mut back);
        attrs.apply_to(&mut back);

        assert_eq!(back.c_iflag, t.c_iflag);
        assert_eq!(back.c_oflag, t.c_oflag);
        assert_eq!(back.c_cflag, t.c_cflag);
        assert_eq!(back.c_lflag, t.c_lflag);
        assert_eq!(back.c_cc, t.c_cc);
    }
}
