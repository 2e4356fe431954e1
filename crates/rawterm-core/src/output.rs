// SPDX-License-Identifier: MIT
//
// Output buffering.
//
// OutputBuffer accumulates every escape sequence and every piece of text so
// a whole screen update reaches the terminal in a single write(). It keeps
// its own notion of capacity rather than trusting `Vec::capacity`, because
// the growth policy is part of the contract: capacity starts at whatever the
// session asks for, doubles when an append would overflow it, and never
// shrinks while the session is alive. The `Vec` underneath is reserved to
// match, so there is exactly one reallocation per doubling.
//
// Formatted appends go through a bounded scratch area first. Anything past
// the limit is dropped on the floor, mirroring a fixed-size snprintf.

use std::fmt;
use std::io::{self, Write};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A growable byte buffer that accumulates terminal output for one `write()`.
///
/// # Example
///
/// ```
/// use rawterm_core::output::OutputBuffer;
///
/// let mut buf = OutputBuffer::with_capacity(4);
/// buf.push_bytes(b"hello");
/// assert_eq!(buf.capacity(), 8);
/// assert_eq!(buf.as_bytes(), b"hello");
/// ```
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl OutputBuffer {
    /// Create an empty buffer that can hold `capacity` bytes before growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// A buffer with no storage at all. The first append allocates.
    #[must_use]
    pub const fn unallocated() -> Self {
        Self {
            buf: Vec::new(),
            capacity: 0,
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes the buffer can hold before the next doubling.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes, doubling capacity as many times as needed.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let needed = self.buf.len() + bytes.len();
        if needed > self.capacity {
            self.grow_to(needed);
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Append UTF-8 text verbatim.
    #[inline]
    pub fn push_str(&mut self, text: &str) {
        self.push_bytes(text.as_bytes());
    }

    /// Format `args` into a scratch area of `limit` bytes, then append.
    ///
    /// Like `vsnprintf` into a `char[limit]`, at most `limit - 1` bytes
    /// survive; the rest is silently discarded. Truncation is byte-wise and
    /// may split a multi-byte character.
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>, limit: usize) {
        let mut scratch = Bounded::new(limit.saturating_sub(1));
        // `Bounded` never reports an error; a failing `Display` impl just
        // leaves whatever it produced so far.
        let _ = fmt::write(&mut scratch, args);
        self.push_bytes(&scratch.buf);
    }

    /// Drop all content, keeping capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Free the storage entirely. Capacity goes back to zero.
    pub fn release(&mut self) {
        self.buf = Vec::new();
        self.capacity = 0;
    }

    /// Write accumulated output to `w` in one call and clear the buffer.
    ///
    /// The buffer is cleared even when the write fails; the bytes are lost.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let result = w.write_all(&self.buf).and_then(|()| w.flush());
        self.buf.clear();
        result
    }

    fn grow_to(&mut self, needed: usize) {
        let mut cap = self.capacity.max(1);
        while cap < needed {
            cap = cap.saturating_mul(2);
        }
        tracing::trace!(from = self.capacity, to = cap, "output buffer grew");
        self.buf.reserve_exact(cap - self.buf.len());
        self.capacity = cap;
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing goes through flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::unallocated()
    }
}

// ─── Bounded ─────────────────────────────────────────────────────────────────

/// A `fmt::Write` sink that keeps the first `limit` bytes and ignores the rest.
struct Bounded {
    buf: Vec<u8>,
    limit: usize,
}

impl Bounded {
    fn new(limit: usize) -> Self {
        Self {
            buf: Vec::with_capacity(limit.min(1024)),
            limit,
        }
    }
}

impl fmt::Write for Bounded {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit - self.buf.len();
        let take = s.len().min(room);
        self.buf.extend_from_slice(&s.as_bytes()[..take]);
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    // ── Basics ──────────────────────────────────────────────────────────

    #[test]
    fn new_is_empty() {
        let buf = OutputBuffer::with_capacity(2048);
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), 2048);
    }

    #[test]
    fn write_trait_appends() {
        let mut buf = OutputBuffer::with_capacity(16);
        write!(buf, "hello {}", 42).unwrap();
        assert_eq!(buf.as_bytes(), b"hello 42");
    }

    #[test]
    fn push_str_is_verbatim() {
        let mut buf = OutputBuffer::with_capacity(16);
        buf.push_str("a\x1bb\n中");
        assert_eq!(buf.as_bytes(), "a\x1bb\n中".as_bytes());
    }

    // ── Growth ──────────────────────────────────────────────────────────

    #[test]
    fn exact_fit_does_not_grow() {
        let mut buf = OutputBuffer::with_capacity(4);
        buf.push_bytes(b"abcd");
        assert_eq!(buf.capacity(), 4);
    }

    #[test]
    fn one_past_capacity_doubles() {
        let mut buf = OutputBuffer::with_capacity(4);
        buf.push_bytes(b"abcd");
        buf.push_bytes(b"e");
        assert_eq!(buf.capacity(), 8);
        assert_eq!(buf.as_bytes(), b"abcde");
    }

    #[test]
    fn large_append_doubles_repeatedly() {
        let mut buf = OutputBuffer::with_capacity(4);
        buf.push_bytes(&[b'x'; 33]);
        assert_eq!(buf.capacity(), 64);
        assert_eq!(buf.len(), 33);
    }

    #[test]
    fn unallocated_grows_from_one() {
        let mut buf = OutputBuffer::unallocated();
        assert_eq!(buf.capacity(), 0);
        buf.push_bytes(b"abc");
        assert_eq!(buf.capacity(), 4);
        assert_eq!(buf.as_bytes(), b"abc");
    }

    #[test]
    fn growth_keeps_existing_bytes_in_order() {
        let mut buf = OutputBuffer::with_capacity(2);
        for chunk in [&b"ab"[..], b"cd", b"efg", b"h"] {
            buf.push_bytes(chunk);
        }
        assert_eq!(buf.as_bytes(), b"abcdefgh");
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buf = OutputBuffer::with_capacity(2);
        buf.push_bytes(b"some data");
        let cap = buf.capacity();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn release_frees_everything() {
        let mut buf = OutputBuffer::with_capacity(64);
        buf.push_bytes(b"xyz");
        buf.release();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 0);
    }

    // ── Bounded formatting ──────────────────────────────────────────────

    #[test]
    fn push_fmt_short_is_complete() {
        let mut buf = OutputBuffer::with_capacity(64);
        buf.push_fmt(format_args!("{}x{}", 80, 24), 1024);
        assert_eq!(buf.as_bytes(), b"80x24");
    }

    #[test]
    fn push_fmt_truncates_to_limit_minus_one() {
        let mut buf = OutputBuffer::with_capacity(64);
        buf.push_fmt(format_args!("{}", "abcdefghij"), 5);
        assert_eq!(buf.as_bytes(), b"abcd");
    }

    #[test]
    fn push_fmt_truncation_spans_pieces() {
        let mut buf = OutputBuffer::with_capacity(64);
        buf.push_fmt(format_args!("{}-{}-{}", "aaa", "bbb", "ccc"), 8);
        assert_eq!(buf.as_bytes(), b"aaa-bbb");
    }

    #[test]
    fn push_fmt_default_limit_keeps_1023_bytes() {
        let long = "z".repeat(5000);
        let mut buf = OutputBuffer::with_capacity(16);
        buf.push_fmt(format_args!("{long}"), 1024);
        assert_eq!(buf.len(), 1023);
    }

    #[test]
    fn push_fmt_zero_limit_appends_nothing() {
        let mut buf = OutputBuffer::with_capacity(16);
        buf.push_fmt(format_args!("text"), 0);
        assert!(buf.is_empty());
    }

    // ── Flush ───────────────────────────────────────────────────────────

    #[test]
    fn flush_to_writes_and_clears() {
        let mut buf = OutputBuffer::with_capacity(16);
        buf.push_bytes(b"frame data");
        let mut dest = Vec::new();
        buf.flush_to(&mut dest).unwrap();
        assert_eq!(dest, b"frame data");
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 16);
    }

    #[test]
    fn flush_to_empty_is_noop() {
        let mut buf = OutputBuffer::with_capacity(16);
        let mut dest = Vec::new();
        buf.flush_to(&mut dest).unwrap();
        assert!(dest.is_empty());
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn flush_to_failure_still_clears() {
        let mut buf = OutputBuffer::with_capacity(16);
        buf.push_bytes(b"lost");
        assert!(buf.flush_to(&mut Broken).is_err());
        assert!(buf.is_empty());
    }

    // ── Properties ──────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn chunking_does_not_change_content(
            chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..300), 0..40),
            initial in 1usize..64,
        ) {
            let mut chunked = OutputBuffer::with_capacity(initial);
            let mut whole = Vec::new();
            for c in &chunks {
                chunked.push_bytes(c);
                whole.extend_from_slice(c);
            }
            let mut single = OutputBuffer::with_capacity(initial);
            single.push_bytes(&whole);
            prop_assert_eq!(chunked.as_bytes(), &whole[..]);
            prop_assert_eq!(single.as_bytes(), &whole[..]);
        }

        #[test]
        fn capacity_only_doubles_and_bounds_len(
            chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..200), 1..40),
            initial in 1usize..64,
        ) {
            let mut buf = OutputBuffer::with_capacity(initial);
            let mut last = buf.capacity();
            for c in &chunks {
                buf.push_bytes(c);
                let cap = buf.capacity();
                prop_assert!(buf.len() <= cap);
                prop_assert!(cap >= last);
                // Every capacity is the initial one times a power of two.
                prop_assert_eq!(cap % initial, 0);
                prop_assert!((cap / initial).is_power_of_two());
                last = cap;
            }
        }
    }
}
