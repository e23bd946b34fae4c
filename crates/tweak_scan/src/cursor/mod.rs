//! Byte cursor over a sentinel-terminated buffer.
//!
//! EOF is detected when the current byte is the sentinel (`0x00`) and the
//! position has reached the source length. A NUL inside the source is an
//! ordinary byte as far as the scanner is concerned. Reads index the buffer
//! directly; the zero padding after the source keeps lookahead in bounds.

use memchr::memmem::Finder;

use crate::source_buffer::LOOKAHEAD;

/// Returns the earliest (minimum) of two optional positions.
///
/// Combines a memchr search with a substring search when the scanner needs
/// whichever comes first.
pub(crate) fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Cursor over a [`SourceBuffer`](crate::SourceBuffer).
///
/// The cursor is [`Copy`], so saving and restoring a position is a plain
/// assignment.
///
/// # Invariant
///
/// `buf` is sentinel-terminated: `buf[source_len] == 0x00`, and every byte
/// after `source_len` is `0x00`. At least [`LOOKAHEAD`] such bytes follow
/// the source.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    /// Sentinel-terminated buffer (source + sentinel + padding).
    buf: &'a str,
    /// Current read position (byte index into `buf`).
    pos: usize,
    /// Length of the source text (excludes sentinel and padding).
    source_len: usize,
}

/// &str = 16 (fat pointer), usize = 8, usize = 8 => 32 bytes.
const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 32);

impl<'a> Cursor<'a> {
    /// Create a cursor at position 0.
    ///
    /// # Contract
    ///
    /// `buf[source_len]` must be `0x00` and so must everything after it,
    /// for at least [`LOOKAHEAD`] bytes. `SourceBuffer::new()` guarantees
    /// this.
    pub(crate) fn new(buf: &'a str, source_len: usize) -> Self {
        debug_assert!(
            source_len + LOOKAHEAD <= buf.len(),
            "lookahead must be within buffer bounds"
        );
        debug_assert!(buf.as_bytes()[source_len] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Byte at absolute position `pos`, `0x00` past the source.
    ///
    /// # Contract
    ///
    /// `pos < source_len + LOOKAHEAD`.
    #[inline]
    pub fn at(&self, pos: usize) -> u8 {
        debug_assert!(pos < self.source_len + LOOKAHEAD, "read at {pos} past lookahead");
        self.buf.as_bytes()[pos]
    }

    /// Returns the byte at the current position.
    ///
    /// Returns `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.at(self.pos)
    }

    /// Returns the byte one position ahead of current.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.at(self.pos + 1)
    }

    /// Advance the cursor by one byte.
    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Move the cursor to an absolute position, clamped to EOF.
    #[inline]
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.source_len);
    }

    /// Returns `true` if the cursor has reached EOF.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Length of the source text (excludes sentinel and padding).
    #[inline]
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Extract a source substring.
    ///
    /// # Contract
    ///
    /// `start..end` must fall within the source and on character
    /// boundaries. The scanner only cuts at ASCII delimiters, so this holds
    /// for every position it produces.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        debug_assert!(
            end <= self.source_len,
            "slice end {end} exceeds source length {}",
            self.source_len
        );
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        &self.buf[start..end]
    }

    /// Extract a source substring from `start` to the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// # Contract
    ///
    /// `pred(0)` must return `false`, so the sentinel ends the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance past horizontal whitespace (spaces and tabs).
    ///
    /// Newlines are left alone so the line counter sees every one of them.
    #[inline]
    pub fn eat_whitespace(&mut self) {
        loop {
            let b = self.current();
            if b == b' ' || b == b'\t' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn remaining(&self) -> &'a [u8] {
        &self.buf.as_bytes()[self.pos.min(self.source_len)..self.source_len]
    }

    /// Advance to the next `\n` byte or EOF.
    pub fn eat_until_newline_or_eof(&mut self) {
        match memchr::memchr(b'\n', self.remaining()) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.source_len,
        }
    }

    /// Advance past ordinary code to the next byte that can open a comment,
    /// a character literal or a string literal. Returns the byte found, or 0
    /// for EOF.
    pub fn skip_to_code_delim(&mut self) -> u8 {
        match memchr::memchr3(b'/', b'\'', b'"', self.remaining()) {
            Some(offset) => {
                self.pos += offset;
                self.current()
            }
            None => {
                self.pos = self.source_len;
                0
            }
        }
    }

    /// Advance past ordinary literal content to the next closing `quote`,
    /// backslash or newline. Returns the byte found, or 0 for EOF.
    pub fn skip_to_quote_delim(&mut self, quote: u8) -> u8 {
        match memchr::memchr3(quote, b'\\', b'\n', self.remaining()) {
            Some(offset) => {
                self.pos += offset;
                self.current()
            }
            None => {
                self.pos = self.source_len;
                0
            }
        }
    }

    /// Absolute position of the next occurrence of `finder`'s needle at or
    /// after the current position. Does not move the cursor.
    pub fn find(&self, finder: &Finder<'_>) -> Option<usize> {
        finder.find(self.remaining()).map(|offset| self.pos + offset)
    }

    /// Number of `\n` bytes in `start..end`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "line counts of a source file fit in u32"
    )]
    pub fn count_newlines(&self, start: usize, end: usize) -> u32 {
        let end = end.min(self.source_len);
        if start >= end {
            return 0;
        }
        memchr::memchr_iter(b'\n', &self.buf.as_bytes()[start..end]).count() as u32
    }
}
