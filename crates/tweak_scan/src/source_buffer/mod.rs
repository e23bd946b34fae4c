//! NUL-padded source buffer.
//!
//! The buffer keeps a `0x00` sentinel after the source text and rounds the
//! total size up to the next 64-byte boundary. The scanner relies on the
//! padding to look a few bytes past the current position without checking
//! for the end first.

use crate::Cursor;

/// Cache line size in bytes, used for buffer padding.
const CACHE_LINE: usize = 64;

/// Zero bytes guaranteed after the source, sentinel included. The longest
/// lookahead is a `u8R"` prefix check, three bytes past the cursor.
pub(crate) const LOOKAHEAD: usize = 4;

/// Sentinel-terminated copy of a source file.
///
/// # Layout
///
/// ```text
/// [source_bytes..., 0x00, padding_zeros...]
///  ^                ^     ^
///  0                |     at least LOOKAHEAD zeros, rounded up to 64
///              source_len (sentinel)
/// ```
///
/// The padding is stored as NUL characters of a `String`, so every slice the
/// scanner takes on an ASCII delimiter is still valid UTF-8.
#[derive(Clone, Debug)]
pub struct SourceBuffer {
    /// `[source..., '\0' sentinel, '\0' padding...]`.
    buf: String,
    /// Length of the actual source text (excludes sentinel and padding).
    source_len: usize,
}

/// `SourceBuffer` is a `String` plus a length.
const _: () = assert!(std::mem::size_of::<SourceBuffer>() <= 32);

impl SourceBuffer {
    /// Copy `source` into a padded buffer.
    pub fn new(source: &str) -> Self {
        let source_len = source.len();

        // Round up to next 64-byte boundary (minimum: source + lookahead).
        let padded_len = (source_len + LOOKAHEAD + CACHE_LINE - 1) & !(CACHE_LINE - 1);

        let mut buf = String::with_capacity(padded_len);
        buf.push_str(source);
        buf.extend(std::iter::repeat_n('\0', padded_len - source_len));

        Self { buf, source_len }
    }

    /// Create a [`Cursor`] positioned at byte 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }
}

#[cfg(test)]
mod tests;
