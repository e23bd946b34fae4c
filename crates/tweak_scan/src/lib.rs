//! Locating annotated literals in C-family source text.
//!
//! Two entry points:
//!
//! - [`find_alias`] discovers the `#define ALIAS SENTINEL` line that renames
//!   the annotation macro in a file.
//! - [`CallSiteScanner`] walks the file and yields every `NAME( literal )`
//!   call-site that sits in code, skipping comments, character literals,
//!   string literals and raw string literals.
//!
//! The scanner works over a [`SourceBuffer`], which pads the text with NUL
//! bytes so lookahead never runs off the end.

mod alias;
mod cursor;
mod scanner;
mod source_buffer;

pub use alias::find_alias;
pub use cursor::Cursor;
pub use scanner::{CallSite, CallSiteScanner, ScanError, ScanErrorKind};
pub use source_buffer::SourceBuffer;

/// Whether `b` can continue an identifier.
///
/// Bytes with the high bit set count as identifier characters, so a name
/// glued to UTF-8 text is not taken for a standalone identifier.
#[inline]
pub(crate) fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
