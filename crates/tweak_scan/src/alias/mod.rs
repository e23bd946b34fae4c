//! Discovery of the `#define ALIAS SENTINEL` line.
//!
//! Sources usually shorten the annotation macro with a define at the top of
//! the file:
//!
//! ```text
//! #define T_ TWEAKABLE
//! ```
//!
//! The scanner then has to look for `T_(` instead of `TWEAKABLE(`.
//!
//! Comments are not skipped here, so a define inside a block comment still
//! counts.

use memchr::memmem;

const DIRECTIVE: &str = "#define";

/// Find the first identifier defined as exactly `sentinel`.
///
/// The directive must start its line, optionally indented with spaces or
/// tabs; `#  define` is not recognized. The rest of the line after the
/// identifier must be `sentinel` alone, up to optional trailing blanks and
/// a `\r`. Returns `None` if no such line exists.
pub fn find_alias<'a>(source: &'a str, sentinel: &str) -> Option<&'a str> {
    let bytes = source.as_bytes();
    memmem::find_iter(bytes, DIRECTIVE).find_map(|at| {
        let line_start = bytes[..at]
            .iter()
            .rposition(|&b| b != b' ' && b != b'\t')
            .map_or(0, |i| i + 1);
        if line_start > 0 && bytes[line_start - 1] != b'\n' {
            return None;
        }
        alias_in_directive(source, at + DIRECTIVE.len(), sentinel)
    })
}

/// Parse ` ALIAS SENTINEL` starting right after `#define`.
fn alias_in_directive<'a>(source: &'a str, start: usize, sentinel: &str) -> Option<&'a str> {
    let bytes = source.as_bytes();
    let blank = |pos: usize| matches!(bytes.get(pos), Some(b' ' | b'\t'));
    let skip_blanks = |mut pos: usize| {
        while blank(pos) {
            pos += 1;
        }
        pos
    };

    if !blank(start) {
        return None;
    }
    let name_start = skip_blanks(start);
    if !bytes
        .get(name_start)
        .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'_')
    {
        return None;
    }
    let name_end = bytes[name_start..]
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
        .map_or(bytes.len(), |i| name_start + i);

    if !blank(name_end) {
        return None;
    }
    let value_start = skip_blanks(name_end);
    if !source[value_start..].starts_with(sentinel) {
        return None;
    }

    let rest = skip_blanks(value_start + sentinel.len());
    match bytes.get(rest) {
        None | Some(b'\n') => {}
        Some(b'\r') if matches!(bytes.get(rest + 1), None | Some(b'\n')) => {}
        _ => return None,
    }
    Some(&source[name_start..name_end])
}
