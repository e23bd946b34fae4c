//! Call-site scanner.
//!
//! Walks a [`SourceBuffer`] in code context and yields every `NAME(literal)`
//! call-site, skipping line comments, block comments, character literals,
//! string literals and raw string literals. Line numbers are counted lazily:
//! the newlines between two points of interest are counted with `memchr`
//! only when a line number is actually needed.
//!
//! The scanner is an iterator of `Result<CallSite, ScanError>` and stops
//! after the first error.

use std::iter::FusedIterator;

use memchr::memmem::Finder;

use crate::cursor::earliest_of;
use crate::{is_ident_continue, Cursor, SourceBuffer};

/// Longest delimiter accepted in `R"delim( ... )delim"`.
const MAX_RAW_DELIMITER: usize = 16;

/// One annotated literal found in code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// The whole call, `NAME(` through `)`, as written.
    pub text: &'a str,
    /// The payload between the parentheses with surrounding blanks trimmed.
    pub literal: &'a str,
    /// 1-based line of the opening parenthesis.
    pub line: u32,
    /// Byte offset of the name.
    pub offset: usize,
}

/// A scan that could not continue.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} in {file}:{line}")]
pub struct ScanError {
    /// File name used in the message.
    pub file: String,
    /// 1-based line of the offending construct. Constructs that run off
    /// the end of the file report the last line.
    pub line: u32,
    pub kind: ScanErrorKind,
}

/// What stopped the scan.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScanErrorKind {
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("unterminated character literal")]
    UnterminatedChar,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated raw string literal")]
    UnterminatedRawString,
    #[error("raw string literal delimiter too long")]
    RawStringDelimiterTooLong,
    /// A call-site that hits a newline or EOF before its `)`.
    #[error("unterminated {text}")]
    UnterminatedCall { text: String },
    /// Something other than `)` after the literal.
    #[error("unexpected characters {trailing} after {text}")]
    UnexpectedCharacters { trailing: String, text: String },
    #[error("unsupported wide char/string literal {text}")]
    WideLiteral { text: String },
    #[error("unsupported unicode/raw char/string literal {text}")]
    UnicodeLiteral { text: String },
}

/// Iterator over the call-sites of `name` in one source file.
pub struct CallSiteScanner<'a> {
    cursor: Cursor<'a>,
    name: &'a str,
    file: &'a str,
    name_finder: Finder<'a>,
    comment_end: Finder<'static>,
    /// Next occurrence of `name`, valid while it is not behind the cursor.
    name_hit: Option<usize>,
    /// No occurrence of `name` is left after `name_hit`.
    name_exhausted: bool,
    /// Line number at `counted`.
    line: u32,
    /// Position up to which newlines are already counted into `line`.
    counted: usize,
    done: bool,
}

impl<'a> CallSiteScanner<'a> {
    /// Scan `source` for call-sites of `name`. `file` only appears in
    /// error messages.
    ///
    /// An empty `name` matches nothing.
    pub fn new(source: &'a SourceBuffer, name: &'a str, file: &'a str) -> Self {
        Self {
            cursor: source.cursor(),
            name,
            file,
            name_finder: Finder::new(name),
            comment_end: Finder::new("*/"),
            name_hit: None,
            name_exhausted: false,
            line: 1,
            counted: 0,
            done: name.is_empty(),
        }
    }

    // ─── Bookkeeping ──────────────────────────────────────────────────

    /// Line number at `pos`. Positions must be queried in ascending order.
    fn line_at(&mut self, pos: usize) -> u32 {
        if pos > self.counted {
            self.line += self.cursor.count_newlines(self.counted, pos);
            self.counted = pos;
        }
        self.line
    }

    fn error(&mut self, line: u32, kind: ScanErrorKind) -> ScanError {
        self.done = true;
        ScanError {
            file: self.file.to_owned(),
            line,
            kind,
        }
    }

    fn next_name(&mut self) -> Option<usize> {
        if let Some(hit) = self.name_hit {
            if hit >= self.cursor.pos() {
                return Some(hit);
            }
        }
        if self.name_exhausted {
            return None;
        }
        self.name_hit = self.cursor.find(&self.name_finder);
        self.name_exhausted = self.name_hit.is_none();
        self.name_hit
    }

    fn next_delim(&self) -> Option<usize> {
        let mut probe = self.cursor;
        match probe.skip_to_code_delim() {
            0 => None,
            _ => Some(probe.pos()),
        }
    }

    // ─── Code ─────────────────────────────────────────────────────────

    fn scan_next(&mut self) -> Option<Result<CallSite<'a>, ScanError>> {
        loop {
            let name = self.next_name();
            let delim = self.next_delim();
            let at = earliest_of(name, delim)?;
            self.cursor.seek(at);

            if name == Some(at) {
                if let Some(result) = self.call_site(at) {
                    return Some(result);
                }
            } else if let Err(err) = self.skip_delimited(at) {
                return Some(Err(err));
            }
        }
    }

    /// Skip whatever starts with the delimiter at `start`.
    fn skip_delimited(&mut self, start: usize) -> Result<(), ScanError> {
        match self.cursor.current() {
            b'/' => match self.cursor.peek() {
                b'/' => self.cursor.eat_until_newline_or_eof(),
                b'*' => self.block_comment(start)?,
                _ => self.cursor.advance(),
            },
            b'\'' if self.is_digit_separator(start) => self.cursor.advance(),
            b'\'' => {
                let line = self.line_at(start);
                if !self.skip_quoted(b'\'') {
                    return Err(self.error(line, ScanErrorKind::UnterminatedChar));
                }
            }
            b'"' if self.has_raw_prefix(start) => self.raw_string(start)?,
            b'"' => {
                let line = self.line_at(start);
                if !self.skip_quoted(b'"') {
                    return Err(self.error(line, ScanErrorKind::UnterminatedString));
                }
            }
            _ => self.cursor.advance(),
        }
        Ok(())
    }

    fn block_comment(&mut self, start: usize) -> Result<(), ScanError> {
        self.cursor.seek(start + 2);
        match self.cursor.find(&self.comment_end) {
            Some(end) => {
                self.cursor.seek(end + 2);
                Ok(())
            }
            None => {
                let line = self.line_at(self.cursor.source_len());
                Err(self.error(line, ScanErrorKind::UnterminatedBlockComment))
            }
        }
    }

    /// Skip a quoted literal whose opening `quote` is under the cursor.
    ///
    /// Returns `false` on a newline or EOF before the closing quote.
    fn skip_quoted(&mut self, quote: u8) -> bool {
        self.cursor.advance();
        loop {
            match self.cursor.skip_to_quote_delim(quote) {
                b'\\' => {
                    self.cursor.advance();
                    if !self.cursor.is_eof() {
                        self.cursor.advance();
                    }
                }
                b'\n' | 0 => return false,
                _ => {
                    self.cursor.advance();
                    return true;
                }
            }
        }
    }

    /// Start of the identifier or number token that ends right before `pos`.
    fn token_start(&self, pos: usize, continues: impl Fn(u8) -> bool) -> usize {
        let mut start = pos;
        while start > 0 && continues(self.cursor.at(start - 1)) {
            start -= 1;
        }
        start
    }

    /// Whether the `'` at `pos` separates digit groups, as in `1'000'000`.
    fn is_digit_separator(&self, pos: usize) -> bool {
        let start = self.token_start(pos, |b| {
            b.is_ascii_alphanumeric() || matches!(b, b'_' | b'\'' | b'.')
        });
        start < pos && self.cursor.at(start).is_ascii_digit()
    }

    /// Whether the `"` at `pos` opens a raw string (`R`, `LR`, `uR`, `UR`
    /// or `u8R` right before it).
    fn has_raw_prefix(&self, pos: usize) -> bool {
        let start = self.token_start(pos, is_ident_continue);
        matches!(
            self.cursor.slice(start, pos),
            "R" | "LR" | "uR" | "UR" | "u8R"
        )
    }

    fn raw_string(&mut self, start: usize) -> Result<(), ScanError> {
        let line = self.line_at(start);
        let open = start + 1;
        let mut len = 0;
        loop {
            let at = open + len;
            if self.cursor.at(at) == b'(' {
                break;
            }
            if at >= self.cursor.source_len() || self.cursor.at(at) == b'\n' {
                let line = self.line_at(at);
                return Err(self.error(line, ScanErrorKind::UnterminatedRawString));
            }
            if len == MAX_RAW_DELIMITER {
                return Err(self.error(line, ScanErrorKind::RawStringDelimiterTooLong));
            }
            len += 1;
        }

        let end_marker = format!("){}\"", self.cursor.slice(open, open + len));
        self.cursor.seek(open + len + 1);
        match self.cursor.find(&Finder::new(&end_marker)) {
            Some(end) => {
                self.cursor.seek(end + end_marker.len());
                Ok(())
            }
            None => {
                let line = self.line_at(self.cursor.source_len());
                Err(self.error(line, ScanErrorKind::UnterminatedRawString))
            }
        }
    }

    // ─── Call-sites ───────────────────────────────────────────────────

    /// Handle an occurrence of the name at `start`.
    ///
    /// Returns `None` when the occurrence is not a call-site: part of a
    /// longer identifier, or not followed by `(`.
    fn call_site(&mut self, start: usize) -> Option<Result<CallSite<'a>, ScanError>> {
        self.cursor.seek(start + self.name.len());
        if start > 0 && is_ident_continue(self.cursor.at(start - 1)) {
            return None;
        }
        self.cursor.eat_whitespace();
        if self.cursor.current() != b'(' {
            return None;
        }

        let line = self.line_at(start);
        self.cursor.advance();
        self.cursor.eat_whitespace();
        Some(self.call_payload(start, line))
    }

    fn call_payload(&mut self, start: usize, line: u32) -> Result<CallSite<'a>, ScanError> {
        let literal_start = self.cursor.pos();

        if let Some((prefix_len, wide)) = self.unsupported_prefix() {
            let text = self
                .cursor
                .slice(start, literal_start + prefix_len + 1)
                .to_owned();
            let kind = if wide {
                ScanErrorKind::WideLiteral { text }
            } else {
                ScanErrorKind::UnicodeLiteral { text }
            };
            return Err(self.error(line, kind));
        }

        match self.cursor.current() {
            quote @ (b'"' | b'\'') => {
                if !self.skip_quoted(quote) {
                    let text = self.cursor.slice_from(start).to_owned();
                    return Err(self.error(line, ScanErrorKind::UnterminatedCall { text }));
                }
            }
            _ => self.cursor.eat_while(is_literal_byte),
        }
        let literal_end = self.cursor.pos();

        self.cursor.eat_whitespace();
        if self.cursor.current() == b')' {
            self.cursor.advance();
            return Ok(CallSite {
                text: self.cursor.slice_from(start),
                literal: self.cursor.slice(literal_start, literal_end),
                line,
                offset: start,
            });
        }

        let text = self.cursor.slice(start, literal_end).trim_end().to_owned();
        if self.cursor.is_eof() || self.cursor.current() == b'\n' {
            return Err(self.error(line, ScanErrorKind::UnterminatedCall { text }));
        }
        let trailing_start = self.cursor.pos();
        self.cursor.eat_while(|b| b != b')' && b != b'\n');
        let trailing = self.cursor.slice_from(trailing_start).trim_end().to_owned();
        Err(self.error(line, ScanErrorKind::UnexpectedCharacters { trailing, text }))
    }

    /// Length of a wide/unicode/raw literal prefix under the cursor, up to
    /// but not including its quote, and whether it is the wide `L` form.
    fn unsupported_prefix(&self) -> Option<(usize, bool)> {
        let at = |offset: usize| self.cursor.at(self.cursor.pos() + offset);
        let quote = |b: u8| b == b'"' || b == b'\'';
        let (len, wide) = match at(0) {
            b'L' => (1, true),
            b'u' if at(1) == b'8' => (2, false),
            b'u' | b'U' => (1, false),
            b'R' if quote(at(1)) => (1, false),
            _ => return None,
        };
        if quote(at(len)) {
            Some((len, wide))
        } else if at(len) == b'R' && at(len + 1) == b'"' {
            Some((len + 1, wide))
        } else {
            None
        }
    }
}

/// Bytes that can make up a numeric or keyword literal, including the `'`
/// digit separator.
fn is_literal_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'-' | b'.' | b'\'')
}

impl<'a> Iterator for CallSiteScanner<'a> {
    type Item = Result<CallSite<'a>, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.scan_next();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}

impl FusedIterator for CallSiteScanner<'_> {}
