use pretty_assertions::assert_eq;

use super::*;

fn padding(buf: &SourceBuffer) -> &[u8] {
    &buf.buf.as_bytes()[buf.source_len..]
}

// === Construction ===

#[test]
fn empty_source() {
    let buf = SourceBuffer::new("");
    assert_eq!(buf.source_len, 0);
    assert_eq!(buf.cursor().current(), 0);
    assert!(buf.cursor().is_eof());
}

#[test]
fn ascii_source() {
    let buf = SourceBuffer::new("T_(42)");
    assert_eq!(buf.source_len, 6);
    assert_eq!(&buf.buf[..6], "T_(42)");
    assert_eq!(padding(&buf)[0], 0);
}

#[test]
fn utf8_multibyte_source() {
    let source = "// \u{1F600}\nT_(1)";
    let buf = SourceBuffer::new(source);
    assert_eq!(buf.source_len, source.len());
    assert_eq!(buf.cursor().slice(0, source.len()), source);
}

// === Padding ===

#[test]
fn buffer_padded_to_cache_line() {
    for len in [0, 1, 59, 60, 61, 62, 63, 64, 65, 200] {
        let source = "x".repeat(len);
        let buf = SourceBuffer::new(&source);
        let total = buf.buf.len();
        assert_eq!(total % CACHE_LINE, 0, "len {len}");
        assert!(padding(&buf).len() >= LOOKAHEAD, "len {len} is short of lookahead");
    }
}

#[test]
fn padding_is_all_zero() {
    let buf = SourceBuffer::new("abc");
    assert!(padding(&buf).iter().all(|&b| b == 0));
}

#[test]
fn lookahead_past_a_full_line_stays_in_bounds() {
    let source = "y".repeat(62);
    let buf = SourceBuffer::new(&source);
    assert_eq!(buf.buf.len(), 128);
    let cursor = buf.cursor();
    assert_eq!(cursor.at(62 + LOOKAHEAD - 1), 0);
}
