//! Floating-point literals: mantissa with a mandatory decimal point,
//! optional exponent, suffix.

use std::str::FromStr;

use tracing::warn;

use super::{expect_suffix, Rejection};
use crate::LiteralKind;

/// Length of the numeric part of `text`, or `None` if it is not a
/// floating-point literal.
///
/// The mantissa must contain a `.` so that an integer literal is never taken
/// for a float. An `e`/`E` only counts as an exponent if at least one digit
/// follows it (after an optional sign); otherwise it is left for the suffix
/// check.
fn numeric_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut pos = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let mut digits = 0;
    let mut dot = false;
    while let Some(&b) = bytes.get(pos) {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' if !dot => dot = true,
            b'\'' if digits > 0 && bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) => {}
            _ => break,
        }
        pos += 1;
    }
    if digits == 0 || !dot {
        return None;
    }

    if let Some(b'e' | b'E') = bytes.get(pos) {
        let mut exp = pos + 1;
        if let Some(b'+' | b'-') = bytes.get(exp) {
            exp += 1;
        }
        let exp_digits = bytes[exp.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }
    Some(pos)
}

/// Parse a floating-point literal of `kind` into `T`.
pub(crate) fn floating<T: FromStr>(text: &str, kind: LiteralKind) -> Result<T, Rejection> {
    let Some(len) = numeric_len(text) else {
        warn!("{text} is not a floating-point literal");
        return Err(Rejection::Recompile);
    };
    expect_suffix(text, &text[len..], kind.suffix(), "a floating-point literal")?;

    let number = &text[..len];
    let parsed = if number.contains('\'') {
        number.replace('\'', "").parse()
    } else {
        number.parse()
    };
    parsed.map_err(|_| {
        warn!("{text} is not a floating-point literal");
        Rejection::Recompile
    })
}
