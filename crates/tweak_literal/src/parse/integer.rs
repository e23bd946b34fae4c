//! Integer literals: sign, base prefix, digits, suffix.

use tracing::warn;

use super::{expect_suffix, Rejection};
use crate::LiteralKind;

/// An integer literal split into its parts, before range checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct IntegerParts<'a> {
    pub negative: bool,
    /// `None` if the digits overflow `u64`.
    pub magnitude: Option<u64>,
    pub suffix: &'a str,
}

/// Split `text` into sign, magnitude and whatever follows the digits.
///
/// `0x`/`0X` selects hex, `0b`/`0B` binary, and any other leading `0` octal.
/// A digit separator (`'`) is skipped when it sits between two digits of
/// the selected base.
pub(super) fn split_integer(text: &str) -> Result<IntegerParts<'_>, Rejection> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let mut negative = false;
    match bytes.first() {
        Some(b'+') => pos = 1,
        Some(b'-') => {
            negative = true;
            pos = 1;
        }
        _ => {}
    }

    let rest = &bytes[pos..];
    let (radix, prefix_len, mut seen_digit) = match rest {
        [b'0', b'x' | b'X', ..] => (16, 2, false),
        [b'0', b'b' | b'B', ..] => (2, 2, false),
        // The leading zero of an octal literal is itself a digit.
        [b'0', ..] => (8, 1, true),
        _ => (10, 0, false),
    };
    pos += prefix_len;

    let digit = |b: u8| char::from(b).to_digit(radix);
    let mut magnitude = Some(0u64);
    while let Some(&b) = bytes.get(pos) {
        if b == b'\'' && seen_digit && bytes.get(pos + 1).copied().and_then(digit).is_some() {
            pos += 1;
            continue;
        }
        let Some(d) = digit(b) else { break };
        magnitude = magnitude
            .and_then(|m| m.checked_mul(u64::from(radix)))
            .and_then(|m| m.checked_add(u64::from(d)));
        seen_digit = true;
        pos += 1;
    }

    if !seen_digit {
        warn!("{text} is not an integer literal");
        return Err(Rejection::Recompile);
    }

    Ok(IntegerParts {
        negative,
        magnitude,
        suffix: &text[pos..],
    })
}

fn out_of_range(text: &str, kind: LiteralKind) -> Rejection {
    warn!("{text} is out of range for {kind}");
    Rejection::Recompile
}

/// Parse a signed integer literal of `kind` into `T`.
pub(crate) fn signed<T: TryFrom<i128>>(text: &str, kind: LiteralKind) -> Result<T, Rejection> {
    let parts = split_integer(text)?;
    expect_suffix(text, parts.suffix, kind.suffix(), "an integer literal")?;

    let magnitude = parts
        .magnitude
        .map(i128::from)
        .ok_or_else(|| out_of_range(text, kind))?;
    let value = if parts.negative {
        -magnitude
    } else {
        magnitude
    };
    T::try_from(value).map_err(|_| out_of_range(text, kind))
}

/// Parse an unsigned integer literal of `kind` whose type holds at most
/// `max`.
///
/// A leading minus wraps around the way it does for the native type, so
/// `-1u` yields `max`.
pub(crate) fn unsigned(text: &str, kind: LiteralKind, max: u64) -> Result<u64, Rejection> {
    let parts = split_integer(text)?;
    expect_suffix(text, parts.suffix, kind.suffix(), "an integer literal")?;

    let magnitude = parts
        .magnitude
        .filter(|&m| m <= max)
        .ok_or_else(|| out_of_range(text, kind))?;
    Ok(if parts.negative {
        magnitude.wrapping_neg() & max
    } else {
        magnitude
    })
}

/// Narrow an already range-checked value to its storage type.
pub(crate) fn narrow<T: TryFrom<u64>>(text: &str, kind: LiteralKind, value: u64) -> Result<T, Rejection> {
    T::try_from(value).map_err(|_| out_of_range(text, kind))
}
