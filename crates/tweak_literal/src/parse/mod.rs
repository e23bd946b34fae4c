//! Per-kind literal parse routines.
//!
//! Each routine works on the trimmed call-site payload and logs why it
//! rejected the text before returning the verdict.

mod character;
mod floating;
mod integer;

pub(crate) use character::{boolean, character};
pub(crate) use floating::floating;
pub(crate) use integer::{narrow, signed, unsigned};

use tracing::warn;

/// Why a literal could not be turned into a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The text may become valid after a rebuild (suffix or type changed,
    /// edit in progress, value out of range).
    Recompile,
    /// The text is malformed in a way a rebuild will not fix.
    Error,
}

/// Check the text left over after the numeric part against the required
/// suffix.
///
/// `what` completes the phrase "after an integer literal" / "after a
/// floating-point literal".
fn expect_suffix(text: &str, rest: &str, expected: &str, what: &str) -> Result<(), Rejection> {
    if rest.eq_ignore_ascii_case(expected) {
        return Ok(());
    }

    if rest.bytes().all(|b| b.is_ascii_alphabetic()) {
        let expected = if expected.is_empty() {
            "no suffix"
        } else {
            expected
        };
        warn!("{text} has an unexpected suffix, expected {expected}");
    } else {
        warn!("unexpected characters {rest} after {what}");
    }
    Err(Rejection::Recompile)
}
