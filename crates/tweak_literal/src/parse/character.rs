//! Character and boolean literals.

use tracing::{error, warn};

use super::Rejection;

/// Parse a single-quoted, single-byte character literal.
///
/// The only escape understood is `\'`. Any other escape is a hard error.
pub(crate) fn character(text: &str) -> Result<char, Rejection> {
    let bytes = text.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'\'' || bytes[bytes.len() - 1] != b'\'' {
        warn!("{text} is not a character literal");
        return Err(Rejection::Recompile);
    }

    if bytes[1] == b'\\' {
        if text == r"'\''" {
            return Ok('\'');
        }
        error!("escape sequences in char literals are not implemented, sorry");
        return Err(Rejection::Error);
    }

    if bytes.len() != 3 {
        warn!("{text} is not a character literal");
        return Err(Rejection::Recompile);
    }
    Ok(char::from(bytes[1]))
}

/// Parse the keywords `true` and `false`.
pub(crate) fn boolean(text: &str) -> Result<bool, Rejection> {
    match text {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => {
            warn!("{text} is not a boolean literal");
            Err(Rejection::Recompile)
        }
    }
}
