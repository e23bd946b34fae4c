//! Typed literal parsers for tweakable constants.
//!
//! Every annotated literal records a [`Parser`] chosen from the Rust type it
//! was first evaluated with (see [`Tweak`]). Built-in types parse through
//! their [`LiteralKind`]; other types bring their own parse function. On
//! reload the parser turns the new source text back into a [`Value`]:
//!
//! - `Ok(value)`: the text is a valid literal of exactly this kind.
//! - `Err(Rejection::Recompile)`: the text is not representable as a value
//!   swap (different suffix, half-typed edit, out of range). A rebuild may
//!   make sense of it.
//! - `Err(Rejection::Error)`: the text is a literal this crate will never
//!   accept, such as an unsupported escape sequence.
//!
//! Rejections are reported through `tracing` at the point of failure, so
//! callers only need to propagate the verdict.

mod parse;
mod tweak;
mod value;

pub use parse::Rejection;
pub use tweak::{Long, LongDouble, Parser, Tweak, ULong};
pub use value::{LiteralKind, Value, STORAGE_SIZE};
