//! Mapping from Rust types to literal parsers.
//!
//! Only types implementing [`Tweak`] can be annotated. Every built-in
//! [`LiteralKind`] has an implementation here; C integer widths without a
//! dedicated Rust primitive get thin newtypes: [`Long`] (`l`), [`ULong`]
//! (`ul`) and [`LongDouble`] (`l` on a floating-point literal). Other types
//! implement [`Tweak`] themselves and store their bytes in
//! [`Value::Custom`].

use std::fmt;

use crate::{LiteralKind, Rejection, Value, STORAGE_SIZE};

/// A type that can back a tweakable literal.
///
/// ```
/// use tweak_literal::{Parser, Rejection, Tweak, Value};
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// struct Percent(u8);
///
/// impl Tweak for Percent {
///     fn parse(text: &str) -> Result<Self, Rejection> {
///         let digits = text.strip_suffix("_pct").ok_or(Rejection::Recompile)?;
///         match digits.parse() {
///             Ok(n) if n <= 100 => Ok(Percent(n)),
///             _ => Err(Rejection::Recompile),
///         }
///     }
///
///     fn into_value(self) -> Value {
///         Value::Custom([self.0; 16])
///     }
///
///     fn from_value(value: Value) -> Option<Self> {
///         value.custom_bytes().map(|bytes| Percent(bytes[0]))
///     }
/// }
///
/// let parser = Parser::of::<Percent>();
/// assert_eq!(parser.parse("40_pct"), Ok(Percent(40).into_value()));
/// assert_eq!(parser.parse("140_pct"), Err(Rejection::Recompile));
/// ```
pub trait Tweak: Copy + 'static {
    /// Parse the literal text of an edited call-site.
    fn parse(text: &str) -> Result<Self, Rejection>;

    /// Wrap `self` into slot storage.
    fn into_value(self) -> Value;

    /// Read a value back out of slot storage.
    ///
    /// Returns `None` when the storage holds a different type.
    fn from_value(value: Value) -> Option<Self>;
}

/// Type-erased parser recorded on a slot at registration.
///
/// Reloads of the slot's call-site go through it, so each slot keeps parsing
/// with the type it was first evaluated with.
#[derive(Clone, Copy)]
pub struct Parser {
    type_name: &'static str,
    parse: fn(&str) -> Result<Value, Rejection>,
}

impl Parser {
    /// The parser for `T`.
    ///
    /// Fails to compile if `T` is larger than [`STORAGE_SIZE`].
    pub fn of<T: Tweak>() -> Parser {
        const {
            assert!(
                std::mem::size_of::<T>() <= STORAGE_SIZE,
                "tweakable types must fit in slot storage"
            );
        }
        Parser {
            type_name: std::any::type_name::<T>(),
            parse: parse_value::<T>,
        }
    }

    /// Parse `text` into slot storage.
    pub fn parse(self, text: &str) -> Result<Value, Rejection> {
        (self.parse)(text)
    }

    /// Name of the Rust type behind this parser.
    pub fn type_name(self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Parser").field(&self.type_name).finish()
    }
}

impl From<LiteralKind> for Parser {
    fn from(kind: LiteralKind) -> Self {
        match kind {
            LiteralKind::Int => Parser::of::<i32>(),
            LiteralKind::UnsignedInt => Parser::of::<u32>(),
            LiteralKind::Long => Parser::of::<Long>(),
            LiteralKind::UnsignedLong => Parser::of::<ULong>(),
            LiteralKind::LongLong => Parser::of::<i64>(),
            LiteralKind::UnsignedLongLong => Parser::of::<u64>(),
            LiteralKind::Float => Parser::of::<f32>(),
            LiteralKind::Double => Parser::of::<f64>(),
            LiteralKind::LongDouble => Parser::of::<LongDouble>(),
            LiteralKind::Char => Parser::of::<char>(),
            LiteralKind::Bool => Parser::of::<bool>(),
        }
    }
}

fn parse_value<T: Tweak>(text: &str) -> Result<Value, Rejection> {
    T::parse(text).map(T::into_value)
}

/// C `long`, written with an `l` suffix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Long(pub i64);

/// C `unsigned long`, written with a `ul` suffix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ULong(pub u64);

/// C `long double`, written with an `l` suffix after a decimal point.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct LongDouble(pub f64);

macro_rules! newtype_conversions {
    ($($wrapper:ident($inner:ty)),* $(,)?) => {$(
        impl From<$inner> for $wrapper {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$wrapper> for $inner {
            fn from(value: $wrapper) -> Self {
                value.0
            }
        }
    )*};
}

newtype_conversions!(Long(i64), ULong(u64), LongDouble(f64));

macro_rules! impl_tweak {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        #[allow(clippy::useless_conversion, reason = "primitives convert to themselves")]
        impl Tweak for $ty {
            fn parse(text: &str) -> Result<Self, Rejection> {
                LiteralKind::$kind
                    .parse(text)
                    .and_then(|value| Self::from_value(value).ok_or(Rejection::Error))
            }

            fn into_value(self) -> Value {
                Value::$kind(self.into())
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$kind(v) => Some(v.into()),
                    _ => None,
                }
            }
        }
    )*};
}

impl_tweak! {
    i32 => Int,
    u32 => UnsignedInt,
    Long => Long,
    ULong => UnsignedLong,
    i64 => LongLong,
    u64 => UnsignedLongLong,
    f32 => Float,
    f64 => Double,
    LongDouble => LongDouble,
    char => Char,
    bool => Bool,
}
