//! Literal kinds and the fixed-size value storage they parse into.

use crate::parse::{self, Rejection};

/// The literal form a registered slot expects on reload.
///
/// One variant per supported C-family literal type. Built-in
/// [`Tweak`](crate::Tweak) implementations parse reloaded text through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// `int`, no suffix.
    Int,
    /// `unsigned int`, suffix `u`.
    UnsignedInt,
    /// `long`, suffix `l`.
    Long,
    /// `unsigned long`, suffix `ul`.
    UnsignedLong,
    /// `long long`, suffix `ll`.
    LongLong,
    /// `unsigned long long`, suffix `ull`.
    UnsignedLongLong,
    /// `float`, suffix `f`.
    Float,
    /// `double`, no suffix.
    Double,
    /// `long double`, suffix `l`.
    LongDouble,
    /// `char`, a single-quoted single byte.
    Char,
    /// `bool`, the keywords `true` and `false`.
    Bool,
}

impl LiteralKind {
    /// All kinds, in declaration order.
    pub const ALL: [LiteralKind; 11] = [
        LiteralKind::Int,
        LiteralKind::UnsignedInt,
        LiteralKind::Long,
        LiteralKind::UnsignedLong,
        LiteralKind::LongLong,
        LiteralKind::UnsignedLongLong,
        LiteralKind::Float,
        LiteralKind::Double,
        LiteralKind::LongDouble,
        LiteralKind::Char,
        LiteralKind::Bool,
    ];

    /// The C spelling of the type, used in diagnostics.
    pub const fn type_name(self) -> &'static str {
        match self {
            LiteralKind::Int => "int",
            LiteralKind::UnsignedInt => "unsigned int",
            LiteralKind::Long => "long",
            LiteralKind::UnsignedLong => "unsigned long",
            LiteralKind::LongLong => "long long",
            LiteralKind::UnsignedLongLong => "unsigned long long",
            LiteralKind::Float => "float",
            LiteralKind::Double => "double",
            LiteralKind::LongDouble => "long double",
            LiteralKind::Char => "char",
            LiteralKind::Bool => "bool",
        }
    }

    /// The literal suffix this kind requires (matched case-insensitively).
    ///
    /// Empty for kinds without a suffix, including `char` and `bool`.
    pub const fn suffix(self) -> &'static str {
        match self {
            LiteralKind::UnsignedInt => "u",
            LiteralKind::Long | LiteralKind::LongDouble => "l",
            LiteralKind::UnsignedLong => "ul",
            LiteralKind::LongLong => "ll",
            LiteralKind::UnsignedLongLong => "ull",
            LiteralKind::Float => "f",
            LiteralKind::Int | LiteralKind::Double | LiteralKind::Char | LiteralKind::Bool => "",
        }
    }

    /// Parse `text` as a literal of this kind.
    ///
    /// `text` is the trimmed payload of a call-site, e.g. `-0x2aul` or
    /// `'a'`. Never returns a "no change" verdict; comparing against the
    /// stored value is the caller's job.
    pub fn parse(self, text: &str) -> Result<Value, Rejection> {
        match self {
            LiteralKind::Int => parse::signed(text, self).map(Value::Int),
            LiteralKind::UnsignedInt => parse::unsigned(text, self, u64::from(u32::MAX))
                .and_then(|v| parse::narrow(text, self, v))
                .map(Value::UnsignedInt),
            LiteralKind::Long => parse::signed(text, self).map(Value::Long),
            LiteralKind::UnsignedLong => {
                parse::unsigned(text, self, u64::MAX).map(Value::UnsignedLong)
            }
            LiteralKind::LongLong => parse::signed(text, self).map(Value::LongLong),
            LiteralKind::UnsignedLongLong => {
                parse::unsigned(text, self, u64::MAX).map(Value::UnsignedLongLong)
            }
            LiteralKind::Float => parse::floating::<f32>(text, self).map(Value::Float),
            LiteralKind::Double => parse::floating::<f64>(text, self).map(Value::Double),
            LiteralKind::LongDouble => parse::floating::<f64>(text, self).map(Value::LongDouble),
            LiteralKind::Char => parse::character(text).map(Value::Char),
            LiteralKind::Bool => parse::boolean(text).map(Value::Bool),
        }
    }
}

impl std::fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Bytes available to a user-defined [`Tweak`](crate::Tweak) type.
pub const STORAGE_SIZE: usize = 16;

/// Current value of a registered slot.
///
/// A tagged union over every [`LiteralKind`], plus raw bytes for
/// user-defined types. The tag always agrees with the parser the slot was
/// registered with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    UnsignedInt(u32),
    Long(i64),
    UnsignedLong(u64),
    LongLong(i64),
    UnsignedLongLong(u64),
    Float(f32),
    Double(f64),
    LongDouble(f64),
    Char(char),
    Bool(bool),
    /// Encoded by the type's own [`Tweak::into_value`](crate::Tweak::into_value).
    Custom([u8; STORAGE_SIZE]),
}

/// Slot storage is the custom payload plus one word for the tag.
const _: () = assert!(std::mem::size_of::<Value>() <= STORAGE_SIZE + 8);

impl Value {
    /// Pack `bytes` into custom storage, zero-padded.
    ///
    /// Returns `None` if `bytes` is longer than [`STORAGE_SIZE`].
    pub fn custom(bytes: &[u8]) -> Option<Value> {
        let mut storage = [0; STORAGE_SIZE];
        storage.get_mut(..bytes.len())?.copy_from_slice(bytes);
        Some(Value::Custom(storage))
    }

    /// The custom payload, if this is one.
    pub const fn custom_bytes(&self) -> Option<&[u8; STORAGE_SIZE]> {
        match self {
            Value::Custom(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The literal kind this value belongs to, `None` for custom values.
    pub const fn kind(&self) -> Option<LiteralKind> {
        Some(match self {
            Value::Int(_) => LiteralKind::Int,
            Value::UnsignedInt(_) => LiteralKind::UnsignedInt,
            Value::Long(_) => LiteralKind::Long,
            Value::UnsignedLong(_) => LiteralKind::UnsignedLong,
            Value::LongLong(_) => LiteralKind::LongLong,
            Value::UnsignedLongLong(_) => LiteralKind::UnsignedLongLong,
            Value::Float(_) => LiteralKind::Float,
            Value::Double(_) => LiteralKind::Double,
            Value::LongDouble(_) => LiteralKind::LongDouble,
            Value::Char(_) => LiteralKind::Char,
            Value::Bool(_) => LiteralKind::Bool,
            Value::Custom(_) => return None,
        })
    }

    /// Bit-for-bit equality.
    ///
    /// Unlike `==`, distinguishes `0.0` from `-0.0`, so flipping the sign of
    /// a zero literal counts as an update. This is a deliberate departure
    /// from plain value equality, which would report such an edit as no
    /// change.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) | (Value::LongDouble(a), Value::LongDouble(b)) => {
                a.to_bits() == b.to_bits()
            }
            _ => self == other,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}
