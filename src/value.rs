//! Logical value types and the input values consumed by the builder.

use strum::{EnumIs, EnumIter};

/// The logical type of an encoded value, recovered from its head byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumIs)]
pub enum ValueType {
    /// Absence marker; not storable inside a document.
    None,
    /// The permanently invalid head `0x17`.
    Illegal,
    /// Null.
    Null,
    /// Boolean.
    Bool,
    /// IEEE-754 double, 8 raw little-endian bytes.
    Double,
    /// Signed 64-bit milliseconds since the Unix epoch.
    UtcDate,
    /// Raw pointer into foreign memory.
    External,
    /// Sentinel ordered before every other value.
    MinKey,
    /// Sentinel ordered after every other value.
    MaxKey,
    /// Signed integer with a 1 to 8 byte body.
    Int,
    /// Unsigned integer with a 1 to 8 byte body.
    UInt,
    /// Inline signed integer in `[-6, 9]`.
    SmallInt,
    /// UTF-8 string, short or long form.
    String,
    /// Binary blob with a length prefix.
    Binary,
    /// Array.
    Array,
    /// Object.
    Object,
    /// Binary-coded decimal, reserved and unimplemented.
    Bcd,
    /// User-defined opaque payload in the custom head range.
    Custom,
}

impl ValueType {
    /// Short lowercase name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::None => "none",
            ValueType::Illegal => "illegal",
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Double => "double",
            ValueType::UtcDate => "utc-date",
            ValueType::External => "external",
            ValueType::MinKey => "min-key",
            ValueType::MaxKey => "max-key",
            ValueType::Int => "int",
            ValueType::UInt => "uint",
            ValueType::SmallInt => "smallint",
            ValueType::String => "string",
            ValueType::Binary => "binary",
            ValueType::Array => "array",
            ValueType::Object => "object",
            ValueType::Bcd => "bcd",
            ValueType::Custom => "custom",
        }
    }
}

/// A value handed to the builder.
///
/// Scalar variants carry their payload; `Array` and `Object` open a compound
/// (the flag requests the compact, unindexed layout). The builder chooses the
/// narrowest on-wire form: `Int` in `[-6, 9]` and `UInt` in `[0, 9]` encode
/// as inline small integers, wider values get a minimal-width body.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    /// Null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Double.
    Double(f64),
    /// Millisecond timestamp.
    UtcDate(i64),
    /// Pointer to an encoded value in foreign memory.
    External(*const u8),
    /// Order minimum sentinel.
    MinKey,
    /// Order maximum sentinel.
    MaxKey,
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Inline integer; out-of-range payloads are rejected.
    SmallInt(i8),
    /// UTF-8 string.
    String(&'a str),
    /// Binary blob.
    Binary(&'a [u8]),
    /// Pre-encoded custom value, first byte in `0xf0..=0xff`.
    Custom(&'a [u8]),
    /// Open an array; `true` requests the compact layout.
    Array(bool),
    /// Open an object; `true` requests the compact layout.
    Object(bool),
    /// Reserved; appending fails with `NotImplemented`.
    Bcd,
}

impl Value<'_> {
    /// Logical type this value will encode as.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Double(_) => ValueType::Double,
            Value::UtcDate(_) => ValueType::UtcDate,
            Value::External(_) => ValueType::External,
            Value::MinKey => ValueType::MinKey,
            Value::MaxKey => ValueType::MaxKey,
            Value::Int(_) => ValueType::Int,
            Value::UInt(_) => ValueType::UInt,
            Value::SmallInt(_) => ValueType::SmallInt,
            Value::String(_) => ValueType::String,
            Value::Binary(_) => ValueType::Binary,
            Value::Custom(_) => ValueType::Custom,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
            Value::Bcd => ValueType::Bcd,
        }
    }

    /// Whether this value opens an array or object.
    pub fn is_compound(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<i32> for Value<'_> {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value<'_> {
    fn from(v: u32) -> Self {
        Value::UInt(v as u64)
    }
}

impl From<u64> for Value<'_> {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::String(v)
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::Binary(v)
    }
}
