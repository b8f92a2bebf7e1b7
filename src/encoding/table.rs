//! The 256-entry type tag table.
//!
//! Maps every possible head byte to its logical type, payload kind, the
//! width of its size field and, where the head alone determines it, the full
//! byte size of the value. Built once at compile time; both the slice and
//! the builder dispatch on it.

use crate::value::ValueType;

use super::magic;

/// Payload layout category of a head byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// Fixed-size scalar value.
    Scalar,
    /// Short string with the length inline in the head.
    StringShort,
    /// Long string with an 8-byte length prefix.
    StringLong,
    /// Binary blob with a 1 to 8 byte length prefix.
    Binary,
    /// Array without an offset index, equally sized members.
    ArrayNoIndex,
    /// Array with a trailing offset index.
    ArrayIndexed,
    /// Compact array with varint size and count.
    ArrayCompact,
    /// Object with a sorted offset index.
    ObjectSorted,
    /// Object with an insertion-ordered offset index.
    ObjectUnsorted,
    /// Compact object with varint size and count.
    ObjectCompact,
    /// Pointer to foreign memory.
    External,
    /// User-defined opaque payload.
    Custom,
    /// Reserved or invalid head.
    Reserved,
}

/// One tag table entry.
#[derive(Debug, Clone, Copy)]
pub struct TagEntry {
    /// Logical type of values with this head.
    pub vtype: ValueType,
    /// Payload layout category.
    pub kind: TagKind,
    /// Width in bytes of the byteSize or length field (0 if none).
    pub size_width: u8,
    /// Total byte size when fixed by the head alone (0 if dynamic).
    pub fixed_size: u8,
}

const RESERVED: TagEntry = TagEntry {
    vtype: ValueType::None,
    kind: TagKind::Reserved,
    size_width: 0,
    fixed_size: 0,
};

const fn scalar(vtype: ValueType, fixed_size: u8) -> TagEntry {
    TagEntry {
        vtype,
        kind: TagKind::Scalar,
        size_width: 0,
        fixed_size,
    }
}

const fn compound(vtype: ValueType, kind: TagKind, size_width: u8) -> TagEntry {
    TagEntry {
        vtype,
        kind,
        size_width,
        fixed_size: 0,
    }
}

const fn build_table() -> [TagEntry; 256] {
    let mut table = [RESERVED; 256];

    table[magic::ARRAY_EMPTY as usize] = scalar(ValueType::Array, 1);
    table[magic::OBJECT_EMPTY as usize] = scalar(ValueType::Object, 1);

    let mut sel = 1u8;
    while sel <= 4 {
        let width = magic::width_for_selector(sel) as u8;
        table[(magic::ARRAY_UNINDEXED_BASE + sel) as usize] =
            compound(ValueType::Array, TagKind::ArrayNoIndex, width);
        table[(magic::ARRAY_INDEXED_BASE + sel) as usize] =
            compound(ValueType::Array, TagKind::ArrayIndexed, width);
        table[(magic::OBJECT_SORTED_BASE + sel) as usize] =
            compound(ValueType::Object, TagKind::ObjectSorted, width);
        table[(magic::OBJECT_UNSORTED_BASE + sel) as usize] =
            compound(ValueType::Object, TagKind::ObjectUnsorted, width);
        sel += 1;
    }

    table[magic::ARRAY_COMPACT as usize] =
        compound(ValueType::Array, TagKind::ArrayCompact, 0);
    table[magic::OBJECT_COMPACT as usize] =
        compound(ValueType::Object, TagKind::ObjectCompact, 0);

    table[magic::ILLEGAL as usize] = TagEntry {
        vtype: ValueType::Illegal,
        kind: TagKind::Reserved,
        size_width: 0,
        fixed_size: 0,
    };

    table[magic::NULL as usize] = scalar(ValueType::Null, 1);
    table[magic::FALSE as usize] = scalar(ValueType::Bool, 1);
    table[magic::TRUE as usize] = scalar(ValueType::Bool, 1);
    table[magic::DOUBLE as usize] = scalar(ValueType::Double, 9);
    table[magic::UTC_DATE as usize] = scalar(ValueType::UtcDate, 9);
    table[magic::EXTERNAL as usize] = TagEntry {
        vtype: ValueType::External,
        kind: TagKind::External,
        size_width: 0,
        fixed_size: 1 + core::mem::size_of::<usize>() as u8,
    };
    table[magic::MIN_KEY as usize] = scalar(ValueType::MinKey, 1);
    table[magic::MAX_KEY as usize] = scalar(ValueType::MaxKey, 1);

    let mut body = 1u8;
    while body <= 8 {
        table[(magic::INT_BASE + body) as usize] = scalar(ValueType::Int, 1 + body);
        table[(magic::UINT_BASE + body) as usize] = scalar(ValueType::UInt, 1 + body);
        body += 1;
    }

    let mut head = magic::SMALL_INT_ZERO;
    while head <= magic::SMALL_INT_LAST {
        table[head as usize] = scalar(ValueType::SmallInt, 1);
        head += 1;
    }

    let mut len = 0u16;
    while len <= magic::STRING_SHORT_MAX_LEN as u16 {
        table[(magic::STRING_SHORT_BASE as u16 + len) as usize] = TagEntry {
            vtype: ValueType::String,
            kind: TagKind::StringShort,
            size_width: 0,
            fixed_size: (1 + len) as u8,
        };
        len += 1;
    }
    table[magic::STRING_LONG as usize] = compound(ValueType::String, TagKind::StringLong, 8);

    let mut lw = 1u8;
    while lw <= 8 {
        table[(magic::BINARY_BASE + lw) as usize] =
            compound(ValueType::Binary, TagKind::Binary, lw);
        lw += 1;
    }

    let mut i = 0u8;
    while i < 4 {
        let payload = 1u8 << i;
        table[(magic::CUSTOM_FIXED_BASE + i) as usize] = TagEntry {
            vtype: ValueType::Custom,
            kind: TagKind::Custom,
            size_width: 0,
            fixed_size: 1 + payload,
        };
        table[(magic::CUSTOM_PREFIXED_BASE + i) as usize] = TagEntry {
            vtype: ValueType::Custom,
            kind: TagKind::Custom,
            size_width: payload,
            fixed_size: 0,
        };
        i += 1;
    }
    let mut head = 0xf8u16;
    while head <= magic::CUSTOM_LAST as u16 {
        table[head as usize] = TagEntry {
            vtype: ValueType::Custom,
            kind: TagKind::Reserved,
            size_width: 0,
            fixed_size: 0,
        };
        head += 1;
    }

    table
}

/// The tag table, indexed by head byte.
pub static TAG_TABLE: [TagEntry; 256] = build_table();

/// Look up the entry for a head byte.
#[inline]
pub fn tag(head: u8) -> &'static TagEntry {
    &TAG_TABLE[head as usize]
}
