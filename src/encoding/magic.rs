//! Head-byte constants for the wire format.
//!
//! Conventions:
//! - Every encoded value starts with one head byte that fixes its type and
//!   layout; multi-byte integer fields are little-endian.
//! - Compound heads come in four widths (1/2/4/8 bytes) for their byteSize
//!   and offset fields; `BASE + 1..=4` selects the width.
//! - Compact compounds replace fixed-width fields with varints, see
//!   [`super::integer`].

/// Absence marker, never valid inside an encoded document.
pub const NONE: u8 = 0x00;

// Array heads
pub const ARRAY_EMPTY: u8 = 0x01;
pub const ARRAY_UNINDEXED_BASE: u8 = 0x01; // +1..+4: byteSize width 1/2/4/8, no offset table
pub const ARRAY_INDEXED_BASE: u8 = 0x05; // +1..+4: byteSize/nrItems/offsets width 1/2/4/8

// Object heads
pub const OBJECT_EMPTY: u8 = 0x0a;
pub const OBJECT_SORTED_BASE: u8 = 0x0a; // +1..+4: index sorted by key bytes
pub const OBJECT_UNSORTED_BASE: u8 = 0x0e; // +1..+4: index in insertion order

// Compact compounds: byteSize as forward varint after the head, nrItems as a
// tail-reversed varint at the end, no offset table.
pub const ARRAY_COMPACT: u8 = 0x13;
pub const OBJECT_COMPACT: u8 = 0x14;

/// Permanently invalid head.
pub const ILLEGAL: u8 = 0x17;

// Scalars
pub const NULL: u8 = 0x18;
pub const FALSE: u8 = 0x19;
pub const TRUE: u8 = 0x1a;
pub const DOUBLE: u8 = 0x1b; // 8 raw little-endian IEEE-754 bytes
pub const UTC_DATE: u8 = 0x1c; // signed millisecond timestamp, 8 bytes two's complement
pub const EXTERNAL: u8 = 0x1d; // native pointer-sized raw payload
pub const MIN_KEY: u8 = 0x1e;
pub const MAX_KEY: u8 = 0x1f;

// Integers
pub const INT_BASE: u8 = 0x1f; // +1..+8: signed body length, two's complement LE
pub const UINT_BASE: u8 = 0x27; // +1..+8: unsigned body length, LE
pub const SMALL_INT_ZERO: u8 = 0x30; // 0x30..0x39: 0..9, 0x3a..0x3f: -6..-1
pub const SMALL_INT_LAST: u8 = 0x3f;

// Strings
pub const STRING_SHORT_BASE: u8 = 0x40; // +0..+126: inline length
pub const STRING_SHORT_MAX_LEN: usize = 126;
pub const STRING_LONG: u8 = 0xbf; // 8-byte LE length follows the head

// Binary blobs: +1..+8 selects the width of the LE length field.
pub const BINARY_BASE: u8 = 0xbf;

// Custom values. 0xf0..0xf3 carry 1/2/4/8 fixed payload bytes; 0xf4..0xf7
// carry a 1/2/4/8-byte LE length field followed by that many payload bytes.
// 0xf8..0xff are reserved.
pub const CUSTOM_FIRST: u8 = 0xf0;
pub const CUSTOM_FIXED_BASE: u8 = 0xf0;
pub const CUSTOM_PREFIXED_BASE: u8 = 0xf4;
pub const CUSTOM_LAST: u8 = 0xff;

/// Field width in bytes for a compound width selector in `1..=4`.
#[inline]
pub const fn width_for_selector(selector: u8) -> usize {
    1usize << (selector - 1)
}

/// Width selector in `1..=4` for a field width in {1, 2, 4, 8}.
#[inline]
pub const fn selector_for_width(width: usize) -> u8 {
    match width {
        1 => 1,
        2 => 2,
        4 => 3,
        _ => 4,
    }
}

/// Largest value an unsigned little-endian field of `width` bytes can hold.
#[inline]
pub const fn unsigned_max(width: usize) -> u64 {
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    }
}
