//! Zero-copy read view over encoded bytes.
//!
//! A [`Slice`] borrows a byte range and decodes types, lengths and member
//! offsets directly from it. Every accessor is a pure function of the bytes,
//! bound-checked, and fails with a typed error instead of reading past the
//! end of the range. Sub-value access is constant-time offset arithmetic for
//! the indexed layouts and a linear walk for the compact ones.
//!
//! Translated object keys (one-byte integers standing in for attribute
//! names) resolve transparently when the slice carries a reference to the
//! [`AttributeTranslator`] that produced them; [`crate::Builder::slice`]
//! attaches its own translator automatically.

use crate::encoding::integer::{decode_varint, decode_varint_tail, read_int, read_uint};
use crate::encoding::magic;
use crate::encoding::table::{tag, TagKind};
use crate::error::{VPackError, VPackResult};
use crate::options::AttributeTranslator;
use crate::value::ValueType;

const NONE_BYTES: [u8; 1] = [magic::NONE];

/// Non-owning view over one encoded value.
#[derive(Clone, Copy)]
pub struct Slice<'a> {
    data: &'a [u8],
    translator: Option<&'a AttributeTranslator>,
}

impl<'a> Slice<'a> {
    /// View the value starting at the first byte of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            translator: None,
        }
    }

    /// Like [`new`](Self::new), resolving translated keys through `translator`.
    pub fn with_translator(data: &'a [u8], translator: &'a AttributeTranslator) -> Self {
        Self {
            data,
            translator: Some(translator),
        }
    }

    pub(crate) fn with_translator_opt(
        data: &'a [u8],
        translator: Option<&'a AttributeTranslator>,
    ) -> Self {
        Self { data, translator }
    }

    /// The canonical absent value.
    pub fn none() -> Slice<'static> {
        Slice {
            data: &NONE_BYTES,
            translator: None,
        }
    }

    /// Raw bytes this slice was constructed over (may extend past the value).
    pub fn raw_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// The head byte. An empty range reads as the absence marker.
    #[inline]
    pub fn head(&self) -> u8 {
        self.data.first().copied().unwrap_or(magic::NONE)
    }

    /// Logical type of this value.
    #[inline]
    pub fn value_type(&self) -> ValueType {
        tag(self.head()).vtype
    }

    /// Whether this is the absence marker.
    pub fn is_none(&self) -> bool {
        self.value_type() == ValueType::None
    }

    /// Whether this is a null value.
    pub fn is_null(&self) -> bool {
        self.value_type() == ValueType::Null
    }

    /// Whether this is a boolean.
    pub fn is_bool(&self) -> bool {
        self.value_type() == ValueType::Bool
    }

    /// Whether this is a double.
    pub fn is_double(&self) -> bool {
        self.value_type() == ValueType::Double
    }

    /// Whether this is a millisecond timestamp.
    pub fn is_utc_date(&self) -> bool {
        self.value_type() == ValueType::UtcDate
    }

    /// Whether this is an external pointer value.
    pub fn is_external(&self) -> bool {
        self.value_type() == ValueType::External
    }

    /// Whether this is the order minimum sentinel.
    pub fn is_min_key(&self) -> bool {
        self.value_type() == ValueType::MinKey
    }

    /// Whether this is the order maximum sentinel.
    pub fn is_max_key(&self) -> bool {
        self.value_type() == ValueType::MaxKey
    }

    /// Whether this is a signed integer.
    pub fn is_int(&self) -> bool {
        self.value_type() == ValueType::Int
    }

    /// Whether this is an unsigned integer.
    pub fn is_uint(&self) -> bool {
        self.value_type() == ValueType::UInt
    }

    /// Whether this is an inline small integer.
    pub fn is_small_int(&self) -> bool {
        self.value_type() == ValueType::SmallInt
    }

    /// Whether this is any integer representation.
    pub fn is_integer(&self) -> bool {
        matches!(
            self.value_type(),
            ValueType::Int | ValueType::UInt | ValueType::SmallInt
        )
    }

    /// Whether this is an integer or double.
    pub fn is_number(&self) -> bool {
        self.is_integer() || self.is_double()
    }

    /// Whether this is a string.
    pub fn is_string(&self) -> bool {
        self.value_type() == ValueType::String
    }

    /// Whether this is a binary blob.
    pub fn is_binary(&self) -> bool {
        self.value_type() == ValueType::Binary
    }

    /// Whether this is an array.
    pub fn is_array(&self) -> bool {
        self.value_type() == ValueType::Array
    }

    /// Whether this is an object.
    pub fn is_object(&self) -> bool {
        self.value_type() == ValueType::Object
    }

    /// Whether this is a custom value.
    pub fn is_custom(&self) -> bool {
        self.value_type() == ValueType::Custom
    }

    /// Whether this is the empty array or empty object head.
    pub fn is_empty_compound(&self) -> bool {
        matches!(self.head(), magic::ARRAY_EMPTY | magic::OBJECT_EMPTY)
    }

    /// Total encoded length of this value in bytes, head included.
    pub fn byte_size(&self) -> VPackResult<usize> {
        let head = self.head();
        let entry = tag(head);
        if entry.fixed_size > 0 {
            return Ok(entry.fixed_size as usize);
        }
        match entry.kind {
            TagKind::ArrayNoIndex
            | TagKind::ArrayIndexed
            | TagKind::ObjectSorted
            | TagKind::ObjectUnsorted => {
                let width = entry.size_width as usize;
                Ok(self.read_field(1, width)? as usize)
            }
            TagKind::ArrayCompact | TagKind::ObjectCompact => {
                let mut pos = 1;
                Ok(decode_varint(self.data, &mut pos)? as usize)
            }
            TagKind::StringLong => {
                let len = self.read_field(1, 8)? as usize;
                Ok(1 + 8 + len)
            }
            TagKind::Binary => {
                let width = entry.size_width as usize;
                let len = self.read_field(1, width)? as usize;
                Ok(1 + width + len)
            }
            TagKind::Custom if entry.size_width > 0 => {
                let width = entry.size_width as usize;
                let len = self.read_field(1, width)? as usize;
                Ok(1 + width + len)
            }
            _ => Err(VPackError::InvalidValueType(
                "byte size undefined for this head",
            )),
        }
    }

    /// Number of members of an array or object.
    pub fn length(&self) -> VPackResult<usize> {
        let head = self.head();
        if head == magic::ARRAY_EMPTY || head == magic::OBJECT_EMPTY {
            return Ok(0);
        }
        let entry = tag(head);
        match entry.kind {
            TagKind::ArrayNoIndex => {
                let byte_size = self.byte_size()?;
                let data_offset = self.find_data_offset()?;
                let first = self.value_slice(data_offset, byte_size)?;
                let member_size = first.byte_size()?;
                Ok((byte_size - data_offset) / member_size)
            }
            TagKind::ArrayIndexed | TagKind::ObjectSorted | TagKind::ObjectUnsorted => {
                let width = entry.size_width as usize;
                if width == 8 {
                    let byte_size = self.byte_size()?;
                    let count_at = byte_size.checked_sub(8).ok_or(
                        VPackError::InvalidValueType("container size smaller than its fields"),
                    )?;
                    Ok(self.read_field(count_at, 8)? as usize)
                } else {
                    Ok(self.read_field(1 + width, width)? as usize)
                }
            }
            TagKind::ArrayCompact | TagKind::ObjectCompact => {
                let byte_size = self.byte_size()?;
                let body = self.bytes(0, byte_size)?;
                let (count, _) = decode_varint_tail(body)?;
                Ok(count as usize)
            }
            _ => Err(VPackError::InvalidValueType("length of a non-compound")),
        }
    }

    /// Member `index` of an array.
    pub fn at(&self, index: usize) -> VPackResult<Slice<'a>> {
        if !self.is_array() {
            return Err(VPackError::InvalidValueType("at() on a non-array"));
        }
        let n = self.length()?;
        if index >= n {
            return Err(VPackError::IndexOutOfBounds { index, len: n });
        }
        let entry = tag(self.head());
        match entry.kind {
            TagKind::ArrayNoIndex => {
                let data_offset = self.find_data_offset()?;
                let byte_size = self.byte_size()?;
                let first = self.value_slice(data_offset, byte_size)?;
                let member_size = first.byte_size()?;
                self.value_slice(data_offset + index * member_size, byte_size)
            }
            TagKind::ArrayIndexed => {
                let offset = self.index_entry(index, n)?;
                self.value_slice(offset, self.byte_size()?)
            }
            TagKind::ArrayCompact => self.nth_compact(index, 1),
            _ => Err(VPackError::InvalidValueType("at() on a non-array")),
        }
    }

    /// Key of entry `index` of an object, translated to its original string
    /// when stored as a one-byte integer.
    pub fn key_at(&self, index: usize) -> VPackResult<Slice<'a>> {
        let raw = self.key_at_raw(index)?;
        self.resolve_key(raw)
    }

    /// Key of entry `index` exactly as stored, without translation.
    pub fn key_at_raw(&self, index: usize) -> VPackResult<Slice<'a>> {
        if !self.is_object() {
            return Err(VPackError::InvalidValueType("key_at() on a non-object"));
        }
        let n = self.length()?;
        if index >= n {
            return Err(VPackError::IndexOutOfBounds { index, len: n });
        }
        match tag(self.head()).kind {
            TagKind::ObjectSorted | TagKind::ObjectUnsorted => {
                let offset = self.index_entry(index, n)?;
                self.value_slice(offset, self.byte_size()?)
            }
            TagKind::ObjectCompact => self.nth_compact(index, 2),
            _ => Err(VPackError::InvalidValueType("key_at() on a non-object")),
        }
    }

    /// Value of entry `index` of an object.
    pub fn value_at(&self, index: usize) -> VPackResult<Slice<'a>> {
        let key = self.key_at_raw(index)?;
        let key_size = key.byte_size()?;
        let key_offset = key.data.as_ptr() as usize - self.data.as_ptr() as usize;
        self.value_slice(key_offset + key_size, self.byte_size()?)
    }

    /// Look up `key` in an object. Sorted layouts binary-search the offset
    /// index; unsorted and compact layouts scan. Returns the absent slice
    /// when the key is missing.
    pub fn get(&self, key: &str) -> VPackResult<Slice<'a>> {
        if !self.is_object() {
            return Err(VPackError::InvalidValueType("get() on a non-object"));
        }
        if self.head() == magic::OBJECT_EMPTY {
            return Ok(Slice::none());
        }
        let n = self.length()?;
        let needle = key.as_bytes();
        match tag(self.head()).kind {
            TagKind::ObjectSorted => self.get_sorted(needle, n),
            TagKind::ObjectUnsorted | TagKind::ObjectCompact => {
                for i in 0..n {
                    let raw = self.key_at_raw(i)?;
                    if self.key_equals(raw, needle)? {
                        return self.value_at(i);
                    }
                }
                Ok(Slice::none())
            }
            _ => Err(VPackError::InvalidValueType("get() on a non-object")),
        }
    }

    /// Whether `key` exists in an object.
    pub fn has_key(&self, key: &str) -> VPackResult<bool> {
        Ok(!self.get(key)?.is_none())
    }

    /// Boolean payload.
    pub fn get_bool(&self) -> VPackResult<bool> {
        match self.head() {
            magic::TRUE => Ok(true),
            magic::FALSE => Ok(false),
            _ => Err(VPackError::InvalidValueType("expected a bool")),
        }
    }

    /// Double payload.
    pub fn get_double(&self) -> VPackResult<f64> {
        if self.head() != magic::DOUBLE {
            return Err(VPackError::InvalidValueType("expected a double"));
        }
        Ok(f64::from_bits(self.read_field(1, 8)?))
    }

    /// Millisecond timestamp payload.
    pub fn get_utc_date(&self) -> VPackResult<i64> {
        if self.head() != magic::UTC_DATE {
            return Err(VPackError::InvalidValueType("expected a utc-date"));
        }
        Ok(self.read_field(1, 8)? as i64)
    }

    /// Signed integer payload. Accepts `Int`, `SmallInt` and any `UInt` that
    /// fits `i64`.
    pub fn get_int(&self) -> VPackResult<i64> {
        let head = self.head();
        match self.value_type() {
            ValueType::Int => {
                let width = (head - magic::INT_BASE) as usize;
                let body = self.bytes(1, 1 + width)?;
                read_int(body, width)
            }
            ValueType::SmallInt => Ok(small_int_value(head)),
            ValueType::UInt => {
                let v = self.get_uint()?;
                if v > i64::MAX as u64 {
                    return Err(VPackError::NumberOutOfRange("uint exceeds i64"));
                }
                Ok(v as i64)
            }
            _ => Err(VPackError::InvalidValueType("expected an integer")),
        }
    }

    /// Unsigned integer payload. Accepts `UInt` and non-negative `Int` and
    /// `SmallInt`.
    pub fn get_uint(&self) -> VPackResult<u64> {
        let head = self.head();
        match self.value_type() {
            ValueType::UInt => {
                let width = (head - magic::UINT_BASE) as usize;
                let body = self.bytes(1, 1 + width)?;
                read_uint(body, width)
            }
            ValueType::Int | ValueType::SmallInt => {
                let v = self.get_int()?;
                if v < 0 {
                    return Err(VPackError::NumberOutOfRange("negative value as uint"));
                }
                Ok(v as u64)
            }
            _ => Err(VPackError::InvalidValueType("expected an integer")),
        }
    }

    /// Inline small integer payload; wider integers are narrowed when they
    /// fit the signed 64-bit range.
    pub fn get_small_int(&self) -> VPackResult<i64> {
        match self.value_type() {
            ValueType::SmallInt => Ok(small_int_value(self.head())),
            ValueType::Int | ValueType::UInt => self.get_int(),
            _ => Err(VPackError::InvalidValueType("expected an integer")),
        }
    }

    /// String payload as UTF-8.
    pub fn get_str(&self) -> VPackResult<&'a str> {
        std::str::from_utf8(self.get_string_bytes()?)
            .map_err(|_| VPackError::InvalidValueType("string payload is not UTF-8"))
    }

    /// String payload as raw bytes.
    pub fn get_string_bytes(&self) -> VPackResult<&'a [u8]> {
        let head = self.head();
        match tag(head).kind {
            TagKind::StringShort => {
                let len = (head - magic::STRING_SHORT_BASE) as usize;
                self.bytes(1, 1 + len)
            }
            TagKind::StringLong => {
                let len = self.read_field(1, 8)? as usize;
                self.bytes(9, 9 + len)
            }
            _ => Err(VPackError::InvalidValueType("expected a string")),
        }
    }

    /// Binary payload.
    pub fn get_binary(&self) -> VPackResult<&'a [u8]> {
        let entry = tag(self.head());
        if entry.kind != TagKind::Binary {
            return Err(VPackError::InvalidValueType("expected a binary blob"));
        }
        let width = entry.size_width as usize;
        let len = self.read_field(1, width)? as usize;
        self.bytes(1 + width, 1 + width + len)
    }

    /// Resolve an external value to a slice over the pointed-to bytes.
    ///
    /// # Safety
    ///
    /// The embedded pointer must reference a complete, readable encoded
    /// value that outlives the returned slice. The crate cannot check
    /// either property.
    pub unsafe fn get_external(&self) -> VPackResult<Slice<'a>> {
        if self.head() != magic::EXTERNAL {
            return Err(VPackError::InvalidValueType("expected an external"));
        }
        let width = core::mem::size_of::<usize>();
        let body = self.bytes(1, 1 + width)?;
        let mut raw = [0u8; core::mem::size_of::<usize>()];
        raw.copy_from_slice(body);
        let ptr = usize::from_ne_bytes(raw) as *const u8;
        if ptr.is_null() {
            return Err(VPackError::InternalError("external points to null"));
        }
        let total = external_byte_size(ptr)?;
        Ok(Slice {
            data: std::slice::from_raw_parts(ptr, total),
            translator: self.translator,
        })
    }

    /// Iterate the members of an array.
    pub fn array_iter(&self) -> VPackResult<ArrayIter<'a>> {
        if !self.is_array() {
            return Err(VPackError::InvalidValueType("iterating a non-array"));
        }
        let remaining = self.length()?;
        let pos = if remaining == 0 {
            0
        } else {
            self.members_offset()?
        };
        Ok(ArrayIter {
            slice: *self,
            pos,
            remaining,
        })
    }

    /// Iterate `(key, value)` entries of an object, keys translated.
    pub fn object_iter(&self) -> VPackResult<ObjectIter<'a>> {
        if !self.is_object() {
            return Err(VPackError::InvalidValueType("iterating a non-object"));
        }
        let remaining = self.length()?;
        let pos = if remaining == 0 {
            0
        } else {
            self.members_offset()?
        };
        Ok(ObjectIter {
            slice: *self,
            pos,
            remaining,
        })
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    /// Bytes `[from, to)` of the viewed range.
    fn bytes(&self, from: usize, to: usize) -> VPackResult<&'a [u8]> {
        self.data.get(from..to).ok_or(VPackError::IndexOutOfBounds {
            index: to,
            len: self.data.len(),
        })
    }

    /// Unsigned LE field of `width` bytes at `offset`.
    fn read_field(&self, offset: usize, width: usize) -> VPackResult<u64> {
        read_uint(self.bytes(offset, offset + width)?, width)
    }

    /// Sub-slice starting at `offset`, bounded by the container size.
    fn value_slice(&self, offset: usize, byte_size: usize) -> VPackResult<Slice<'a>> {
        if offset >= byte_size {
            return Err(VPackError::IndexOutOfBounds {
                index: offset,
                len: byte_size,
            });
        }
        Ok(Slice {
            data: self.bytes(offset, byte_size)?,
            translator: self.translator,
        })
    }

    /// Offset of the first member of a nonempty indexed container. Skips
    /// zero padding that other encoders may leave between the size field and
    /// the first member (a member can never start with `0x00`).
    fn find_data_offset(&self) -> VPackResult<usize> {
        let entry = tag(self.head());
        let width = entry.size_width as usize;
        let nominal = match entry.kind {
            TagKind::ArrayNoIndex => 1 + width,
            _ if width == 8 => 9,
            _ => 1 + 2 * width,
        };
        for candidate in [2usize, 3, 5] {
            if nominal <= candidate && self.bytes(candidate, candidate + 1)?[0] != 0 {
                return Ok(candidate);
            }
        }
        Ok(9)
    }

    /// Offset of the first member for any nonempty compound form.
    fn members_offset(&self) -> VPackResult<usize> {
        match tag(self.head()).kind {
            TagKind::ArrayCompact | TagKind::ObjectCompact => {
                let mut pos = 1;
                decode_varint(self.data, &mut pos)?;
                Ok(pos)
            }
            _ => self.find_data_offset(),
        }
    }

    /// Offset stored in index entry `index` of an indexed compound.
    fn index_entry(&self, index: usize, n: usize) -> VPackResult<usize> {
        let width = tag(self.head()).size_width as usize;
        let byte_size = self.byte_size()?;
        let table_len = n * width + if width == 8 { 8 } else { 0 };
        let table_start = byte_size.checked_sub(table_len).ok_or(
            VPackError::InvalidValueType("container size smaller than its offset index"),
        )?;
        Ok(self.read_field(table_start + index * width, width)? as usize)
    }

    /// Walk a compact container to its `index`-th member; object entries
    /// count `values_per_entry == 2`.
    fn nth_compact(&self, index: usize, values_per_entry: usize) -> VPackResult<Slice<'a>> {
        let byte_size = self.byte_size()?;
        let mut pos = self.members_offset()?;
        for _ in 0..index * values_per_entry {
            pos += self.value_slice(pos, byte_size)?.byte_size()?;
        }
        self.value_slice(pos, byte_size)
    }

    /// Resolve a raw key to its attribute name: strings pass through,
    /// one-byte integers go through the translator.
    fn resolve_key(&self, raw: Slice<'a>) -> VPackResult<Slice<'a>> {
        if raw.is_string() {
            return Ok(raw);
        }
        if raw.is_integer() {
            let id = raw.get_uint()?;
            let translator = self.translator.ok_or(VPackError::InternalError(
                "translated key without an attribute translator",
            ))?;
            let bytes = translator
                .encoded_key(id)?
                .ok_or(VPackError::InvalidValueType("unknown translated key id"))?;
            return Ok(Slice {
                data: bytes,
                translator: self.translator,
            });
        }
        Err(VPackError::InvalidValueType("object key is not a string"))
    }

    /// Compare a raw key against needle bytes after resolution.
    fn key_equals(&self, raw: Slice<'a>, needle: &[u8]) -> VPackResult<bool> {
        Ok(self.resolve_key(raw)?.get_string_bytes()? == needle)
    }

    /// Binary search over the sorted offset index.
    fn get_sorted(&self, needle: &[u8], n: usize) -> VPackResult<Slice<'a>> {
        let byte_size = self.byte_size()?;
        let mut lo = 0usize;
        let mut hi = n;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let offset = self.index_entry(mid, n)?;
            let raw = self.value_slice(offset, byte_size)?;
            let key_bytes = self.resolve_key(raw)?.get_string_bytes()?;
            match key_bytes.cmp(needle) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => {
                    let key_size = raw.byte_size()?;
                    return self.value_slice(offset + key_size, byte_size);
                }
            }
        }
        Ok(Slice::none())
    }
}

impl std::fmt::Debug for Slice<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slice")
            .field("type", &self.value_type())
            .field("head", &format_args!("{:#04x}", self.head()))
            .finish()
    }
}

/// Inline value of a small-int head byte.
#[inline]
fn small_int_value(head: u8) -> i64 {
    if head >= 0x3a {
        head as i64 - 0x40
    } else {
        head as i64 - magic::SMALL_INT_ZERO as i64
    }
}

/// Total byte size of the value at `ptr`, reading only bytes that belong to
/// the value itself.
///
/// # Safety
///
/// `ptr` must reference a complete readable encoded value.
unsafe fn external_byte_size(ptr: *const u8) -> VPackResult<usize> {
    let head = *ptr;
    let entry = tag(head);
    if entry.fixed_size > 0 {
        return Ok(entry.fixed_size as usize);
    }
    match entry.kind {
        TagKind::ArrayNoIndex
        | TagKind::ArrayIndexed
        | TagKind::ObjectSorted
        | TagKind::ObjectUnsorted
        | TagKind::StringLong
        | TagKind::Binary
        | TagKind::Custom => {
            let width = entry.size_width as usize;
            let prefix = std::slice::from_raw_parts(ptr, 1 + width);
            Slice::new(prefix).byte_size()
        }
        TagKind::ArrayCompact | TagKind::ObjectCompact => {
            // Read the size varint byte by byte; all of it lies inside the value.
            let mut prefix = [0u8; 1 + crate::encoding::integer::MAX_VARINT_LEN];
            prefix[0] = head;
            for i in 1..prefix.len() {
                prefix[i] = *ptr.add(i);
                if prefix[i] & 0x80 == 0 {
                    break;
                }
            }
            Slice::new(&prefix).byte_size()
        }
        _ => Err(VPackError::InvalidValueType(
            "external points to an unsized head",
        )),
    }
}

/// Iterator over array members.
pub struct ArrayIter<'a> {
    slice: Slice<'a>,
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for ArrayIter<'a> {
    type Item = VPackResult<Slice<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let byte_size = match self.slice.byte_size() {
            Ok(s) => s,
            Err(e) => return Some(Err(e)),
        };
        let member = match self.slice.value_slice(self.pos, byte_size) {
            Ok(m) => m,
            Err(e) => return Some(Err(e)),
        };
        match member.byte_size() {
            Ok(s) => self.pos += s,
            Err(e) => return Some(Err(e)),
        }
        Some(Ok(member))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Iterator over object entries as `(translated key, value)` pairs.
pub struct ObjectIter<'a> {
    slice: Slice<'a>,
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for ObjectIter<'a> {
    type Item = VPackResult<(Slice<'a>, Slice<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let entry = (|| {
            let byte_size = self.slice.byte_size()?;
            let raw_key = self.slice.value_slice(self.pos, byte_size)?;
            let key_size = raw_key.byte_size()?;
            let value = self.slice.value_slice(self.pos + key_size, byte_size)?;
            self.pos += key_size + value.byte_size()?;
            Ok((self.slice.resolve_key(raw_key)?, value))
        })();
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
