//! Append-only document encoder.
//!
//! The builder writes a well-formed document front to back while keeping a
//! stack of open compound frames. Every open compound reserves a 9-byte
//! header (head plus the widest possible byteSize field); when it closes,
//! the narrowest layout that fits its members is chosen, the payload is
//! shifted left over the unused header bytes and the offset index is
//! appended. Failed operations leave the builder exactly as the last
//! successful call did.

use crate::buffer::ByteBuf;
use crate::encoding::integer::{
    encode_uint, encode_varint, encode_varint_reversed, int_width, uint_width, varint_len,
    MAX_VARINT_LEN,
};
use crate::encoding::magic;
use crate::error::{VPackError, VPackResult};
use crate::options::Options;
use crate::slice::Slice;
use crate::value::{Value, ValueType};

/// Bytes reserved at compound open time: head + 8-byte size placeholder.
const HEADER_RESERVE: usize = 9;

/// One open compound.
#[derive(Debug)]
struct Frame {
    /// Buffer offset of the provisional head byte.
    start: usize,
    /// Absolute buffer offsets of the entry starts (key starts for objects).
    offsets: Vec<usize>,
    is_object: bool,
    /// Compact layout requested at open time or through options.
    compact: bool,
    /// Objects: build a sorted offset index at close time.
    sorted: bool,
    /// A standalone key was written and its value is still missing.
    key_pending: bool,
}

/// Append-only encoder producing a self-describing document.
///
/// ```
/// use vpack::{Builder, Value};
///
/// let mut b = Builder::new();
/// b.open_object(false)?;
/// b.add_keyed("name", Value::from("vpack"))?;
/// b.add_keyed("answer", Value::from(42i64))?;
/// b.close()?;
///
/// let slice = b.slice()?;
/// assert_eq!(slice.get("answer")?.get_int()?, 42);
/// # Ok::<(), vpack::VPackError>(())
/// ```
#[derive(Debug)]
pub struct Builder {
    buffer: ByteBuf,
    options: Options,
    stack: Vec<Frame>,
    /// A complete top-level value has been written.
    sealed_top: bool,
    /// One-shot sort override consumed by the next object open.
    sort_override: Option<bool>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Builder with default options.
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Builder with the given options.
    pub fn with_options(options: Options) -> Self {
        Self {
            buffer: ByteBuf::new(),
            options,
            stack: Vec::new(),
            sealed_top: false,
            sort_override: None,
        }
    }

    /// Builder writing into an injected buffer. Existing content is cleared;
    /// the allocation is kept.
    pub fn with_buffer(mut buffer: ByteBuf, options: Options) -> Self {
        buffer.clear();
        Self {
            buffer,
            options,
            stack: Vec::new(),
            sealed_top: false,
            sort_override: None,
        }
    }

    /// Deep-copy `slice` into a fresh builder under `options`.
    pub fn clone_slice(slice: Slice<'_>, options: Options) -> VPackResult<Builder> {
        let mut builder = Builder::with_options(options);
        builder.add_slice(slice)?;
        Ok(builder)
    }

    /// The active options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Whether no compound is currently open.
    pub fn is_closed(&self) -> bool {
        self.stack.is_empty()
    }

    /// Append a value, or open a compound for `Value::Array` / `Value::Object`.
    ///
    /// Inside an open object a bare string is accepted as a standalone key;
    /// exactly one value must follow it.
    pub fn add(&mut self, value: Value<'_>) -> VPackResult<()> {
        match self.stack.last() {
            Some(frame) if frame.is_object && !frame.key_pending => {
                let Value::String(key) = value else {
                    return Err(VPackError::BuilderKeyMustBeString);
                };
                self.check_key_free(key)?;
                let key_id = self.translate_key(key)?;
                let at = self.buffer.len();
                self.write_key(key, key_id);
                let frame = self.innermost_mut()?;
                frame.offsets.push(at);
                frame.key_pending = true;
                Ok(())
            }
            Some(frame) if frame.is_object => {
                // Completes the pending standalone key; its entry offset is
                // already recorded.
                self.check_value(&value)?;
                let parent = self.stack.len() - 1;
                self.write_value(value);
                self.stack[parent].key_pending = false;
                Ok(())
            }
            Some(_) => {
                self.check_value(&value)?;
                let parent = self.stack.len() - 1;
                let at = self.buffer.len();
                self.write_value(value);
                self.stack[parent].offsets.push(at);
                Ok(())
            }
            None => {
                if self.sealed_top {
                    return Err(VPackError::BuilderNeedOpenCompound);
                }
                self.check_value(&value)?;
                self.write_value(value);
                if self.stack.is_empty() {
                    self.sealed_top = true;
                }
                Ok(())
            }
        }
    }

    /// Append `key: value` inside an open object.
    pub fn add_keyed(&mut self, key: &str, value: Value<'_>) -> VPackResult<()> {
        let frame = match self.stack.last() {
            Some(frame) if frame.is_object => frame,
            _ => return Err(VPackError::BuilderNeedOpenObject),
        };
        if frame.key_pending {
            return Err(VPackError::BuilderKeyAlreadyWritten(key.to_owned()));
        }
        self.check_key_free(key)?;
        self.check_value(&value)?;
        let key_id = self.translate_key(key)?;
        let parent = self.stack.len() - 1;
        let at = self.buffer.len();
        self.write_key(key, key_id);
        self.write_value(value);
        self.stack[parent].offsets.push(at);
        Ok(())
    }

    /// Append an already encoded value verbatim. Inside an open object a
    /// string slice acts as a standalone key (stored untranslated).
    pub fn add_slice(&mut self, slice: Slice<'_>) -> VPackResult<()> {
        let size = slice.byte_size()?;
        let bytes =
            slice
                .raw_bytes()
                .get(..size)
                .ok_or(VPackError::IndexOutOfBounds {
                    index: size,
                    len: slice.raw_bytes().len(),
                })?;
        if slice.is_external() && self.options.disallow_externals {
            return Err(VPackError::BuilderExternalsDisallowed);
        }
        match self.stack.last() {
            Some(frame) if frame.is_object && !frame.key_pending => {
                if !slice.is_string() {
                    return Err(VPackError::BuilderKeyMustBeString);
                }
                let key = slice.get_str()?;
                self.check_key_free(key)?;
                let at = self.buffer.len();
                self.buffer.extend_from_slice(bytes);
                let frame = self.innermost_mut()?;
                frame.offsets.push(at);
                frame.key_pending = true;
                Ok(())
            }
            Some(frame) if frame.is_object => {
                let parent = self.stack.len() - 1;
                self.buffer.extend_from_slice(bytes);
                self.stack[parent].key_pending = false;
                Ok(())
            }
            Some(_) => {
                let parent = self.stack.len() - 1;
                let at = self.buffer.len();
                self.buffer.extend_from_slice(bytes);
                self.stack[parent].offsets.push(at);
                Ok(())
            }
            None => {
                if self.sealed_top {
                    return Err(VPackError::BuilderNeedOpenCompound);
                }
                self.buffer.extend_from_slice(bytes);
                self.sealed_top = true;
                Ok(())
            }
        }
    }

    /// Append `key` with an already encoded value.
    pub fn add_keyed_slice(&mut self, key: &str, slice: Slice<'_>) -> VPackResult<()> {
        let size = slice.byte_size()?;
        let bytes =
            slice
                .raw_bytes()
                .get(..size)
                .ok_or(VPackError::IndexOutOfBounds {
                    index: size,
                    len: slice.raw_bytes().len(),
                })?;
        if slice.is_external() && self.options.disallow_externals {
            return Err(VPackError::BuilderExternalsDisallowed);
        }
        let frame = match self.stack.last() {
            Some(frame) if frame.is_object => frame,
            _ => return Err(VPackError::BuilderNeedOpenObject),
        };
        if frame.key_pending {
            return Err(VPackError::BuilderKeyAlreadyWritten(key.to_owned()));
        }
        self.check_key_free(key)?;
        let key_id = self.translate_key(key)?;
        let parent = self.stack.len() - 1;
        let at = self.buffer.len();
        self.write_key(key, key_id);
        self.buffer.extend_from_slice(bytes);
        self.stack[parent].offsets.push(at);
        Ok(())
    }

    /// Open a compound of `vtype`. Only arrays and objects accept the
    /// unindexed flag; every other type is refused.
    pub fn open(&mut self, vtype: ValueType, unindexed: bool) -> VPackResult<()> {
        let value = match vtype {
            ValueType::Array => Value::Array(unindexed),
            ValueType::Object => Value::Object(unindexed),
            _ => {
                return Err(VPackError::InvalidValueType(
                    "only arrays and objects can be opened",
                ))
            }
        };
        if let Some(frame) = self.stack.last() {
            if frame.is_object && !frame.key_pending {
                return Err(VPackError::BuilderNeedOpenArray);
            }
        }
        self.add(value)
    }

    /// Open an array; `compact` requests the unindexed layout.
    pub fn open_array(&mut self, compact: bool) -> VPackResult<()> {
        self.open(ValueType::Array, compact)
    }

    /// Open an object; `compact` requests the unindexed layout. Whether the
    /// offset index is sorted follows `sort_attribute_names`.
    pub fn open_object(&mut self, compact: bool) -> VPackResult<()> {
        self.open(ValueType::Object, compact)
    }

    /// Open an object with an explicit sorting decision, overriding the
    /// `sort_attribute_names` option for this one compound.
    pub fn open_object_sorted(&mut self, compact: bool, sorted: bool) -> VPackResult<()> {
        self.sort_override = Some(sorted);
        let result = self.open(ValueType::Object, compact);
        self.sort_override = None;
        result
    }

    /// Finalize the innermost open compound, choosing the narrowest layout
    /// that holds its members.
    pub fn close(&mut self) -> VPackResult<()> {
        let (start, n, is_object, compact, sorted, key_pending) = match self.stack.last() {
            None => return Err(VPackError::BuilderNeedOpenCompound),
            Some(frame) => (
                frame.start,
                frame.offsets.len(),
                frame.is_object,
                frame.compact,
                frame.sorted,
                frame.key_pending,
            ),
        };
        if key_pending {
            return Err(VPackError::BuilderNeedSubvalue);
        }

        if n == 0 {
            self.buffer.truncate(start);
            self.buffer.push(if is_object {
                magic::OBJECT_EMPTY
            } else {
                magic::ARRAY_EMPTY
            });
        } else if compact {
            self.close_compact(start, n, is_object);
        } else if is_object {
            self.close_object(start, sorted)?;
        } else {
            self.close_array(start);
        }

        self.stack.pop();
        if self.stack.is_empty() {
            self.sealed_top = true;
        }
        log::trace!(
            "closed compound at offset {start}: head {:#04x}, {} bytes, {n} members",
            self.buffer[start],
            self.buffer.len() - start,
        );
        Ok(())
    }

    /// Drop the last entry of the innermost open compound.
    pub fn remove_last(&mut self) -> VPackResult<()> {
        let frame = match self.stack.last_mut() {
            None => return Err(VPackError::BuilderNeedOpenCompound),
            Some(frame) => frame,
        };
        let Some(offset) = frame.offsets.pop() else {
            return Err(VPackError::BuilderNeedSubvalue);
        };
        frame.key_pending = false;
        self.buffer.truncate(offset);
        Ok(())
    }

    /// Whether the innermost open object already holds `key`.
    pub fn has_key(&self, key: &str) -> VPackResult<bool> {
        Ok(!self.get_key(key)?.is_none())
    }

    /// Value stored under `key` in the innermost open object, or the absent
    /// slice. A standalone key whose value is still pending is not visible.
    pub fn get_key(&self, key: &str) -> VPackResult<Slice<'_>> {
        let frame = match self.stack.last() {
            Some(frame) if frame.is_object => frame,
            _ => return Err(VPackError::BuilderNeedOpenObject),
        };
        let complete = frame.offsets.len() - usize::from(frame.key_pending);
        for &offset in &frame.offsets[..complete] {
            if self.key_matches(offset, key.as_bytes())? {
                let raw = self.slice_at(offset);
                let key_size = raw.byte_size()?;
                return Ok(self.slice_at(offset + key_size));
            }
        }
        Ok(Slice::none())
    }

    /// Total size in bytes of the sealed document.
    pub fn size(&self) -> VPackResult<usize> {
        if !self.is_closed() {
            return Err(VPackError::BuilderNotSealed);
        }
        Ok(self.buffer.len())
    }

    /// View the sealed document.
    pub fn slice(&self) -> VPackResult<Slice<'_>> {
        if !self.is_closed() {
            return Err(VPackError::BuilderNotSealed);
        }
        Ok(Slice::with_translator_opt(
            self.buffer.as_slice(),
            self.options.attribute_translator.as_deref(),
        ))
    }

    /// Surrender the buffer; the builder resets and stays usable.
    pub fn steal(&mut self) -> ByteBuf {
        self.stack.clear();
        self.sealed_top = false;
        std::mem::take(&mut self.buffer)
    }

    /// Reset to the empty state, keeping buffer capacity and options.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.stack.clear();
        self.sealed_top = false;
    }

    // ------------------------------------------------------------------
    // value encoding
    // ------------------------------------------------------------------

    /// Reject payloads that cannot be written, before any byte is emitted.
    fn check_value(&self, value: &Value<'_>) -> VPackResult<()> {
        match value {
            Value::Bcd => Err(VPackError::NotImplemented("bcd values")),
            Value::External(ptr) => {
                if self.options.disallow_externals {
                    Err(VPackError::BuilderExternalsDisallowed)
                } else if ptr.is_null() {
                    Err(VPackError::BuilderUnexpectedValue("null external pointer"))
                } else {
                    Ok(())
                }
            }
            Value::SmallInt(v) => {
                if (-6..=9).contains(v) {
                    Ok(())
                } else {
                    Err(VPackError::NumberOutOfRange(
                        "small int must lie in [-6, 9]",
                    ))
                }
            }
            Value::Custom(bytes) => match bytes.first() {
                Some(&head) if head >= magic::CUSTOM_FIRST => Ok(()),
                _ => Err(VPackError::BuilderUnexpectedType(
                    "custom payload must start with a custom head byte",
                )),
            },
            Value::Array(_) | Value::Object(_) => {
                let depth = self.stack.len() + 1;
                if depth > self.options.max_depth {
                    Err(VPackError::TooDeepNesting {
                        depth,
                        max: self.options.max_depth,
                    })
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Emit a value already vetted by [`check_value`](Self::check_value).
    fn write_value(&mut self, value: Value<'_>) {
        match value {
            Value::Null => self.buffer.push(magic::NULL),
            Value::Bool(true) => self.buffer.push(magic::TRUE),
            Value::Bool(false) => self.buffer.push(magic::FALSE),
            Value::Double(v) => {
                self.buffer.push(magic::DOUBLE);
                self.buffer.extend_from_slice(&v.to_bits().to_le_bytes());
            }
            Value::UtcDate(ms) => {
                self.buffer.push(magic::UTC_DATE);
                self.buffer.extend_from_slice(&(ms as u64).to_le_bytes());
            }
            Value::External(ptr) => {
                self.buffer.push(magic::EXTERNAL);
                self.buffer.extend_from_slice(&(ptr as usize).to_ne_bytes());
            }
            Value::MinKey => self.buffer.push(magic::MIN_KEY),
            Value::MaxKey => self.buffer.push(magic::MAX_KEY),
            Value::Int(v) => self.write_int(v),
            Value::UInt(v) => self.write_uint(v),
            Value::SmallInt(v) => self.write_small_int(v as i64),
            Value::String(s) => self.write_string(s),
            Value::Binary(bytes) => {
                let width = uint_width(bytes.len() as u64);
                self.buffer.push(magic::BINARY_BASE + width as u8);
                let buffer = &mut self.buffer;
                encode_uint(bytes.len() as u64, width, |b| buffer.push(b));
                self.buffer.extend_from_slice(bytes);
            }
            Value::Custom(bytes) => self.buffer.extend_from_slice(bytes),
            Value::Array(compact) => self.open_frame(false, compact),
            Value::Object(compact) => self.open_frame(true, compact),
            Value::Bcd => unreachable!("rejected by check_value"),
        }
    }

    fn write_int(&mut self, v: i64) {
        if (-6..=9).contains(&v) {
            return self.write_small_int(v);
        }
        let width = int_width(v);
        self.buffer.push(magic::INT_BASE + width as u8);
        let buffer = &mut self.buffer;
        encode_uint(v as u64, width, |b| buffer.push(b));
    }

    fn write_uint(&mut self, v: u64) {
        if v <= 9 {
            return self.write_small_int(v as i64);
        }
        let width = uint_width(v);
        self.buffer.push(magic::UINT_BASE + width as u8);
        let buffer = &mut self.buffer;
        encode_uint(v, width, |b| buffer.push(b));
    }

    fn write_small_int(&mut self, v: i64) {
        let head = if v >= 0 {
            magic::SMALL_INT_ZERO + v as u8
        } else {
            (0x40 + v) as u8
        };
        self.buffer.push(head);
    }

    fn write_string(&mut self, s: &str) {
        let bytes = s.as_bytes();
        if bytes.len() <= magic::STRING_SHORT_MAX_LEN {
            self.buffer
                .push(magic::STRING_SHORT_BASE + bytes.len() as u8);
        } else {
            self.buffer.push(magic::STRING_LONG);
            self.buffer
                .extend_from_slice(&(bytes.len() as u64).to_le_bytes());
        }
        self.buffer.extend_from_slice(bytes);
    }

    /// Write an object key, as a one-byte integer when translated.
    fn write_key(&mut self, key: &str, key_id: Option<u8>) {
        match key_id {
            Some(id) if id <= 9 => self.buffer.push(magic::SMALL_INT_ZERO + id),
            Some(id) => {
                self.buffer.push(magic::UINT_BASE + 1);
                self.buffer.push(id);
            }
            None => self.write_string(key),
        }
    }

    fn open_frame(&mut self, is_object: bool, compact: bool) {
        let compact = compact
            || if is_object {
                self.options.build_unindexed_objects
            } else {
                self.options.build_unindexed_arrays
            };
        let sorted = self
            .sort_override
            .take()
            .unwrap_or(self.options.sort_attribute_names);
        let start = self.buffer.len();
        // Provisional head; close() rewrites it.
        self.buffer.push(if is_object {
            magic::OBJECT_SORTED_BASE + 1
        } else {
            magic::ARRAY_INDEXED_BASE + 1
        });
        self.buffer.extend_from_slice(&[0u8; HEADER_RESERVE - 1]);
        self.stack.push(Frame {
            start,
            offsets: Vec::new(),
            is_object,
            compact,
            sorted,
            key_pending: false,
        });
    }

    // ------------------------------------------------------------------
    // close-time layout selection
    // ------------------------------------------------------------------

    fn close_array(&mut self, start: usize) {
        let offsets = self.current_offsets();
        let n = offsets.len();
        let payload_start = start + HEADER_RESERVE;
        let payload_len = self.buffer.len() - payload_start;

        // Equal member sizes allow the form without an offset index.
        let mut sizes = Vec::with_capacity(n);
        for (i, &offset) in offsets.iter().enumerate() {
            let end = offsets.get(i + 1).copied().unwrap_or(self.buffer.len());
            sizes.push(end - offset);
        }
        let equal_sized = sizes.windows(2).all(|pair| pair[0] == pair[1]);

        if equal_sized {
            let width = fit_width(|width| 1 + width + payload_len, n, false);
            let data_offset = 1 + width;
            self.buffer.shift_tail(payload_start, start + data_offset);
            self.buffer.as_mut_slice()[start] =
                magic::ARRAY_UNINDEXED_BASE + magic::selector_for_width(width);
            self.write_size_field(start + 1, (1 + width + payload_len) as u64, width);
            return;
        }

        let width = fit_width(
            |width| data_offset_for(width) + payload_len + n * width + tail_count_len(width),
            n,
            true,
        );
        let data_offset = data_offset_for(width);
        let gap = HEADER_RESERVE - data_offset;
        self.buffer.shift_tail(payload_start, start + data_offset);
        let total = data_offset + payload_len + n * width + tail_count_len(width);
        self.buffer.as_mut_slice()[start] =
            magic::ARRAY_INDEXED_BASE + magic::selector_for_width(width);
        self.write_size_field(start + 1, total as u64, width);
        if width < 8 {
            self.write_size_field(start + 1 + width, n as u64, width);
        }
        for &offset in &offsets {
            let rel = offset - start - gap;
            let buffer = &mut self.buffer;
            encode_uint(rel as u64, width, |b| buffer.push(b));
        }
        if width == 8 {
            self.buffer.extend_from_slice(&(n as u64).to_le_bytes());
        }
    }

    fn close_object(&mut self, start: usize, sorted: bool) -> VPackResult<()> {
        let offsets = self.current_offsets();
        let n = offsets.len();
        let payload_start = start + HEADER_RESERVE;
        let payload_len = self.buffer.len() - payload_start;

        // Resolve every key up front; sorting and the uniqueness check work
        // on the original attribute names, translated keys included.
        let mut order: Vec<(usize, Vec<u8>)> = Vec::with_capacity(n);
        for &offset in &offsets {
            order.push((offset, self.resolved_key_bytes(offset)?));
        }
        if sorted && n > 1 {
            order.sort_by(|a, b| a.1.cmp(&b.1));
        }
        if self.options.check_attribute_uniqueness && n > 1 {
            check_unique(&order, sorted)?;
        }

        let width = fit_width(
            |width| data_offset_for(width) + payload_len + n * width + tail_count_len(width),
            n,
            true,
        );
        let data_offset = data_offset_for(width);
        let gap = HEADER_RESERVE - data_offset;
        self.buffer.shift_tail(payload_start, start + data_offset);
        let total = data_offset + payload_len + n * width + tail_count_len(width);
        let base = if sorted {
            magic::OBJECT_SORTED_BASE
        } else {
            magic::OBJECT_UNSORTED_BASE
        };
        self.buffer.as_mut_slice()[start] = base + magic::selector_for_width(width);
        self.write_size_field(start + 1, total as u64, width);
        if width < 8 {
            self.write_size_field(start + 1 + width, n as u64, width);
        }
        for (offset, _) in &order {
            let rel = offset - start - gap;
            let buffer = &mut self.buffer;
            encode_uint(rel as u64, width, |b| buffer.push(b));
        }
        if width == 8 {
            self.buffer.extend_from_slice(&(n as u64).to_le_bytes());
        }
        Ok(())
    }

    /// Compact close. The byteSize varint width is a fixpoint: the size
    /// covers the head, the varint itself, the members and the count
    /// trailer, so widening the varint can push the size over the next
    /// boundary and widen it again.
    fn close_compact(&mut self, start: usize, n: usize, is_object: bool) {
        let payload_start = start + HEADER_RESERVE;
        let payload_len = self.buffer.len() - payload_start;
        let count_len = varint_len(n as u64);

        let mut size_len = 1;
        let total = loop {
            let total = 1 + size_len + payload_len + count_len;
            let need = varint_len(total as u64);
            if need == size_len {
                break total;
            }
            size_len = need;
        };

        self.buffer.shift_tail(payload_start, start + 1 + size_len);
        self.buffer.as_mut_slice()[start] = if is_object {
            magic::OBJECT_COMPACT
        } else {
            magic::ARRAY_COMPACT
        };
        let mut scratch = [0u8; MAX_VARINT_LEN];
        let mut written = 0;
        encode_varint(total as u64, |b| {
            scratch[written] = b;
            written += 1;
        });
        self.buffer.write_at(start + 1, &scratch[..written]);
        let buffer = &mut self.buffer;
        encode_varint_reversed(n as u64, |b| buffer.push(b));
    }

    // ------------------------------------------------------------------
    // key handling
    // ------------------------------------------------------------------

    fn translate_key(&self, key: &str) -> VPackResult<Option<u8>> {
        match &self.options.attribute_translator {
            Some(translator) => translator.translate(key),
            None => Ok(None),
        }
    }

    /// Fail if the innermost open object already holds `key`.
    fn check_key_free(&self, key: &str) -> VPackResult<()> {
        let frame = match self.stack.last() {
            Some(frame) if frame.is_object => frame,
            _ => return Ok(()),
        };
        let complete = frame.offsets.len() - usize::from(frame.key_pending);
        for &offset in &frame.offsets[..complete] {
            if self.key_matches(offset, key.as_bytes())? {
                return Err(VPackError::BuilderKeyAlreadyWritten(key.to_owned()));
            }
        }
        Ok(())
    }

    fn key_matches(&self, offset: usize, needle: &[u8]) -> VPackResult<bool> {
        let raw = self.slice_at(offset);
        if raw.is_string() {
            return Ok(raw.get_string_bytes()? == needle);
        }
        if raw.is_integer() {
            let id = raw.get_uint()?;
            let translator = self.options.attribute_translator.as_deref().ok_or(
                VPackError::InternalError("translated key without an attribute translator"),
            )?;
            return Ok(translator
                .name_of(id)?
                .is_some_and(|name| name.as_bytes() == needle));
        }
        Err(VPackError::InvalidValueType("stored key is not a string"))
    }

    /// Attribute name bytes of the key stored at `offset`.
    fn resolved_key_bytes(&self, offset: usize) -> VPackResult<Vec<u8>> {
        let raw = self.slice_at(offset);
        if raw.is_string() {
            return Ok(raw.get_string_bytes()?.to_vec());
        }
        if raw.is_integer() {
            let id = raw.get_uint()?;
            let translator = self.options.attribute_translator.as_deref().ok_or(
                VPackError::InternalError("translated key without an attribute translator"),
            )?;
            let name = translator
                .name_of(id)?
                .ok_or(VPackError::InvalidValueType("unknown translated key id"))?;
            return Ok(name.as_bytes().to_vec());
        }
        Err(VPackError::InvalidValueType("stored key is not a string"))
    }

    // ------------------------------------------------------------------
    // helpers
    // ------------------------------------------------------------------

    fn innermost_mut(&mut self) -> VPackResult<&mut Frame> {
        self.stack
            .last_mut()
            .ok_or(VPackError::BuilderNeedOpenCompound)
    }

    fn current_offsets(&self) -> Vec<usize> {
        match self.stack.last() {
            Some(frame) => frame.offsets.clone(),
            None => Vec::new(),
        }
    }

    fn slice_at(&self, offset: usize) -> Slice<'_> {
        Slice::with_translator_opt(
            &self.buffer.as_slice()[offset..],
            self.options.attribute_translator.as_deref(),
        )
    }

    fn write_size_field(&mut self, at: usize, value: u64, width: usize) {
        let mut scratch = [0u8; 8];
        let mut written = 0;
        encode_uint(value, width, |b| {
            scratch[written] = b;
            written += 1;
        });
        self.buffer.write_at(at, &scratch[..width]);
    }
}

/// Offset of the first member for an indexed layout of the given width.
fn data_offset_for(width: usize) -> usize {
    if width == 8 {
        HEADER_RESERVE
    } else {
        1 + 2 * width
    }
}

/// Extra tail bytes of the 8-byte layout, which stores nrItems at the end.
fn tail_count_len(width: usize) -> usize {
    if width == 8 {
        8
    } else {
        0
    }
}

/// Attribute uniqueness re-check at close time over resolved key bytes.
fn check_unique(order: &[(usize, Vec<u8>)], already_sorted: bool) -> VPackResult<()> {
    let mut keys: Vec<&[u8]> = order.iter().map(|(_, key)| key.as_slice()).collect();
    if !already_sorted {
        keys.sort();
    }
    for pair in keys.windows(2) {
        if pair[0] == pair[1] {
            let name = String::from_utf8_lossy(pair[0]).into_owned();
            return Err(VPackError::DuplicateAttributeName(name));
        }
    }
    Ok(())
}

/// Smallest width in {1, 2, 4, 8} whose unsigned range holds the total size
/// produced by `total_for` (and the member count, for indexed layouts).
fn fit_width(total_for: impl Fn(usize) -> usize, n: usize, indexed: bool) -> usize {
    for width in [1usize, 2, 4] {
        let fits_count = !indexed || n as u64 <= magic::unsigned_max(width);
        if fits_count && total_for(width) as u64 <= magic::unsigned_max(width) {
            return width;
        }
    }
    8
}
