//! Growable byte buffer backing a builder.
//!
//! Keeps up to 64 bytes inline before spilling to the heap, so small
//! documents never allocate. Growth is geometric through the underlying
//! storage. The buffer is single-owner; a builder surrenders it through
//! [`crate::Builder::steal`] and keeps working with a fresh one.

use std::ops::Deref;

use smallvec::SmallVec;

/// Inline capacity in bytes before the buffer spills to the heap.
pub const INLINE_CAPACITY: usize = 64;

/// Contiguous growable byte store with inline storage for small documents.
#[derive(Debug, Default, Clone)]
pub struct ByteBuf {
    data: SmallVec<[u8; INLINE_CAPACITY]>,
}

impl ByteBuf {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            data: SmallVec::new(),
        }
    }

    /// Create an empty buffer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: SmallVec::with_capacity(capacity),
        }
    }

    /// Reserve room for at least `additional` more bytes.
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    /// Append a single byte.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.data.push(byte);
    }

    /// Append a run of bytes.
    #[inline]
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Number of bytes written.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drop all content, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Shorten the buffer to `len` bytes.
    pub fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Grow or shrink to `len` bytes, zero-filling new space.
    pub fn resize(&mut self, len: usize) {
        self.data.resize(len, 0);
    }

    /// View of the written bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Mutable view of the written bytes.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Overwrite bytes starting at `pos`. The range must already be written.
    pub fn write_at(&mut self, pos: usize, bytes: &[u8]) {
        self.data[pos..pos + bytes.len()].copy_from_slice(bytes);
    }

    /// Move the tail starting at `from` so it begins at `to`, adjusting the
    /// length. Used when a container header shrinks or grows after its
    /// members are in place.
    pub fn shift_tail(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let tail_len = self.data.len() - from;
        if to > from {
            self.data.resize(to + tail_len, 0);
        }
        self.data.copy_within(from..from + tail_len, to);
        self.data.truncate(to + tail_len);
    }
}

impl Deref for ByteBuf {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl AsRef<[u8]> for ByteBuf {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_inline_below_capacity() {
        let mut buf = ByteBuf::new();
        for i in 0..INLINE_CAPACITY {
            buf.push(i as u8);
        }
        assert!(!buf.data.spilled());
        buf.push(0xff);
        assert!(buf.data.spilled());
        assert_eq!(buf.len(), INLINE_CAPACITY + 1);
    }

    #[test]
    fn shift_tail_left() {
        let mut buf = ByteBuf::new();
        buf.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        buf.shift_tail(6, 2);
        assert_eq!(buf.as_slice(), &[1, 2, 7, 8, 9]);
    }

    #[test]
    fn shift_tail_right() {
        let mut buf = ByteBuf::new();
        buf.extend_from_slice(&[1, 2, 3, 4]);
        buf.shift_tail(2, 5);
        assert_eq!(buf.len(), 7);
        assert_eq!(&buf.as_slice()[5..], &[3, 4]);
    }

    #[test]
    fn write_at_overwrites_in_place() {
        let mut buf = ByteBuf::new();
        buf.extend_from_slice(&[0; 8]);
        buf.write_at(3, &[0xaa, 0xbb]);
        assert_eq!(buf.as_slice(), &[0, 0, 0, 0xaa, 0xbb, 0, 0, 0]);
    }
}
