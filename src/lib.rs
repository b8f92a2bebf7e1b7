//! vpack: a compact, self-describing binary encoding with zero-copy reads.
//!
//! Documents hold the usual interchange values (null, booleans, integers,
//! doubles, timestamps, strings, binary blobs, arrays, objects) in a form
//! that competes with JSON on size while staying addressable in place: a
//! reader locates any sub-value by constant-time offset arithmetic instead
//! of parsing the whole document.
//!
//! Encoding shape
//! - Every value starts with a head byte fixing its type and layout; all
//!   multi-byte integer fields are little-endian.
//! - Arrays and objects either carry a tail-resident offset index at one of
//!   four field widths, or use a compact varint-framed layout without an
//!   index. Object indexes are sorted by key bytes by default, enabling
//!   binary-search lookup.
//! - The [`Builder`] picks the narrowest layout when a compound closes;
//!   several encodings of the same logical value are valid on the wire.
//!
//! Performance
//! - Builders keep up to 64 bytes inline before touching the heap.
//! - [`Slice`] never allocates and never copies; it borrows the encoded
//!   bytes and decodes on the fly.
//!
//! Example
//! ```
//! use vpack::{Builder, Value};
//!
//! let mut b = Builder::new();
//! b.open_object(false)?;
//! b.add_keyed("tags", Value::Array(false))?;
//! b.add(Value::from("fast"))?;
//! b.add(Value::from("small"))?;
//! b.close()?;
//! b.add_keyed("count", Value::from(2u64))?;
//! b.close()?;
//!
//! let doc = b.slice()?;
//! assert!(doc.is_object());
//! assert_eq!(doc.get("tags")?.at(1)?.get_str()?, "small");
//! assert_eq!(doc.get("count")?.get_uint()?, 2);
//! # Ok::<(), vpack::VPackError>(())
//! ```
#![deny(missing_docs)]

/// Growable byte buffer with inline storage.
pub mod buffer;
/// Append-only document encoder.
pub mod builder;
pub(crate) mod encoding;
/// The closed error taxonomy.
pub mod error;
/// Builder policy and the attribute translator.
pub mod options;
/// Zero-copy read view.
pub mod slice;
/// Logical types and builder input values.
pub mod value;

pub use buffer::ByteBuf;
pub use builder::Builder;
pub use error::{VPackError, VPackResult};
pub use options::{AttributeTranslator, Options};
pub use slice::{ArrayIter, ObjectIter, Slice};
pub use value::{Value, ValueType};
