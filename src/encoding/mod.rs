//! Encoding internals shared by the builder and slice layers.
//!
//! Three small pieces live here:
//! - [`magic`]: the head-byte constants of the wire format;
//! - [`integer`]: varints and minimal-width little-endian integers;
//! - [`table`]: the 256-entry tag table mapping each head byte to its
//!   logical type, payload layout and size rule.
//!
//! Everything is branch-light and allocation-free; the slice decodes by
//! table lookup plus at most one size-field read.

pub mod integer;
pub mod magic;
pub mod table;
