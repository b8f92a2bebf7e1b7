//! Error taxonomy shared by the builder and slice layers.
//!
//! Every failure has a stable enumerated kind. Operations short-circuit on
//! error and leave the builder in the state of the last successful call, so
//! callers can recover by dropping or clearing the builder.

use thiserror::Error;

/// All failure kinds produced by this crate.
#[derive(Debug, Error)]
pub enum VPackError {
    /// The builder still has an open compound and cannot be read.
    #[error("builder value is not sealed yet")]
    BuilderNotSealed,

    /// The operation requires an open array or object.
    #[error("builder needs an open array or object")]
    BuilderNeedOpenCompound,

    /// The operation requires the innermost open compound to be an object.
    #[error("builder needs an open object")]
    BuilderNeedOpenObject,

    /// A compound was opened positionally while an object expects a key.
    #[error("builder needs an open array")]
    BuilderNeedOpenArray,

    /// The open compound has no sub-value to operate on.
    #[error("builder needs a sub-value")]
    BuilderNeedSubvalue,

    /// A non-string value arrived where an object key was expected.
    #[error("object attribute key must be a string")]
    BuilderKeyMustBeString,

    /// The key was already written, either as a pending standalone key or as
    /// an existing attribute of the open object.
    #[error("attribute key '{0}' was already written")]
    BuilderKeyAlreadyWritten(String),

    /// Attribute uniqueness check at close time found a duplicate.
    #[error("duplicate attribute name '{0}'")]
    DuplicateAttributeName(String),

    /// Nesting exceeded the configured maximum depth.
    #[error("nesting too deep ({depth} levels, maximum {max})")]
    TooDeepNesting {
        /// Depth the operation tried to reach.
        depth: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The value type cannot be appended in this position.
    #[error("unexpected value type: {0}")]
    BuilderUnexpectedType(&'static str),

    /// The payload does not fit the requested value type.
    #[error("unexpected value payload: {0}")]
    BuilderUnexpectedValue(&'static str),

    /// The value type is invalid for the requested operation.
    #[error("invalid value type: {0}")]
    InvalidValueType(&'static str),

    /// A number does not fit the requested representation.
    #[error("number out of range: {0}")]
    NumberOutOfRange(&'static str),

    /// Externals are disallowed by the active options.
    #[error("external values are disallowed by options")]
    BuilderExternalsDisallowed,

    /// The feature is reserved but not implemented (BCD).
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// An internal precondition was violated.
    #[error("internal error: {0}")]
    InternalError(&'static str),

    /// Malformed input on the parse side of the shared taxonomy.
    #[error("parse error: {0}")]
    ParseError(&'static str),

    /// A control character appeared where none is allowed (parse side).
    #[error("unexpected control character")]
    UnexpectedControlCharacter,

    /// A member index or byte offset lies outside the accessible range.
    #[error("index out of bounds ({index} >= {len})")]
    IndexOutOfBounds {
        /// Requested index or offset.
        index: usize,
        /// Number of accessible members or bytes.
        len: usize,
    },
}

/// Result alias used throughout the crate.
pub type VPackResult<T> = Result<T, VPackError>;
