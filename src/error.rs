//! Typed failures raised by library and blueprint lookups.
//!
//! Only the checked accessors fail. Filters and construction never do; an
//! empty library is the answer to "nothing matched".

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LibraryError {
    /// Keyed lookup on a library that has no such blueprint.
    #[error("blueprint '{key}' not found")]
    BlueprintNotFound { key: String },

    /// Positional lookup past the end of the library.
    #[error("index out of range: index {index} for library of {len} blueprints")]
    IndexOutOfRange { index: usize, len: usize },

    /// Attribute lookup on a blueprint that does not declare it.
    #[error("attribute '{name}' not found")]
    AttributeNotFound { name: String },
}
