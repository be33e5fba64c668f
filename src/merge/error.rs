//! Error types for merge operations.

use thiserror::Error;

use crate::document::{DictionaryKind, ParseError};

use super::codec::CodecError;

/// Error type for merge operations.
///
/// Structural problems are fatal; merge conflicts are not errors and travel
/// in the merge outcome instead.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A document failed to parse.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A packed key array could not be decoded.
    #[error("bad key array in {dictionary} dictionary: {source}")]
    Codec {
        /// Which dictionary held the key array.
        dictionary: DictionaryKind,
        /// The decoding failure.
        source: CodecError,
    },

    /// Key and value entry counts differ.
    #[error("{dictionary} dictionary has {keys} keys but {values} values")]
    LengthMismatch {
        /// Which dictionary is inconsistent.
        dictionary: DictionaryKind,
        /// Number of keys found.
        keys: usize,
        /// Number of value entries found.
        values: usize,
    },

    /// The same key appeared twice in one dictionary.
    #[error("duplicate key '{key}' in {dictionary} dictionary")]
    DuplicateKey {
        /// Which dictionary holds the duplicate.
        dictionary: DictionaryKind,
        /// The duplicated key, rendered as text.
        key: String,
    },

    /// An accepted operation addressed a key the base does not have.
    #[error("no key '{key}' in base {dictionary} dictionary")]
    MissingKey {
        /// Which dictionary was addressed.
        dictionary: DictionaryKind,
        /// The missing key, rendered as text.
        key: String,
    },

    /// I/O error reading or writing a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;
