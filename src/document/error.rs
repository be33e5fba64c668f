//! Error types for document parsing.

use thiserror::Error;

use super::DictionaryKind;

/// Structural errors raised while parsing a document.
///
/// These are fatal: a dictionary that cannot be decoded completely is never
/// guessed at, since a partial dictionary would corrupt the merge silently.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A dictionary key line did not match the `name: <hex>` pattern.
    #[error("malformed key line in {dictionary} dictionary: '{line}'")]
    MalformedKeyLine {
        /// Which dictionary the line belongs to.
        dictionary: DictionaryKind,
        /// The offending raw line.
        line: String,
    },

    /// The file ended inside a dictionary header.
    #[error("unexpected end of file in {dictionary} dictionary header")]
    UnexpectedEof {
        /// Which dictionary was being parsed.
        dictionary: DictionaryKind,
    },

    /// A continuation line appeared before any entry opened.
    #[error("continuation line with no preceding entry: '{line}'")]
    OrphanContinuation {
        /// The offending raw line.
        line: String,
    },

    /// I/O error while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
