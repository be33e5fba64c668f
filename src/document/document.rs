//! Parsed document: the block chain plus accessors for each dictionary
//! region.
//!
//! Everything outside the dictionary regions is opaque raw text and is
//! re-emitted verbatim by [`Document::save`]. The accessors expose exactly
//! what the merge needs: the packed key string and the value lines of each
//! dictionary, both readable and replaceable.

use std::io::{self, Write};

use super::block::{BlockChain, BlockId};
use super::line::RawLine;

/// Location of one line inside the block chain.
#[derive(Debug, Clone, Copy)]
pub(super) struct LineRef {
    pub block: BlockId,
    pub line: usize,
}

/// A dictionary whose keys are packed into one hex string on a single line.
#[derive(Debug, Clone)]
pub(super) struct ScalarDictionary {
    /// The packed hexadecimal key array.
    pub keys: String,
    /// Everything on the key line before the hex payload, including `: `.
    pub keys_prefix: String,
    /// Where the key line lives, for rewriting.
    pub keys_line: LineRef,
    /// Block holding the value entries.
    pub values_block: BlockId,
}

/// A dictionary whose keys are themselves scalar entries.
#[derive(Debug, Clone)]
pub(super) struct CollectionDictionary {
    /// Block holding the key entries.
    pub keys_block: BlockId,
    /// Block holding the value entries.
    pub values_block: BlockId,
}

/// A parsed document: raw block chain plus dictionary regions.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub(super) chain: BlockChain,
    pub(super) text: Option<ScalarDictionary>,
    pub(super) version: Option<ScalarDictionary>,
    pub(super) collection: Option<CollectionDictionary>,
}

impl Document {
    /// Returns true if a text dictionary was found.
    pub fn has_text_dictionary(&self) -> bool {
        self.text.is_some()
    }

    /// Returns true if a version dictionary was found.
    pub fn has_version_dictionary(&self) -> bool {
        self.version.is_some()
    }

    /// Returns true if a collection dictionary was found.
    pub fn has_collection_dictionary(&self) -> bool {
        self.collection.is_some()
    }

    /// The text dictionary's packed key string.
    pub fn text_keys(&self) -> Option<&str> {
        self.text.as_ref().map(|d| d.keys.as_str())
    }

    /// The text dictionary's value lines.
    pub fn text_values(&self) -> &[RawLine] {
        match &self.text {
            Some(d) => self.chain.lines(d.values_block),
            None => &[],
        }
    }

    /// Replace the text dictionary's packed key string, rewriting its key
    /// line from the captured prefix. No-op if the document has none.
    pub fn set_text_keys(&mut self, keys: String) {
        if let Some(d) = &mut self.text {
            let text = format!("{}{}", d.keys_prefix, keys);
            self.chain.line_mut(d.keys_line.block, d.keys_line.line).set_value(text);
            d.keys = keys;
        }
    }

    /// Replace the text dictionary's value lines. No-op if the document has
    /// none.
    pub fn set_text_values(&mut self, lines: Vec<RawLine>) {
        if let Some(d) = &self.text {
            self.chain.set_lines(d.values_block, lines);
        }
    }

    /// The version dictionary's packed key string.
    pub fn version_keys(&self) -> Option<&str> {
        self.version.as_ref().map(|d| d.keys.as_str())
    }

    /// The version dictionary's value lines.
    pub fn version_values(&self) -> &[RawLine] {
        match &self.version {
            Some(d) => self.chain.lines(d.values_block),
            None => &[],
        }
    }

    /// Replace the version dictionary's packed key string. No-op if the
    /// document has none.
    pub fn set_version_keys(&mut self, keys: String) {
        if let Some(d) = &mut self.version {
            let text = format!("{}{}", d.keys_prefix, keys);
            self.chain.line_mut(d.keys_line.block, d.keys_line.line).set_value(text);
            d.keys = keys;
        }
    }

    /// Replace the version dictionary's value lines. No-op if the document
    /// has none.
    pub fn set_version_values(&mut self, lines: Vec<RawLine>) {
        if let Some(d) = &self.version {
            self.chain.set_lines(d.values_block, lines);
        }
    }

    /// The collection dictionary's key entry lines.
    pub fn collection_keys(&self) -> &[RawLine] {
        match &self.collection {
            Some(d) => self.chain.lines(d.keys_block),
            None => &[],
        }
    }

    /// The collection dictionary's value entry lines.
    pub fn collection_values(&self) -> &[RawLine] {
        match &self.collection {
            Some(d) => self.chain.lines(d.values_block),
            None => &[],
        }
    }

    /// Replace the collection dictionary's key entry lines. No-op if the
    /// document has none.
    pub fn set_collection_keys(&mut self, lines: Vec<RawLine>) {
        if let Some(d) = &self.collection {
            self.chain.set_lines(d.keys_block, lines);
        }
    }

    /// Replace the collection dictionary's value entry lines. No-op if the
    /// document has none.
    pub fn set_collection_values(&mut self, lines: Vec<RawLine>) {
        if let Some(d) = &self.collection {
            self.chain.set_lines(d.values_block, lines);
        }
    }

    /// Serialize the whole document, LF line endings, no BOM.
    pub fn save<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.chain.serialize(writer)
    }
}
