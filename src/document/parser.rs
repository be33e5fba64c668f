//! Line-oriented state-machine parser for dictionary-bearing documents.
//!
//! The parser walks the input once, line by line. Everything it does not
//! recognize is raw text and lands verbatim in the current block. A line
//! containing one of the configured dictionary marker names switches the
//! machine into that dictionary's states, which capture the packed key
//! string and redirect the value entries into dedicated blocks so they can
//! be replaced later without disturbing the rest of the file.
//!
//! Quoted scalars may span physical lines, including lines shallower than
//! the dictionary indentation; the escape sub-state keeps appending to the
//! open entry until a line ends with the matching quote character.

use std::io::BufRead;

use regex::Regex;

use crate::config::MarkerConfig;

use super::block::BlockId;
use super::document::{CollectionDictionary, Document, LineRef, ScalarDictionary};
use super::error::{ParseError, Result};
use super::line::RawLine;
use super::DictionaryKind;

/// Key line shape: a field name ending in `: `, then the hex payload.
/// An empty payload is a valid, empty dictionary.
const KEYS_PATTERN: &str = "([ _0-9a-zA-Z]+: )([0-9a-fA-F]*)$";

/// The field name that separates a dictionary's keys from its values.
const VALUES_MARKER: &str = "m_values:";

/// Length of the `comment: ` prefix on version entry comment lines.
const COMMENT_PREFIX_LEN: usize = 9;

/// Parser states, one per region of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Opaque raw text.
    Raw,
    /// Key line of the text dictionary.
    TextKeys,
    /// Value entries of the text dictionary.
    TextValues,
    /// Key line of the version dictionary.
    VersionKeys,
    /// First physical line of a version entry.
    VersionValue,
    /// Comment line(s) completing a version entry.
    VersionComment,
    /// Key entries of the collection dictionary.
    CollectionKeys,
    /// Value entries of the collection dictionary.
    CollectionValues,
}

/// Quote-tracking sub-state for multi-line scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EscapeState {
    NotEscaped,
    InEscape(char),
}

/// Parses a text stream into a [`Document`].
#[derive(Debug)]
pub struct DocumentParser {
    /// Marker substrings (`name:`) introducing the text dictionary.
    text_markers: Vec<String>,
    /// Marker substrings introducing the version dictionary.
    version_markers: Vec<String>,
    /// Marker substrings introducing the collection dictionary.
    collection_markers: Vec<String>,
    keys_pattern: Regex,
}

impl DocumentParser {
    /// Create a parser recognizing the given marker-name synonyms.
    pub fn new(markers: &MarkerConfig) -> Self {
        let with_colon = |names: &[String]| names.iter().map(|n| format!("{}:", n)).collect();
        Self {
            text_markers: with_colon(&markers.text),
            version_markers: with_colon(&markers.version),
            collection_markers: with_colon(&markers.collection),
            keys_pattern: Regex::new(KEYS_PATTERN).expect("key line pattern is valid"),
        }
    }

    /// Parse a document from a buffered reader.
    pub fn parse<R: BufRead>(&self, reader: R) -> Result<Document> {
        let mut lines = reader.lines();
        let mut pending = lines.next().transpose()?;

        let mut doc = Document::default();
        let mut state = ParseState::Raw;
        let mut escape = EscapeState::NotEscaped;
        let mut dictionary_depth = 0usize;
        let mut current = doc.chain.tail();
        // Set once the collection header line has been consumed.
        let mut collection_keys_block: Option<BlockId> = None;

        while let Some(line) = pending.take() {
            let depth = leading_spaces(&line);

            match state {
                ParseState::Raw => {
                    if contains_marker(&line, &self.text_markers) {
                        state = ParseState::TextKeys;
                        dictionary_depth = depth;
                    } else if contains_marker(&line, &self.version_markers) {
                        state = ParseState::VersionKeys;
                        dictionary_depth = depth;
                        current = doc.chain.push_block();
                    } else if contains_marker(&line, &self.collection_markers) {
                        state = ParseState::CollectionKeys;
                        dictionary_depth = depth;
                        current = doc.chain.push_block();
                    }
                    doc.chain.push_line(current, RawLine::new(line));
                    pending = lines.next().transpose()?;
                }

                ParseState::TextKeys | ParseState::VersionKeys => {
                    let kind = if state == ParseState::TextKeys {
                        DictionaryKind::Text
                    } else {
                        DictionaryKind::Version
                    };

                    let caps = self.keys_pattern.captures(&line).ok_or_else(|| {
                        ParseError::MalformedKeyLine {
                            dictionary: kind,
                            line: line.clone(),
                        }
                    })?;
                    let keys_prefix = caps[1].to_string();
                    let keys = caps[2].to_string();

                    let keys_line = LineRef {
                        block: current,
                        line: doc.chain.lines(current).len(),
                    };
                    doc.chain.push_line(current, RawLine::new(line));

                    // The values marker line passes through verbatim.
                    let marker_line = lines
                        .next()
                        .transpose()?
                        .ok_or(ParseError::UnexpectedEof { dictionary: kind })?;
                    doc.chain.push_line(current, RawLine::new(marker_line));

                    pending = lines.next().transpose()?;
                    current = doc.chain.push_block();
                    let dictionary = ScalarDictionary {
                        keys,
                        keys_prefix,
                        keys_line,
                        values_block: current,
                    };
                    if kind == DictionaryKind::Text {
                        doc.text = Some(dictionary);
                        state = ParseState::TextValues;
                    } else {
                        doc.version = Some(dictionary);
                        state = ParseState::VersionValue;
                    }
                }

                ParseState::TextValues | ParseState::CollectionValues => {
                    if depth <= dictionary_depth && escape == EscapeState::NotEscaped {
                        state = ParseState::Raw;
                        current = doc.chain.push_block();
                        pending = Some(line);
                    } else {
                        self.collect_entry(&mut doc, current, depth, line, &mut escape)?;
                        pending = lines.next().transpose()?;
                    }
                }

                ParseState::CollectionKeys => match collection_keys_block {
                    None => {
                        // The keys header line itself.
                        doc.chain.push_line(current, RawLine::new(line));
                        pending = lines.next().transpose()?;
                        current = doc.chain.push_block();
                        collection_keys_block = Some(current);
                    }
                    Some(keys_block)
                        if escape == EscapeState::NotEscaped
                            && line.trim_start_matches(' ').starts_with(VALUES_MARKER) =>
                    {
                        current = doc.chain.push_block();
                        doc.chain.push_line(current, RawLine::new(line));
                        pending = lines.next().transpose()?;
                        current = doc.chain.push_block();
                        doc.collection = Some(CollectionDictionary {
                            keys_block,
                            values_block: current,
                        });
                        state = ParseState::CollectionValues;
                    }
                    Some(_) => {
                        self.collect_entry(&mut doc, current, depth, line, &mut escape)?;
                        pending = lines.next().transpose()?;
                    }
                },

                ParseState::VersionValue => {
                    if depth <= dictionary_depth && escape == EscapeState::NotEscaped {
                        state = ParseState::Raw;
                        current = doc.chain.push_block();
                        pending = Some(line);
                    } else {
                        let mut entry = RawLine::new(line);
                        entry.set_value_offset(depth + 2);
                        doc.chain.push_line(current, entry);
                        state = ParseState::VersionComment;
                        pending = lines.next().transpose()?;
                    }
                }

                ParseState::VersionComment => {
                    if escape == EscapeState::NotEscaped {
                        escape = quote_at(&line, depth + COMMENT_PREFIX_LEN);
                    }
                    if let EscapeState::InEscape(quote) = escape {
                        if line.ends_with(quote) {
                            escape = EscapeState::NotEscaped;
                        }
                    }

                    match doc.chain.last_line_mut(current) {
                        Some(entry) => entry.append_fragment(line),
                        None => return Err(ParseError::OrphanContinuation { line }),
                    }

                    if escape == EscapeState::NotEscaped {
                        state = ParseState::VersionValue;
                    }
                    pending = lines.next().transpose()?;
                }
            }
        }

        Ok(doc)
    }

    /// Entry collection shared by the text values, collection keys, and
    /// collection values states: a `- ` line opens a new entry, anything
    /// else continues the previous one, and quoted scalars hold the entry
    /// open across physical lines.
    fn collect_entry(
        &self,
        doc: &mut Document,
        block: BlockId,
        depth: usize,
        line: String,
        escape: &mut EscapeState,
    ) -> Result<()> {
        if *escape == EscapeState::NotEscaped && line.trim_start_matches(' ').starts_with('-') {
            let data_depth = depth + 2;
            *escape = quote_at(&line, data_depth);
            if let EscapeState::InEscape(quote) = *escape {
                if line.ends_with(quote) {
                    *escape = EscapeState::NotEscaped;
                }
            }
            let mut entry = RawLine::new(line);
            entry.set_value_offset(data_depth);
            doc.chain.push_line(block, entry);
        } else {
            if let EscapeState::InEscape(quote) = *escape {
                if line.ends_with(quote) {
                    *escape = EscapeState::NotEscaped;
                }
            }
            match doc.chain.last_line_mut(block) {
                Some(entry) => entry.append_fragment(line),
                None => return Err(ParseError::OrphanContinuation { line }),
            }
        }
        Ok(())
    }
}

/// Number of leading space characters.
fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Returns true if the line contains any of the marker substrings.
fn contains_marker(line: &str, markers: &[String]) -> bool {
    markers.iter().any(|m| line.contains(m.as_str()))
}

/// Escape state opened by the character at byte `index`, if it is a quote.
fn quote_at(line: &str, index: usize) -> EscapeState {
    match line.as_bytes().get(index) {
        Some(b'\'') => EscapeState::InEscape('\''),
        Some(b'"') => EscapeState::InEscape('"'),
        _ => EscapeState::NotEscaped,
    }
}
