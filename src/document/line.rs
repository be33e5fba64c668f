//! A single logical scalar entry made of one or more raw text lines.

use std::io::{self, Write};

/// One logical scalar in the source text.
///
/// A `RawLine` owns the raw text exactly as it appeared in the file: the
/// first fragment is the line that opened the entry, and further fragments
/// are physical continuation lines. Serialization re-emits every fragment
/// verbatim, so an entry that was never touched round-trips byte for byte.
///
/// The *logical value* is what the merge compares: all fragments joined by a
/// single space, each stripped of its first `value_offset` characters (the
/// indentation and `- ` prefix of the entry).
#[derive(Debug, Clone)]
pub struct RawLine {
    /// Raw physical lines, newline-stripped.
    fragments: Vec<String>,
    /// Number of leading characters to drop from each fragment when reading
    /// the logical value. Clamped to the fragment length.
    value_offset: usize,
}

impl RawLine {
    /// Create a line from one raw fragment with no value offset.
    pub fn new(text: String) -> Self {
        Self {
            fragments: vec![text],
            value_offset: 0,
        }
    }

    /// Set the number of leading characters stripped from each fragment when
    /// computing the logical value.
    pub fn set_value_offset(&mut self, offset: usize) {
        self.value_offset = offset;
    }

    /// Replace the raw content wholesale with a single fragment.
    pub fn set_value(&mut self, text: String) {
        self.fragments.clear();
        self.fragments.push(text);
    }

    /// Append a physical continuation line.
    pub fn append_fragment(&mut self, text: String) {
        self.fragments.push(text);
    }

    /// The logical scalar value: fragments joined by a single space, each
    /// stripped of the first `value_offset` characters.
    pub fn logical_value(&self) -> String {
        let mut out = String::new();
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i != 0 {
                out.push(' ');
            }
            out.push_str(strip_offset(fragment, self.value_offset));
        }
        out
    }

    /// Write every fragment verbatim, each followed by a LF.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for fragment in &self.fragments {
            writer.write_all(fragment.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// Two lines are equal when their logical values match; raw formatting does
/// not participate.
impl PartialEq for RawLine {
    fn eq(&self, other: &Self) -> bool {
        self.logical_value() == other.logical_value()
    }
}

impl Eq for RawLine {}

impl std::fmt::Display for RawLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.logical_value())
    }
}

/// Drop the first `offset` characters of a fragment, clamped to its length.
fn strip_offset(fragment: &str, offset: usize) -> &str {
    match fragment.char_indices().nth(offset) {
        Some((i, _)) => &fragment[i..],
        None => "",
    }
}
