//! Type definitions for the three-way dictionary merge.

use crate::document::RawLine;
use crate::util::OrderedMap;

// =============================================================================
// CollectionEntry
// =============================================================================

/// One entry of the string-keyed collection dictionary: the key is itself a
/// formatted scalar line, so both lines must round-trip independently.
#[derive(Debug, Clone)]
pub struct CollectionEntry {
    /// The line holding the key scalar.
    pub key_line: RawLine,
    /// The line holding the value scalar.
    pub value_line: RawLine,
}

/// Entries compare by their value scalars; the key scalar is already the map
/// key.
impl PartialEq for CollectionEntry {
    fn eq(&self, other: &Self) -> bool {
        self.value_line == other.value_line
    }
}

impl Eq for CollectionEntry {}

impl std::fmt::Display for CollectionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value_line.logical_value())
    }
}

// =============================================================================
// Operations
// =============================================================================

/// What a diff operation does to its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Key absent in base, present in the variant.
    Addition,
    /// Key present in both with different logical values.
    Modification,
    /// Key present in base, absent in the variant.
    Removal,
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpKind::Addition => write!(f, "ADDITION"),
            OpKind::Modification => write!(f, "MODIFICATION"),
            OpKind::Removal => write!(f, "REMOVAL"),
        }
    }
}

/// A single keyed operation produced by the diff.
///
/// Equality is structural: same kind, same key, same logical value. Removals
/// carry no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOp<K, V> {
    /// Operation kind.
    pub kind: OpKind,
    /// The key the operation applies to.
    pub key: K,
    /// The new value; `None` for removals.
    pub value: Option<V>,
}

impl<K, V> DiffOp<K, V> {
    /// An addition of `value` at `key`.
    pub fn addition(key: K, value: V) -> Self {
        Self {
            kind: OpKind::Addition,
            key,
            value: Some(value),
        }
    }

    /// A modification of `key` to `value`.
    pub fn modification(key: K, value: V) -> Self {
        Self {
            kind: OpKind::Modification,
            key,
            value: Some(value),
        }
    }

    /// A removal of `key`.
    pub fn removal(key: K) -> Self {
        Self {
            kind: OpKind::Removal,
            key,
            value: None,
        }
    }
}

impl<K: std::fmt::Display, V: std::fmt::Display> std::fmt::Display for DiffOp<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} => ", self.kind, self.key)?;
        if let Some(value) = &self.value {
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Operation over the int-keyed scalar dictionaries.
pub type ScalarOp = DiffOp<u32, RawLine>;

/// Operation over the string-keyed collection dictionary.
pub type CollectionOp = DiffOp<String, CollectionEntry>;

// =============================================================================
// Modifications
// =============================================================================

/// One side's change set relative to base, keyed per dictionary.
#[derive(Debug, Clone, Default)]
pub struct Modifications {
    /// Operations against the text dictionary.
    pub text: OrderedMap<u32, ScalarOp>,
    /// Operations against the version dictionary.
    pub version: OrderedMap<u32, ScalarOp>,
    /// Operations against the collection dictionary.
    pub collection: OrderedMap<String, CollectionOp>,
}

impl Modifications {
    /// Returns true if no dictionary has any operation.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.version.is_empty() && self.collection.is_empty()
    }
}

// =============================================================================
// Conflicts and merge outcome
// =============================================================================

/// A pair of mutually incompatible operations, one from each side, tagged by
/// the dictionary they belong to.
#[derive(Debug, Clone)]
pub enum ConflictPair {
    /// Conflict in the text dictionary.
    Text {
        /// Local side's operation.
        local: ScalarOp,
        /// Remote side's operation.
        remote: ScalarOp,
    },
    /// Conflict in the version dictionary.
    Version {
        /// Local side's operation.
        local: ScalarOp,
        /// Remote side's operation.
        remote: ScalarOp,
    },
    /// Conflict in the collection dictionary.
    Collection {
        /// Local side's operation.
        local: CollectionOp,
        /// Remote side's operation.
        remote: CollectionOp,
    },
}

impl ConflictPair {
    /// Which dictionary the conflict belongs to.
    pub fn dictionary(&self) -> crate::document::DictionaryKind {
        match self {
            ConflictPair::Text { .. } => crate::document::DictionaryKind::Text,
            ConflictPair::Version { .. } => crate::document::DictionaryKind::Version,
            ConflictPair::Collection { .. } => crate::document::DictionaryKind::Collection,
        }
    }

    /// The local operation, rendered.
    pub fn local_description(&self) -> String {
        match self {
            ConflictPair::Text { local, .. } | ConflictPair::Version { local, .. } => {
                local.to_string()
            }
            ConflictPair::Collection { local, .. } => local.to_string(),
        }
    }

    /// The remote operation, rendered.
    pub fn remote_description(&self) -> String {
        match self {
            ConflictPair::Text { remote, .. } | ConflictPair::Version { remote, .. } => {
                remote.to_string()
            }
            ConflictPair::Collection { remote, .. } => remote.to_string(),
        }
    }
}

/// The result of merging both change sets: the operations accepted for each
/// dictionary, plus every conflict found.
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Accepted text dictionary operations.
    pub text: Vec<ScalarOp>,
    /// Accepted version dictionary operations.
    pub version: Vec<ScalarOp>,
    /// Accepted collection dictionary operations.
    pub collection: Vec<CollectionOp>,
    /// Conflicting operation pairs, aggregated across all dictionaries.
    pub conflicts: Vec<ConflictPair>,
}

impl MergeOutcome {
    /// Returns true if the merge finished without conflicts.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str, offset: usize) -> RawLine {
        let mut l = RawLine::new(text.to_string());
        l.set_value_offset(offset);
        l
    }

    #[test]
    fn test_op_display() {
        let op: ScalarOp = DiffOp::modification(5, line("    - y", 6));
        assert_eq!(op.to_string(), "MODIFICATION: 5 => y");

        let op: ScalarOp = DiffOp::removal(7);
        assert_eq!(op.to_string(), "REMOVAL: 7 => ");
    }

    #[test]
    fn test_op_equality_is_structural() {
        let a: ScalarOp = DiffOp::modification(5, line("    - y", 6));
        let b: ScalarOp = DiffOp::modification(5, line("  - y", 4));
        let c: ScalarOp = DiffOp::modification(5, line("    - z", 6));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, DiffOp::addition(5, line("    - y", 6)));
    }

    #[test]
    fn test_collection_entry_compares_value_scalar() {
        let a = CollectionEntry {
            key_line: line("    - k", 6),
            value_line: line("    - v", 6),
        };
        let b = CollectionEntry {
            key_line: line("  - k", 4),
            value_line: line("  - v", 4),
        };
        assert_eq!(a, b);
    }
}
