//! Combine two change sets into one applied patch plus a conflict list.
//!
//! The merge is symmetric: neither side takes precedence. For each key,
//! structurally equal operations from both sides coalesce into a single
//! accepted operation; differing operations become a conflict pair and
//! neither is applied; an operation present on one side only is accepted.

use std::hash::Hash;

use crate::document::DictionaryKind;
use crate::util::OrderedMap;

use super::data::Data;
use super::error::{MergeError, Result};
use super::types::{
    CollectionOp, ConflictPair, DiffOp, MergeOutcome, Modifications, OpKind, ScalarOp,
};

/// Merge the local and remote change sets.
///
/// Conflicts from all three dictionaries are aggregated so a single run
/// surfaces every conflict, in dictionary order text, version, collection.
pub fn merge(local: &Modifications, remote: &Modifications) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    outcome.text = merge_dictionary(&local.text, &remote.text, &mut outcome.conflicts, |l, r| {
        ConflictPair::Text {
            local: l,
            remote: r,
        }
    });
    outcome.version = merge_dictionary(
        &local.version,
        &remote.version,
        &mut outcome.conflicts,
        |l, r| ConflictPair::Version {
            local: l,
            remote: r,
        },
    );
    outcome.collection = merge_dictionary(
        &local.collection,
        &remote.collection,
        &mut outcome.conflicts,
        |l, r| ConflictPair::Collection {
            local: l,
            remote: r,
        },
    );

    outcome
}

fn merge_dictionary<K, V, F>(
    local: &OrderedMap<K, DiffOp<K, V>>,
    remote: &OrderedMap<K, DiffOp<K, V>>,
    conflicts: &mut Vec<ConflictPair>,
    conflict: F,
) -> Vec<DiffOp<K, V>>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
    F: Fn(DiffOp<K, V>, DiffOp<K, V>) -> ConflictPair,
{
    let mut accepted = Vec::new();

    for (key, local_op) in local.iter() {
        match remote.get(key) {
            // Both sides made the same change: accept it once.
            Some(remote_op) if remote_op == local_op => accepted.push(local_op.clone()),
            // Incompatible changes: record the pair, accept neither.
            Some(remote_op) => conflicts.push(conflict(local_op.clone(), remote_op.clone())),
            None => accepted.push(local_op.clone()),
        }
    }
    for (key, remote_op) in remote.iter() {
        if !local.contains_key(key) {
            accepted.push(remote_op.clone());
        }
    }

    accepted
}

/// Apply the accepted operations to the base snapshot.
///
/// Additions append at the end in acceptance order; modifications replace in
/// place; removals tombstone. A clash (adding an existing key, touching a
/// missing one) cannot happen for operations produced by [`merge`] over
/// diffs of the same base, and is surfaced as an error rather than patched
/// over.
pub fn apply(outcome: &MergeOutcome, data: &mut Data) -> Result<()> {
    apply_dictionary(DictionaryKind::Text, &outcome.text, &mut data.text)?;
    apply_dictionary(DictionaryKind::Version, &outcome.version, &mut data.version)?;
    apply_collection(&outcome.collection, data)?;
    Ok(())
}

fn apply_dictionary(
    dictionary: DictionaryKind,
    ops: &[ScalarOp],
    map: &mut OrderedMap<u32, crate::document::RawLine>,
) -> Result<()> {
    for op in ops {
        match (&op.kind, &op.value) {
            (OpKind::Addition, Some(value)) => {
                if !map.insert(op.key, value.clone()) {
                    return Err(MergeError::DuplicateKey {
                        dictionary,
                        key: op.key.to_string(),
                    });
                }
            }
            (OpKind::Modification, Some(value)) => {
                if !map.set(&op.key, value.clone()) {
                    return Err(MergeError::MissingKey {
                        dictionary,
                        key: op.key.to_string(),
                    });
                }
            }
            (OpKind::Removal, _) => {
                if !map.remove(&op.key) {
                    return Err(MergeError::MissingKey {
                        dictionary,
                        key: op.key.to_string(),
                    });
                }
            }
            // An addition or modification without a value.
            _ => {
                return Err(MergeError::MissingKey {
                    dictionary,
                    key: op.key.to_string(),
                })
            }
        }
    }
    Ok(())
}

fn apply_collection(ops: &[CollectionOp], data: &mut Data) -> Result<()> {
    let dictionary = DictionaryKind::Collection;
    for op in ops {
        match (&op.kind, &op.value) {
            (OpKind::Addition, Some(value)) => {
                if !data.collection.insert(op.key.clone(), value.clone()) {
                    return Err(MergeError::DuplicateKey {
                        dictionary,
                        key: op.key.clone(),
                    });
                }
            }
            (OpKind::Modification, Some(value)) => {
                if !data.collection.set(&op.key, value.clone()) {
                    return Err(MergeError::MissingKey {
                        dictionary,
                        key: op.key.clone(),
                    });
                }
            }
            (OpKind::Removal, _) => {
                if !data.collection.remove(&op.key) {
                    return Err(MergeError::MissingKey {
                        dictionary,
                        key: op.key.clone(),
                    });
                }
            }
            _ => {
                return Err(MergeError::MissingKey {
                    dictionary,
                    key: op.key.clone(),
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RawLine;
    use crate::merge::diff::diff;
    use crate::merge::types::CollectionEntry;

    fn line(text: &str) -> RawLine {
        let mut l = RawLine::new(format!("    - {}", text));
        l.set_value_offset(6);
        l
    }

    fn data(entries: &[(u32, &str)]) -> Data {
        let mut d = Data::default();
        for &(k, v) in entries {
            d.text.insert(k, line(v));
        }
        d
    }

    fn coll_data(entries: &[(&str, &str)]) -> Data {
        let mut d = Data::default();
        for &(k, v) in entries {
            d.collection.insert(
                k.to_string(),
                CollectionEntry {
                    key_line: line(k),
                    value_line: line(v),
                },
            );
        }
        d
    }

    fn text_entries(data: &Data) -> Vec<(u32, String)> {
        data.text
            .iter()
            .map(|(&k, v)| (k, v.logical_value()))
            .collect()
    }

    #[test]
    fn test_disjoint_changes_both_applied() {
        // base {1:a, 2:b}; local modifies 2; remote adds 3.
        let base = data(&[(1, "a"), (2, "b")]);
        let local = data(&[(1, "a"), (2, "B")]);
        let remote = data(&[(1, "a"), (2, "b"), (3, "c")]);

        let outcome = merge(&diff(&base, &local), &diff(&base, &remote));
        assert!(outcome.is_clean());

        let mut merged = base.clone();
        apply(&outcome, &mut merged).unwrap();
        assert_eq!(
            text_entries(&merged),
            vec![
                (1, "a".to_string()),
                (2, "B".to_string()),
                (3, "c".to_string())
            ]
        );
    }

    #[test]
    fn test_conflicting_modifications_detected() {
        // base {5:x}; local 5->y; remote 5->z.
        let base = data(&[(5, "x")]);
        let local = data(&[(5, "y")]);
        let remote = data(&[(5, "z")]);

        let outcome = merge(&diff(&base, &local), &diff(&base, &remote));
        assert!(outcome.text.is_empty());
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(
            outcome.conflicts[0].local_description(),
            "MODIFICATION: 5 => y"
        );
        assert_eq!(
            outcome.conflicts[0].remote_description(),
            "MODIFICATION: 5 => z"
        );

        // The base entry stays untouched.
        let mut merged = base.clone();
        apply(&outcome, &mut merged).unwrap();
        assert_eq!(text_entries(&merged), vec![(5, "x".to_string())]);
    }

    #[test]
    fn test_equal_removals_coalesce() {
        // base {7:p}; both sides remove 7.
        let base = data(&[(7, "p")]);
        let variant = data(&[]);

        let outcome = merge(&diff(&base, &variant), &diff(&base, &variant));
        assert!(outcome.is_clean());
        assert_eq!(outcome.text.len(), 1);
        assert_eq!(outcome.text[0].kind, OpKind::Removal);

        let mut merged = base.clone();
        apply(&outcome, &mut merged).unwrap();
        assert!(merged.text.is_empty());
    }

    #[test]
    fn test_equal_modifications_coalesce() {
        let base = data(&[(5, "x")]);
        let variant = data(&[(5, "y")]);

        let outcome = merge(&diff(&base, &variant), &diff(&base, &variant));
        assert!(outcome.is_clean());
        assert_eq!(outcome.text.len(), 1);

        let mut merged = base.clone();
        apply(&outcome, &mut merged).unwrap();
        assert_eq!(text_entries(&merged), vec![(5, "y".to_string())]);
    }

    #[test]
    fn test_merge_symmetry() {
        let base = data(&[(1, "a"), (2, "b"), (3, "c")]);
        let local = data(&[(1, "A"), (3, "c"), (4, "d")]);
        let remote = data(&[(1, "a2"), (2, "b"), (3, "C")]);

        let local_ops = diff(&base, &local);
        let remote_ops = diff(&base, &remote);

        let ab = merge(&local_ops, &remote_ops);
        let ba = merge(&remote_ops, &local_ops);

        let keys = |ops: &[ScalarOp]| {
            let mut ks: Vec<u32> = ops.iter().map(|op| op.key).collect();
            ks.sort_unstable();
            ks
        };
        assert_eq!(keys(&ab.text), keys(&ba.text));

        let conflict_keys = |outcome: &MergeOutcome| {
            let mut ks: Vec<String> = outcome
                .conflicts
                .iter()
                .map(|c| c.local_description())
                .collect();
            ks.sort();
            ks
        };
        // Same conflicts, with the sides swapped.
        assert_eq!(ab.conflicts.len(), ba.conflicts.len());
        let mut ab_locals = conflict_keys(&ab);
        let mut ba_remotes: Vec<String> = ba
            .conflicts
            .iter()
            .map(|c| c.remote_description())
            .collect();
        ba_remotes.sort();
        ab_locals.sort();
        assert_eq!(ab_locals, ba_remotes);
    }

    #[test]
    fn test_conflicting_keys_excluded_from_accepted_ops() {
        let base = data(&[(1, "a"), (2, "b")]);
        let local = data(&[(1, "x"), (2, "B")]);
        let remote = data(&[(1, "y"), (2, "b")]);

        let outcome = merge(&diff(&base, &local), &diff(&base, &remote));
        assert_eq!(outcome.conflicts.len(), 1);
        assert!(outcome.text.iter().all(|op| op.key != 1));
        assert!(outcome.text.iter().any(|op| op.key == 2));
    }

    #[test]
    fn test_collection_changes_applied() {
        // local modifies greeting; remote removes farewell and adds salute.
        let base = coll_data(&[("greeting", "Hello"), ("farewell", "Goodbye")]);
        let local = coll_data(&[("greeting", "Howdy"), ("farewell", "Goodbye")]);
        let remote = coll_data(&[("greeting", "Hello"), ("salute", "Salute")]);

        let outcome = merge(&diff(&base, &local), &diff(&base, &remote));
        assert!(outcome.is_clean());
        assert_eq!(outcome.collection.len(), 3);

        let mut merged = base.clone();
        apply(&outcome, &mut merged).unwrap();
        let entries: Vec<(String, String)> = merged
            .collection
            .iter()
            .map(|(k, e)| (k.clone(), e.value_line.logical_value()))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("greeting".to_string(), "Howdy".to_string()),
                ("salute".to_string(), "Salute".to_string())
            ]
        );
    }

    #[test]
    fn test_conflicting_collection_modifications_detected() {
        let base = coll_data(&[("greeting", "Hello")]);
        let local = coll_data(&[("greeting", "Howdy")]);
        let remote = coll_data(&[("greeting", "Hiya")]);

        let outcome = merge(&diff(&base, &local), &diff(&base, &remote));
        assert!(outcome.collection.is_empty());
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(
            outcome.conflicts[0].dictionary(),
            crate::document::DictionaryKind::Collection
        );
        assert_eq!(
            outcome.conflicts[0].local_description(),
            "MODIFICATION: greeting => Howdy"
        );

        let mut merged = base.clone();
        apply(&outcome, &mut merged).unwrap();
        assert_eq!(
            merged
                .collection
                .get(&"greeting".to_string())
                .unwrap()
                .value_line
                .logical_value(),
            "Hello"
        );
    }

    #[test]
    fn test_removal_vs_modification_conflicts() {
        let base = data(&[(9, "q")]);
        let local = data(&[]);
        let remote = data(&[(9, "Q")]);

        let outcome = merge(&diff(&base, &local), &diff(&base, &remote));
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(
            outcome.conflicts[0].local_description(),
            "REMOVAL: 9 => "
        );
    }
}
