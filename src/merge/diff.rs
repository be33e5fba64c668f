//! Compute one side's change set relative to the base snapshot.

use std::hash::Hash;

use crate::util::OrderedMap;

use super::data::Data;
use super::types::{DiffOp, Modifications};

/// Diff a variant snapshot against the base, per dictionary.
///
/// Comparison is on logical values, never identity: an entry whose raw
/// formatting changed but whose logical scalar did not is not a
/// modification. Removals and modifications are emitted in base order,
/// additions in variant order.
pub fn diff(base: &Data, variant: &Data) -> Modifications {
    Modifications {
        text: diff_dictionary(&base.text, &variant.text),
        version: diff_dictionary(&base.version, &variant.version),
        collection: diff_dictionary(&base.collection, &variant.collection),
    }
}

fn diff_dictionary<K, V>(
    base: &OrderedMap<K, V>,
    variant: &OrderedMap<K, V>,
) -> OrderedMap<K, DiffOp<K, V>>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    let mut ops = OrderedMap::new();

    for (key, base_value) in base.iter() {
        match variant.get(key) {
            Some(value) if value != base_value => {
                ops.insert(key.clone(), DiffOp::modification(key.clone(), value.clone()));
            }
            Some(_) => {}
            None => {
                ops.insert(key.clone(), DiffOp::removal(key.clone()));
            }
        }
    }
    for (key, value) in variant.iter() {
        if !base.contains_key(key) {
            ops.insert(key.clone(), DiffOp::addition(key.clone(), value.clone()));
        }
    }

    ops
}
