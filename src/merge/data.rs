//! Logical dictionary snapshots of a parsed document.
//!
//! [`Data`] is what the diff and merge operate on: the decoded key to value
//! mappings, in file order, detached from the raw block chain. The base
//! document's `Data` is mutated by the applied merge and then written back
//! into its document; local and remote snapshots are read-only inputs.

use crate::document::{DictionaryKind, Document, RawLine};
use crate::util::OrderedMap;

use super::codec;
use super::error::{MergeError, Result};
use super::types::CollectionEntry;

/// The three logical dictionaries of one document.
#[derive(Debug, Clone, Default)]
pub struct Data {
    /// Int-keyed text table.
    pub text: OrderedMap<u32, RawLine>,
    /// Int-keyed version/editor-info table.
    pub version: OrderedMap<u32, RawLine>,
    /// String-keyed collection table.
    pub collection: OrderedMap<String, CollectionEntry>,
}

/// Decode a document's dictionaries into a [`Data`] snapshot.
pub fn extract_data(document: &Document) -> Result<Data> {
    let mut data = Data::default();

    if document.has_text_dictionary() {
        data.text = zip_scalar(
            DictionaryKind::Text,
            document.text_keys().unwrap_or(""),
            document.text_values(),
        )?;
    }
    if document.has_version_dictionary() {
        data.version = zip_scalar(
            DictionaryKind::Version,
            document.version_keys().unwrap_or(""),
            document.version_values(),
        )?;
    }
    if document.has_collection_dictionary() {
        data.collection =
            zip_collection(document.collection_keys(), document.collection_values())?;
    }

    Ok(data)
}

/// Flatten a [`Data`] snapshot back into the document's dictionary blocks,
/// in the snapshot's iteration order.
pub fn write_data(document: &mut Document, data: &Data) {
    if document.has_text_dictionary() {
        document.set_text_keys(codec::encode_keys(data.text.iter().map(|(&k, _)| k)));
        document.set_text_values(data.text.values().cloned().collect());
    }
    if document.has_version_dictionary() {
        document.set_version_keys(codec::encode_keys(data.version.iter().map(|(&k, _)| k)));
        document.set_version_values(data.version.values().cloned().collect());
    }
    if document.has_collection_dictionary() {
        document.set_collection_keys(
            data.collection
                .values()
                .map(|entry| entry.key_line.clone())
                .collect(),
        );
        document.set_collection_values(
            data.collection
                .values()
                .map(|entry| entry.value_line.clone())
                .collect(),
        );
    }
}

/// Zip a decoded key list positionally with its value lines.
fn zip_scalar(
    dictionary: DictionaryKind,
    packed_keys: &str,
    values: &[RawLine],
) -> Result<OrderedMap<u32, RawLine>> {
    let keys = codec::decode_keys(packed_keys)
        .map_err(|source| MergeError::Codec { dictionary, source })?;
    if keys.len() != values.len() {
        return Err(MergeError::LengthMismatch {
            dictionary,
            keys: keys.len(),
            values: values.len(),
        });
    }

    let mut map = OrderedMap::new();
    for (key, value) in keys.into_iter().zip(values.iter()) {
        if !map.insert(key, value.clone()) {
            return Err(MergeError::DuplicateKey {
                dictionary,
                key: key.to_string(),
            });
        }
    }
    Ok(map)
}

/// Zip collection key entries positionally with value entries; the map key
/// is the key line's logical scalar.
fn zip_collection(
    keys: &[RawLine],
    values: &[RawLine],
) -> Result<OrderedMap<String, CollectionEntry>> {
    if keys.len() != values.len() {
        return Err(MergeError::LengthMismatch {
            dictionary: DictionaryKind::Collection,
            keys: keys.len(),
            values: values.len(),
        });
    }

    let mut map = OrderedMap::new();
    for (key_line, value_line) in keys.iter().zip(values.iter()) {
        let key = key_line.logical_value();
        let entry = CollectionEntry {
            key_line: key_line.clone(),
            value_line: value_line.clone(),
        };
        if !map.insert(key.clone(), entry) {
            return Err(MergeError::DuplicateKey {
                dictionary: DictionaryKind::Collection,
                key,
            });
        }
    }
    Ok(map)
}
