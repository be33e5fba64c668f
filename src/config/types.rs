//! Configuration types for textmerge-rs.
//!
//! The configurable surface is deliberately small: the marker-name synonyms
//! that introduce each dictionary kind in the source text. They vary between
//! asset generations, so they are configuration rather than hard-coded text.

/// Marker-name synonyms for the three dictionary kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerConfig {
    /// Names introducing the int-keyed text dictionary.
    pub text: Vec<String>,
    /// Names introducing the int-keyed version dictionary.
    pub version: Vec<String>,
    /// Names introducing the string-keyed collection dictionary.
    pub collection: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            text: vec![
                "m_textKeyDictionary".to_string(),
                "m_dataDictionary".to_string(),
            ],
            version: vec!["m_editorInfoDictionary".to_string()],
            collection: vec!["m_textCollectionDictionary".to_string()],
        }
    }
}
