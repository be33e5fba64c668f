//! Configuration file reading and parsing.
//!
//! Configuration is an INI file with a `[markers]` section holding a
//! comma-separated synonym list per dictionary kind:
//!
//! ```ini
//! [markers]
//! text = m_textKeyDictionary,m_dataDictionary
//! version = m_editorInfoDictionary
//! collection = m_textCollectionDictionary
//! ```
//!
//! Layering: built-in defaults, then the config file (explicit path from the
//! CLI, else the `TMERGE_CONFIG_FILE` env var, else `~/.tmergeconfig`), then
//! individual `--config key=value` overrides applied last.

use std::env;
use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use thiserror::Error;

use super::types::MarkerConfig;

const ENV_CONFIG_FILE: &str = "TMERGE_CONFIG_FILE";
const DEFAULT_CONFIG_FILENAME: &str = ".tmergeconfig";

const MARKERS_SECTION: &str = "markers";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Explicitly requested config file does not exist.
    #[error("config file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The config file could not be parsed as INI.
    #[error("failed to parse config file {}: {message}", path.display())]
    ParseError {
        /// The file that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// An override key does not name a known setting.
    #[error("invalid override key '{key}'")]
    InvalidOverrideKey {
        /// The unrecognized key.
        key: String,
    },

    /// A marker list was present but empty.
    #[error("empty marker list for '{key}'")]
    EmptyMarkerList {
        /// The setting with no names.
        key: String,
    },
}

/// Result type for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// =============================================================================
// ConfigSource
// =============================================================================

/// Specifies how to locate and layer configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// Explicit config file path from the CLI. If specified and missing,
    /// error. If None, fall back to `TMERGE_CONFIG_FILE`, then
    /// `~/.tmergeconfig`, then defaults.
    pub config_file: Option<PathBuf>,

    /// Individual key=value overrides (applied last). Keys use dot notation:
    /// `markers.text`, `markers.version`, `markers.collection`.
    pub overrides: Vec<(String, String)>,
}

// =============================================================================
// Reading
// =============================================================================

/// Read the marker configuration according to `source`.
pub fn read_marker_config(source: &ConfigSource) -> Result<MarkerConfig> {
    let mut config = MarkerConfig::default();

    if let Some(path) = locate_config_file(source)? {
        apply_file(&mut config, &path)?;
    }
    for (key, value) in &source.overrides {
        apply_override(&mut config, key, value)?;
    }

    Ok(config)
}

/// Resolve which config file to read, if any.
fn locate_config_file(source: &ConfigSource) -> Result<Option<PathBuf>> {
    if let Some(path) = &source.config_file {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.clone()));
        }
        return Ok(Some(path.clone()));
    }

    if let Ok(path) = env::var(ENV_CONFIG_FILE) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if let Some(home) = env::var_os("HOME") {
        let path = PathBuf::from(home).join(DEFAULT_CONFIG_FILENAME);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    Ok(None)
}

/// Layer one INI file onto the config.
fn apply_file(config: &mut MarkerConfig, path: &Path) -> Result<()> {
    let mut ini = Ini::new();
    ini.load(path).map_err(|message| ConfigError::ParseError {
        path: path.to_path_buf(),
        message,
    })?;

    if let Some(value) = ini.get(MARKERS_SECTION, "text") {
        config.text = parse_marker_list("markers.text", &value)?;
    }
    if let Some(value) = ini.get(MARKERS_SECTION, "version") {
        config.version = parse_marker_list("markers.version", &value)?;
    }
    if let Some(value) = ini.get(MARKERS_SECTION, "collection") {
        config.collection = parse_marker_list("markers.collection", &value)?;
    }

    Ok(())
}

/// Apply one dot-notation override.
fn apply_override(config: &mut MarkerConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "markers.text" => config.text = parse_marker_list(key, value)?,
        "markers.version" => config.version = parse_marker_list(key, value)?,
        "markers.collection" => config.collection = parse_marker_list(key, value)?,
        _ => {
            return Err(ConfigError::InvalidOverrideKey {
                key: key.to_string(),
            })
        }
    }
    Ok(())
}

/// Split a comma-separated synonym list, trimming whitespace.
fn parse_marker_list(key: &str, value: &str) -> Result<Vec<String>> {
    let names: Vec<String> = value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if names.is_empty() {
        return Err(ConfigError::EmptyMarkerList {
            key: key.to_string(),
        });
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_markers() {
        let config = MarkerConfig::default();
        assert_eq!(config.text, vec!["m_textKeyDictionary", "m_dataDictionary"]);
        assert_eq!(config.version, vec!["m_editorInfoDictionary"]);
        assert_eq!(config.collection, vec!["m_textCollectionDictionary"]);
    }

    #[test]
    fn test_apply_override() {
        let mut config = MarkerConfig::default();
        apply_override(&mut config, "markers.text", "m_strings, m_labels").unwrap();
        assert_eq!(config.text, vec!["m_strings", "m_labels"]);

        assert!(matches!(
            apply_override(&mut config, "markers.bogus", "x"),
            Err(ConfigError::InvalidOverrideKey { .. })
        ));
        assert!(matches!(
            apply_override(&mut config, "markers.text", " , "),
            Err(ConfigError::EmptyMarkerList { .. })
        ));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[markers]").unwrap();
        writeln!(file, "text = m_customDictionary").unwrap();
        writeln!(file, "version = m_revisions, m_history").unwrap();
        file.flush().unwrap();

        let source = ConfigSource {
            config_file: Some(file.path().to_path_buf()),
            overrides: Vec::new(),
        };
        let config = read_marker_config(&source).unwrap();
        assert_eq!(config.text, vec!["m_customDictionary"]);
        assert_eq!(config.version, vec!["m_revisions", "m_history"]);
        // Unspecified kinds keep their defaults.
        assert_eq!(config.collection, vec!["m_textCollectionDictionary"]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let source = ConfigSource {
            config_file: Some(PathBuf::from("/nonexistent/.tmergeconfig")),
            overrides: Vec::new(),
        };
        assert!(matches!(
            read_marker_config(&source),
            Err(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[markers]").unwrap();
        writeln!(file, "text = m_fromFile").unwrap();
        file.flush().unwrap();

        let source = ConfigSource {
            config_file: Some(file.path().to_path_buf()),
            overrides: vec![("markers.text".to_string(), "m_fromOverride".to_string())],
        };
        let config = read_marker_config(&source).unwrap();
        assert_eq!(config.text, vec!["m_fromOverride"]);
    }
}
