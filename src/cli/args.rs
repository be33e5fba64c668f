//! Command-line argument definitions and helpers.

use std::path::PathBuf;

use clap::Args;
use thiserror::Error;

use crate::commands::{ConflictReporting, ResolveArgs};
use crate::config::{read_marker_config, ConfigError, ConfigSource};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during argument processing.
#[derive(Debug, Error)]
pub enum ArgsError {
    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Invalid argument combination.
    #[error("{0}")]
    InvalidArgs(String),
}

/// Result type for argument operations.
pub type Result<T> = std::result::Result<T, ArgsError>;

// =============================================================================
// Global Arguments
// =============================================================================

/// Global arguments that apply to the whole run.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to the configuration file.
    #[arg(long = "config-file", global = true)]
    pub config_file: Option<PathBuf>,

    /// Configuration overrides in the form name=value.
    #[arg(long = "config", value_parser = parse_config_override, global = true)]
    pub config_overrides: Vec<(String, String)>,

    /// Directory receiving timestamped copies of the three inputs.
    #[arg(short = 'b', long = "backup-dir", global = true)]
    pub backup_dir: Option<PathBuf>,

    /// Write the conflict summary here instead of inline markers.
    #[arg(long = "report", global = true)]
    pub report: Option<PathBuf>,

    /// Format the conflict report as JSON (requires --report).
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalArgs {
    /// Convert to a ConfigSource for reading configuration.
    pub fn to_config_source(&self) -> ConfigSource {
        ConfigSource {
            config_file: self.config_file.clone(),
            overrides: self.config_overrides.clone(),
        }
    }

    /// Build the resolve command arguments for the given input paths.
    pub fn to_resolve_args(
        &self,
        base: PathBuf,
        local: PathBuf,
        remote: PathBuf,
    ) -> Result<ResolveArgs> {
        let reporting = match (&self.report, self.json) {
            (Some(path), false) => ConflictReporting::ReportFile(path.clone()),
            (Some(path), true) => ConflictReporting::JsonReportFile(path.clone()),
            (None, false) => ConflictReporting::InlineMarkers,
            (None, true) => {
                return Err(ArgsError::InvalidArgs(
                    "--json requires --report".to_string(),
                ))
            }
        };

        Ok(ResolveArgs {
            base,
            local,
            remote,
            backup_dir: self.backup_dir.clone(),
            reporting,
            markers: read_marker_config(&self.to_config_source())?,
        })
    }
}

/// Parse a name=value override.
fn parse_config_override(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_override() {
        assert_eq!(
            parse_config_override("markers.text=m_a,m_b").unwrap(),
            ("markers.text".to_string(), "m_a,m_b".to_string())
        );
        assert!(parse_config_override("no-equals").is_err());
        assert!(parse_config_override("=value").is_err());
    }

    #[test]
    fn test_json_without_report_rejected() {
        let global = GlobalArgs {
            json: true,
            ..GlobalArgs::default()
        };
        let result = global.to_resolve_args(
            PathBuf::from("b"),
            PathBuf::from("l"),
            PathBuf::from("r"),
        );
        assert!(matches!(result, Err(ArgsError::InvalidArgs(_))));
    }

    #[test]
    fn test_reporting_mode_selection() {
        let global = GlobalArgs {
            report: Some(PathBuf::from("out.txt")),
            ..GlobalArgs::default()
        };
        let args = global
            .to_resolve_args(PathBuf::from("b"), PathBuf::from("l"), PathBuf::from("r"))
            .unwrap();
        assert!(matches!(args.reporting, ConflictReporting::ReportFile(_)));
    }
}
