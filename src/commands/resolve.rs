//! Resolve command implementation.
//!
//! The one top-level operation: parse base, local, and remote, merge the
//! dictionary changes from both sides, and write the merged document over
//! the local file. Conflicts either append inline markers to the merged
//! output (the default) or go to a separate report file, leaving the merged
//! output clean.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::config::MarkerConfig;
use crate::document::{Document, DocumentParser};
use crate::merge::{
    apply, conflict_markers, conflict_report_json, conflict_summary, diff, extract_data, merge,
    write_data, Data, MergeError, MergeOutcome,
};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during the resolve command.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Merge pipeline error (parse, codec, apply).
    #[error("{}: {source}", path.display())]
    Merge {
        /// The input file being processed.
        path: PathBuf,
        /// The underlying failure.
        source: MergeError,
    },

    /// I/O error outside the merge pipeline (backups, output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize the JSON conflict report.
    #[error("failed to render JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the resolve command.
pub type Result<T> = std::result::Result<T, ResolveError>;

// =============================================================================
// Command Arguments
// =============================================================================

/// How conflicts are reported.
#[derive(Debug, Clone, Default)]
pub enum ConflictReporting {
    /// Append git-style markers to the merged output.
    #[default]
    InlineMarkers,
    /// Write a human-readable summary to the given path; the merged output
    /// stays clean.
    ReportFile(PathBuf),
    /// Write a JSON report to the given path; the merged output stays clean.
    JsonReportFile(PathBuf),
}

/// Arguments for the resolve command.
#[derive(Debug, Clone)]
pub struct ResolveArgs {
    /// Common ancestor document.
    pub base: PathBuf,
    /// Local document; also receives the merged result.
    pub local: PathBuf,
    /// Remote document.
    pub remote: PathBuf,
    /// Copy the three inputs here before merging, if set.
    pub backup_dir: Option<PathBuf>,
    /// Conflict reporting mode.
    pub reporting: ConflictReporting,
    /// Dictionary marker names.
    pub markers: MarkerConfig,
}

// =============================================================================
// Command
// =============================================================================

/// Run the three-way merge.
///
/// On success the merged document has been written over the local file. The
/// returned outcome carries the accepted operations and any conflicts; the
/// caller decides what a conflicted-but-written merge means for its exit
/// status.
pub fn resolve(args: &ResolveArgs) -> Result<MergeOutcome> {
    if let Some(dir) = &args.backup_dir {
        write_backups(args, dir)?;
    }

    let parser = DocumentParser::new(&args.markers);

    let mut base_doc = parse_file(&parser, &args.base)?;
    let mut base_data = extract_file_data(&base_doc, &args.base)?;

    // Local and remote documents are only needed for their snapshots.
    let local_doc = parse_file(&parser, &args.local)?;
    let local_data = extract_file_data(&local_doc, &args.local)?;
    let remote_doc = parse_file(&parser, &args.remote)?;
    let remote_data = extract_file_data(&remote_doc, &args.remote)?;

    let local_ops = diff(&base_data, &local_data);
    let remote_ops = diff(&base_data, &remote_data);
    let outcome = merge(&local_ops, &remote_ops);

    apply(&outcome, &mut base_data).map_err(|source| ResolveError::Merge {
        path: args.base.clone(),
        source,
    })?;
    write_data(&mut base_doc, &base_data);

    write_result(&base_doc, &outcome, args)?;
    Ok(outcome)
}

/// Parse one input file into a document.
fn parse_file(parser: &DocumentParser, path: &Path) -> Result<Document> {
    let file = File::open(path).map_err(|e| ResolveError::Merge {
        path: path.to_path_buf(),
        source: MergeError::Io(e),
    })?;
    parser
        .parse(BufReader::new(file))
        .map_err(|e| ResolveError::Merge {
            path: path.to_path_buf(),
            source: MergeError::Parse(e),
        })
}

/// Decode one document's dictionaries.
fn extract_file_data(document: &Document, path: &Path) -> Result<Data> {
    extract_data(document).map_err(|source| ResolveError::Merge {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the merged document over the local file, plus conflict output per
/// the configured reporting mode.
fn write_result(document: &Document, outcome: &MergeOutcome, args: &ResolveArgs) -> Result<()> {
    let mut output = BufWriter::new(File::create(&args.local)?);
    document.save(&mut output)?;

    match &args.reporting {
        ConflictReporting::InlineMarkers => {
            if let Some(markers) = conflict_markers(outcome) {
                output.write_all(markers.as_bytes())?;
            }
        }
        ConflictReporting::ReportFile(path) => {
            if let Some(summary) = conflict_summary(outcome) {
                fs::write(path, summary)?;
            }
        }
        ConflictReporting::JsonReportFile(path) => {
            if let Some(json) = conflict_report_json(outcome) {
                fs::write(path, json?)?;
            }
        }
    }

    output.flush()?;
    Ok(())
}

/// Copy the three inputs into the backup directory with timestamped names.
fn write_backups(args: &ResolveArgs, dir: &Path) -> Result<()> {
    let timestamp = Local::now().format("%Y-%m-%dT%H-%M-%S").to_string();
    fs::copy(&args.base, backup_path(dir, &args.base, "BASE", &timestamp))?;
    fs::copy(&args.local, backup_path(dir, &args.local, "LOCAL", &timestamp))?;
    fs::copy(
        &args.remote,
        backup_path(dir, &args.remote, "REMOTE", &timestamp),
    )?;
    Ok(())
}

/// `{dir}/{stem}_{role}_{timestamp}{.ext}`.
fn backup_path(dir: &Path, input: &Path, role: &str, timestamp: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}_{}_{}.{}", stem, role, timestamp, ext.to_string_lossy()),
        None => format!("{}_{}_{}", stem, role, timestamp),
    };
    dir.join(name)
}
