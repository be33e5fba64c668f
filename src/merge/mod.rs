//! Three-way dictionary merge for textmerge-rs.
//!
//! This module implements the logical half of the pipeline: decoding a
//! parsed document's dictionaries into ordered snapshots, diffing local and
//! remote against the shared base, combining the two change sets, and
//! rendering any conflicts.
//!
//! # Overview
//!
//! 1. [`extract_data`] decodes each document's dictionaries (via the packed
//!    key [`codec`]) into a [`Data`] snapshot.
//! 2. [`diff`] computes each side's keyed operations relative to base.
//! 3. [`merge`] combines both operation sets symmetrically: equal changes
//!    coalesce, differing changes on the same key conflict, and one-sided
//!    changes are accepted.
//! 4. [`apply`] patches the base snapshot, and [`write_data`] flattens it
//!    back into the base document's blocks.

pub mod codec;
pub mod data;
pub mod diff;
pub mod engine;
pub mod error;
pub mod report;
pub mod types;

pub use codec::{decode_keys, encode_keys, CodecError};
pub use data::{extract_data, write_data, Data};
pub use diff::diff;
pub use engine::{apply, merge};
pub use error::{MergeError, Result};
pub use report::{conflict_markers, conflict_report_json, conflict_summary};
pub use types::{
    CollectionEntry, CollectionOp, ConflictPair, DiffOp, MergeOutcome, Modifications, OpKind,
    ScalarOp,
};
