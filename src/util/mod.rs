//! Utility modules for textmerge-rs.

pub mod ordered_map;

pub use ordered_map::OrderedMap;
