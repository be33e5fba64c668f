//! Configuration module.

mod read_config;
mod types;

pub use read_config::{read_marker_config, ConfigError, ConfigSource};
pub use types::MarkerConfig;
