//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where shelfmark keeps its snapshots, configuration and logs.

pub mod paths;

pub use paths::{expand_tilde, get_config_path, get_data_dir};
