//! Structured logging to a rotating file.
//!
//! # Architecture
//!
//! ```text
//! tracing macros/spans → EnvFilter → fmt layer → FileWriter → shelfmark.log
//! ```
//!
//! # Configuration
//!
//! Log level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `log_level` config option
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `file_writer`: Rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, LOG_FILE_NAME};
