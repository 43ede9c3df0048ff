//! Filesystem layer for the release config engine
//!
//! Provides normalized path handling, format-aware loading of config
//! files, deterministic directory walks and atomic output writes.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use config::ConfigStore;
pub use constants::ConfigPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use walk::walk_files;
