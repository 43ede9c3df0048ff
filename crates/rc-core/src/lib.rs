//! Release config engine
//!
//! Turns an ordered list of config directories into fully resolved release
//! configs:
//!
//! ```text
//!   config dirs --scanner--> ReleaseConfigs --resolver--> ResolvedReleaseConfig
//!                                                               |
//!                                       writers: .varmk, build_flags_*.json, artifact
//! ```
//!
//! - **Scanner** ([`ConfigScanner`]): loads declarations and contributions,
//!   assigning each directory its declaration index
//! - **Registry** ([`ReleaseConfigs`]): release configs, aliases, base flags
//! - **Resolver** ([`ReleaseConfigs::generate_release_config`]): inheritance
//!   walk with cycle detection and provenance tracing
//! - **Writers** ([`writers`]): Makefile fragment and JSON artifacts
//!
//! # Example
//!
//! ```no_run
//! use rc_core::{ConfigScanner, Result};
//!
//! fn example() -> Result<()> {
//!     let scanner = ConfigScanner::new(".");
//!     let mut configs = scanner.scan(&["build/release"])?;
//!     let resolved = configs.generate_release_config("trunk_staging")?;
//!     println!("{} flags", resolved.flag_artifacts.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod registry;
pub mod release_config;
pub mod resolver;
pub mod scanner;
pub mod writers;

pub use error::{Error, Result};
pub use registry::{ReleaseConfigMap, ReleaseConfigs};
pub use release_config::{ReleaseConfig, ReleaseConfigContribution, ResolvedReleaseConfig};
pub use resolver::{BuildVariantPolicy, ResolveOptions, dedup_value_sets};
pub use scanner::ConfigScanner;

/// Name of the config implicitly inherited by every `RELEASE_CONFIG`.
pub const ROOT_RELEASE_CONFIG: &str = "root";

/// Config returned for unknown names when missing configs are allowed.
pub const FALLBACK_RELEASE_CONFIG: &str = "trunk_staging";
