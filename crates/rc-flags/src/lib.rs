//! Build flag data model for the release config engine
//!
//! This crate holds the plain data types shared by the scanner, resolver
//! and writers in `rc-core`:
//!
//! - [`Value`]: the tagged value of a flag (string, bool, unspecified, obsolete)
//! - [`FlagDeclaration`]: the canonical definition of a flag
//! - [`FlagValue`]: one assignment of a value, with the file it came from
//! - [`FlagArtifact`]: the resolved state of a flag, with its provenance
//!   [`Tracepoint`]s
//! - [`messages`]: the serialized shapes of input files and output artifacts

pub mod artifact;
pub mod declaration;
pub mod error;
pub mod flag_value;
pub mod messages;
pub mod value;

pub use artifact::{FlagArtifact, FlagArtifacts, Tracepoint};
pub use declaration::{FlagDeclaration, Workflow, validate_container, validate_flag_name};
pub use error::{Error, Result};
pub use flag_value::FlagValue;
pub use messages::{
    AliasMessage, FlagArtifactMessage, FlagArtifactsMessage, FlagValueMessage,
    ReleaseConfigArtifact, ReleaseConfigContributionsArtifact,
    ReleaseConfigContributionsArtifacts, ReleaseConfigMapMessage, ReleaseConfigMessage,
    ReleaseConfigType, ReleaseConfigsArtifact,
};
pub use value::Value;

/// Flag assembled by the engine itself from every `aconfig_value_sets` entry.
pub const RELEASE_ACONFIG_VALUE_SETS: &str = "RELEASE_ACONFIG_VALUE_SETS";

/// Names further release configs whose aconfig value sets are exported.
pub const RELEASE_ACONFIG_EXTRA_RELEASE_CONFIGS: &str = "RELEASE_ACONFIG_EXTRA_RELEASE_CONFIGS";

/// Default permission of aconfig flags, exported per extra release config.
pub const RELEASE_ACONFIG_FLAG_DEFAULT_PERMISSION: &str = "RELEASE_ACONFIG_FLAG_DEFAULT_PERMISSION";

/// When non-empty, a release config also inherits the build variant config.
pub const RELEASE_BUILD_USE_VARIANT_FLAGS: &str = "RELEASE_BUILD_USE_VARIANT_FLAGS";

/// Set to the upper-cased name of build-prefix release configs.
pub const RELEASE_PLATFORM_VERSION: &str = "RELEASE_PLATFORM_VERSION";

/// Trace source for values synthesized by the engine.
pub const ENGINE_SOURCE: &str = "$release-config";
