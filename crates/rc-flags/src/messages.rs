//! Serialized shapes of input files and output artifacts
//!
//! Field names follow the original build_flags messages so that tools
//! reading the JSON artifacts see the same keys.

use crate::{FlagDeclaration, Tracepoint, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What kind of release config this is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseConfigType {
    #[serde(rename = "CONFIG_TYPE_UNSPECIFIED")]
    Unspecified,
    /// A config usable as TARGET_RELEASE. Implicitly inherits `root`.
    #[default]
    ReleaseConfig,
    /// Only reachable through explicit inheritance.
    ExplicitInheritanceConfig,
    /// Applied on top of a release config for one TARGET_BUILD_VARIANT.
    BuildVariant,
}

impl ReleaseConfigType {
    /// True if configs of this type may only inherit configs of the same type.
    pub fn restricts_inheritance(self) -> bool {
        matches!(self, Self::BuildVariant)
    }
}

impl std::fmt::Display for ReleaseConfigType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unspecified => "CONFIG_TYPE_UNSPECIFIED",
            Self::ReleaseConfig => "RELEASE_CONFIG",
            Self::ExplicitInheritanceConfig => "EXPLICIT_INHERITANCE_CONFIG",
            Self::BuildVariant => "BUILD_VARIANT",
        };
        f.write_str(name)
    }
}

/// `release_config_map.toml`: describes one config directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfigMapMessage {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Containers used by declarations that list none.
    #[serde(default)]
    pub default_containers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<AliasMessage>,
}

/// An alternative name for a release config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AliasMessage {
    pub name: String,
    pub target: String,
}

/// `release_configs/<name>.toml`: one directory's contribution to a release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfigMessage {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Release configs to inherit, in order.
    #[serde(default)]
    pub inherits: Vec<String>,

    #[serde(default)]
    pub aconfig_value_sets: Vec<String>,

    /// Only aconfig overrides are allowed; build flag values are an error.
    #[serde(default)]
    pub aconfig_flags_only: bool,

    #[serde(default)]
    pub prior_stages: Vec<String>,

    /// The config may not be used as TARGET_RELEASE.
    #[serde(default)]
    pub disallow_lunch_use: bool,

    #[serde(default)]
    pub release_config_type: Option<ReleaseConfigType>,
}

/// `flag_values/<release>/<FLAG>.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagValueMessage {
    pub name: String,

    #[serde(default)]
    pub value: Value,

    #[serde(default)]
    pub redacted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagArtifactMessage {
    pub flag_declaration: FlagDeclaration,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traces: Vec<Tracepoint>,
}

/// Contents of `build_flags_<partition>.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagArtifactsMessage {
    pub flag_artifacts: Vec<FlagArtifactMessage>,
}

impl FlagArtifactsMessage {
    pub fn sort_by_name(&mut self) {
        self.flag_artifacts
            .sort_by(|a, b| a.flag_declaration.name.cmp(&b.flag_declaration.name));
    }
}

/// A fully resolved release config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfigArtifact {
    pub name: String,
    #[serde(default)]
    pub other_names: Vec<String>,
    /// Sorted by flag name.
    #[serde(default)]
    pub flag_artifacts: Vec<FlagArtifactMessage>,
    #[serde(default)]
    pub aconfig_value_sets: Vec<String>,
    /// Inherited configs, in resolution order.
    #[serde(default)]
    pub inherits: Vec<String>,
    /// Directories that contributed declarations or values.
    #[serde(default)]
    pub directories: Vec<String>,
    /// Directories that could contribute values.
    #[serde(default)]
    pub value_directories: Vec<String>,
    #[serde(default)]
    pub prior_stages: Vec<String>,
    pub release_config_type: ReleaseConfigType,
    #[serde(default)]
    pub disallow_lunch_use: bool,
}

/// Every resolved release config, with the target release first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfigsArtifact {
    pub release_config: ReleaseConfigArtifact,
    #[serde(default)]
    pub other_release_configs: Vec<ReleaseConfigArtifact>,
    /// Keyed by config directory.
    #[serde(default)]
    pub release_config_maps_map: BTreeMap<String, ReleaseConfigMapMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfigContributionsArtifact {
    pub name: String,
    pub contributing_directories: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseConfigContributionsArtifacts {
    pub release_config_contributions_artifact_list: Vec<ReleaseConfigContributionsArtifact>,
}
