//! Release configs and their per-directory contributions

use rc_flags::{
    FlagArtifacts, FlagArtifactsMessage, FlagValue, ReleaseConfigArtifact, ReleaseConfigMessage,
    ReleaseConfigType,
};
use std::collections::{BTreeMap, BTreeSet};

/// One directory's contribution to a release config.
///
/// Created by the scanner and consumed by the resolver.
#[derive(Debug, Clone)]
pub struct ReleaseConfigContribution {
    /// Path of the `release_configs/<name>.toml` file
    pub path: String,

    /// Index of the config directory holding the file. Flag values
    /// cannot be set for flags declared at a higher index.
    pub declaration_index: usize,

    pub message: ReleaseConfigMessage,

    /// Values from `flag_values/<name>/`, in file order
    pub flag_values: Vec<FlagValue>,
}

impl ReleaseConfigContribution {
    pub fn new(
        path: impl Into<String>,
        declaration_index: usize,
        message: ReleaseConfigMessage,
    ) -> Self {
        Self {
            path: path.into(),
            declaration_index,
            message,
            flag_values: Vec::new(),
        }
    }
}

/// A named release target, as assembled from every directory mentioning it.
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub name: String,

    /// Index of the first config directory declaring this release.
    pub declaration_index: usize,

    /// Contributions in directory order
    pub contributions: Vec<ReleaseConfigContribution>,

    /// Aliases pointing at this config, sorted
    pub other_names: Vec<String>,

    /// Configs to inherit, first-seen order, without duplicates
    pub inherit_names: Vec<String>,

    pub aconfig_flags_only: bool,

    pub disallow_lunch_use: bool,

    pub release_config_type: ReleaseConfigType,

    /// Files read for this config
    pub files_used: BTreeSet<String>,
}

impl ReleaseConfig {
    pub fn new(name: impl Into<String>, declaration_index: usize, kind: ReleaseConfigType) -> Self {
        Self {
            name: name.into(),
            declaration_index,
            contributions: Vec::new(),
            other_names: Vec::new(),
            inherit_names: Vec::new(),
            aconfig_flags_only: false,
            disallow_lunch_use: false,
            release_config_type: kind,
            files_used: BTreeSet::new(),
        }
    }

    /// Fold a contribution's release-level settings into the config.
    pub fn add_contribution(&mut self, contribution: ReleaseConfigContribution) {
        for inherit in &contribution.message.inherits {
            if !self.inherit_names.contains(inherit) {
                self.inherit_names.push(inherit.clone());
            }
        }
        self.aconfig_flags_only |= contribution.message.aconfig_flags_only;
        self.disallow_lunch_use |= contribution.message.disallow_lunch_use;
        self.contributions.push(contribution);
    }

    /// True if this config may be used for lunch (as TARGET_RELEASE).
    pub fn is_listable(&self) -> bool {
        !self.disallow_lunch_use && self.release_config_type == ReleaseConfigType::ReleaseConfig
    }

    /// Prior stages named by any contribution, sorted.
    pub fn prior_stages(&self) -> BTreeSet<&str> {
        self.contributions
            .iter()
            .flat_map(|c| c.message.prior_stages.iter().map(String::as_str))
            .collect()
    }
}

/// The immutable result of resolving one release config.
#[derive(Debug, Clone)]
pub struct ResolvedReleaseConfig {
    pub name: String,

    /// Final state of every flag
    pub flag_artifacts: FlagArtifacts,

    /// Files that influenced the result, including inherited ones
    pub files_used: BTreeSet<String>,

    pub prior_stages: BTreeSet<String>,

    /// Unredacted flags per container, for `build_flags_<partition>.json`
    pub partition_build_flags: BTreeMap<String, FlagArtifactsMessage>,

    pub artifact: ReleaseConfigArtifact,
}

impl ResolvedReleaseConfig {
    pub fn sorted_file_list(&self) -> Vec<&str> {
        self.files_used.iter().map(String::as_str).collect()
    }

    pub fn disallow_lunch_use(&self) -> bool {
        self.artifact.disallow_lunch_use
    }
}
