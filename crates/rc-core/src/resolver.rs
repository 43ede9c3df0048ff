//! Release config resolution
//!
//! Resolving a config is a depth-first walk over its inheritance graph:
//!
//! 1. Start from a private clone of the registry's base flag artifacts.
//! 2. Resolve each inherited config (memoized) and merge its flags in.
//! 3. Apply the config's own contributions in directory order, enforcing
//!    that a flag is never set to the left of its declaration.
//! 4. Optionally inherit the build variant config.
//! 5. Freeze the result into a [`ResolvedReleaseConfig`].
//!
//! The walk keeps an explicit in-progress set; meeting a config that is
//! still in it means the inheritance graph has a cycle.

use crate::registry::ReleaseConfigs;
use crate::release_config::{ReleaseConfig, ResolvedReleaseConfig};
use crate::{Error, ROOT_RELEASE_CONFIG, Result};
use rc_flags::{
    ENGINE_SOURCE, FlagArtifacts, FlagArtifactsMessage, FlagValue,
    RELEASE_ACONFIG_EXTRA_RELEASE_CONFIGS, RELEASE_ACONFIG_VALUE_SETS,
    RELEASE_BUILD_USE_VARIANT_FLAGS, RELEASE_PLATFORM_VERSION, ReleaseConfigArtifact,
    ReleaseConfigType, Tracepoint, Value, Workflow,
};
use rc_fs::NormalizedPath;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, LazyLock};

/// Names like `ap3a`: a release config tied to a platform build prefix.
static BUILD_PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z][0-9][0-9a-z]$").unwrap());

/// What to do when a config asks for build variant flags that cannot be
/// found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildVariantPolicy {
    /// Skip silently: a missing variant config, or a config of another
    /// type with the variant's name, is not inherited.
    #[default]
    BestEffort,
    /// Both cases are errors.
    Required,
}

/// Inputs to resolution that do not come from config directories.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// TARGET_BUILD_VARIANT, e.g. `userdebug`
    pub build_variant: Option<String>,

    pub build_variant_policy: BuildVariantPolicy,

    /// A release config may take values from at most one directory under
    /// each of these prefixes' groups.
    pub exclusive_dir_prefixes: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            build_variant: None,
            build_variant_policy: BuildVariantPolicy::default(),
            exclusive_dir_prefixes: vec![
                "build/release".to_string(),
                "vendor/google_shared/build/release".to_string(),
            ],
        }
    }
}

impl ReleaseConfigs {
    /// Resolve one release config (by name or alias), memoized.
    ///
    /// Calling this twice returns the same `Arc`. On error nothing is
    /// cached for the config or for any config whose resolution failed
    /// along the way.
    pub fn generate_release_config(&mut self, name: &str) -> Result<Arc<ResolvedReleaseConfig>> {
        let mut cache = std::mem::take(&mut self.resolved);
        let result = {
            let configs: &ReleaseConfigs = self;
            let mut resolution = Resolution {
                configs,
                resolved: &mut cache,
                in_progress: HashSet::new(),
            };
            configs
                .get_release_config_strict(name)
                .and_then(|config| resolution.generate(config))
        };
        self.resolved = cache;
        result
    }
}

/// Remove empty and repeated entries from a space-separated list, keeping
/// the first occurrence of each.
pub fn dedup_value_sets(value: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    value
        .split(' ')
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// State of one depth-first resolution walk.
struct Resolution<'a> {
    configs: &'a ReleaseConfigs,
    resolved: &'a mut BTreeMap<String, Arc<ResolvedReleaseConfig>>,
    in_progress: HashSet<String>,
}

/// Mutable state of the config currently being compiled.
struct Working {
    flag_artifacts: FlagArtifacts,
    files_used: BTreeSet<String>,
}

impl<'a> Resolution<'a> {
    fn generate(&mut self, config: &'a ReleaseConfig) -> Result<Arc<ResolvedReleaseConfig>> {
        if let Some(done) = self.resolved.get(&config.name) {
            return Ok(Arc::clone(done));
        }
        if !self.in_progress.insert(config.name.clone()) {
            return Err(Error::InheritanceLoop {
                name: config.name.clone(),
            });
        }

        let result = self.compile(config);
        self.in_progress.remove(&config.name);

        let resolved = Arc::new(result?);
        self.resolved
            .insert(config.name.clone(), Arc::clone(&resolved));
        tracing::info!(
            release_config = %config.name,
            flags = resolved.flag_artifacts.len(),
            "Resolved release config"
        );
        Ok(resolved)
    }

    fn compile(&mut self, config: &'a ReleaseConfig) -> Result<ResolvedReleaseConfig> {
        let configs = self.configs;
        let is_root = config.name == ROOT_RELEASE_CONFIG;
        let is_build_prefix = BUILD_PREFIX_PATTERN.is_match(&config.name);

        let mut working = Working {
            flag_artifacts: configs.flag_artifacts.clone(),
            files_used: config.files_used.clone(),
        };

        let mut inherit_names = config.inherit_names.clone();
        if config.release_config_type == ReleaseConfigType::ReleaseConfig
            && !is_root
            && configs.get_release_config_strict(ROOT_RELEASE_CONFIG).is_ok()
        {
            inherit_names.insert(0, ROOT_RELEASE_CONFIG.to_string());
        }

        let mut inherits = Vec::new();
        let mut seen = HashSet::new();
        for inherit in &inherit_names {
            if !seen.insert(inherit.as_str()) {
                continue;
            }
            if is_build_prefix && configs.aliases.contains_key(inherit) {
                return Err(Error::InheritFromAlias {
                    name: config.name.clone(),
                    alias: inherit.clone(),
                });
            }
            inherits.push(inherit.clone());

            let parent = configs.get_release_config(inherit)?;
            let parent_resolved = self.generate(parent)?;
            working.inherit(config, parent, &parent_resolved)?;
        }

        // Configs that inherit nothing still depend on every declaration.
        if inherit_names.is_empty() {
            working.files_used.extend(configs.files_used.iter().cloned());
        }

        if is_build_prefix {
            if let Some(fa) = working.flag_artifacts.get_mut(RELEASE_PLATFORM_VERSION) {
                let version = config.name.to_uppercase();
                if fa.value.marshal() != version {
                    let source = config
                        .contributions
                        .first()
                        .map(|c| c.path.as_str())
                        .unwrap_or(ENGINE_SOURCE);
                    fa.update_value(&FlagValue::new(
                        source,
                        RELEASE_PLATFORM_VERSION,
                        Value::unmarshal(&version),
                    ))?;
                }
            }
        }

        let mut dir_indexes = BTreeSet::new();
        let mut value_dir_indexes = BTreeSet::new();
        let mut prior_stages = BTreeSet::new();
        for contribution in &config.contributions {
            tracing::debug!(
                release_config = %config.name,
                path = %contribution.path,
                values = contribution.flag_values.len(),
                "Applying contribution"
            );

            let contributed_sets = contribution.message.aconfig_value_sets.join(" ");
            if let Some(value_sets) = working.flag_artifacts.get_mut(RELEASE_ACONFIG_VALUE_SETS) {
                value_sets.value = Value::String(format!(
                    "{} {}",
                    value_sets.value.string_value(),
                    contributed_sets
                ));
                value_sets.traces.push(Tracepoint::new(
                    contribution.path.clone(),
                    Value::String(contributed_sets),
                ));
            }

            prior_stages.extend(contribution.message.prior_stages.iter().cloned());
            dir_indexes.insert(contribution.declaration_index);
            // This directory *could* provide values for the config.
            value_dir_indexes.insert(contribution.declaration_index);

            if config.aconfig_flags_only {
                if let Some(value) = contribution
                    .flag_values
                    .iter()
                    .find(|v| v.name != RELEASE_ACONFIG_EXTRA_RELEASE_CONFIGS)
                {
                    return Err(Error::AconfigFlagsOnly {
                        name: config.name.clone(),
                        flag: value.name.clone(),
                        path: value.path.clone(),
                    });
                }
            }

            for value in &contribution.flag_values {
                let fa = working
                    .flag_artifacts
                    .get_mut(&value.name)
                    .ok_or_else(|| Error::UndefinedFlag {
                        flag: value.name.clone(),
                        path: value.path.clone(),
                    })?;

                if let Some(declared_at) = fa.declaration_index {
                    dir_indexes.insert(declared_at);
                    if declared_at > contribution.declaration_index {
                        return Err(Error::SetBeforeDeclare {
                            flag: value.name.clone(),
                            declared_in: configs.config_dirs[declared_at].clone(),
                            path: value.path.clone(),
                        });
                    }
                }
                if is_root && fa.declaration.workflow != Workflow::Manual {
                    return Err(Error::NonManualInRoot {
                        flag: value.name.clone(),
                        path: value.path.clone(),
                    });
                }
                fa.update_value(value)?;
            }
        }

        if config.release_config_type == ReleaseConfigType::ReleaseConfig {
            let use_variant = working
                .flag_artifacts
                .get(RELEASE_BUILD_USE_VARIANT_FLAGS)
                .is_some_and(|fa| !fa.value.marshal().is_empty());
            if use_variant {
                self.inherit_build_variant(config, &mut working)?;
            }
        }

        let aconfig_value_sets = working.finish_value_sets();
        let (directories, value_directories) =
            self.directories(config, &dir_indexes, &value_dir_indexes)?;

        let mut partition_build_flags: BTreeMap<String, FlagArtifactsMessage> = BTreeMap::new();
        for fa in working.flag_artifacts.iter() {
            // Redacted flags are not rendered.
            let Some(message) = fa.marshal_without_traces() else {
                continue;
            };
            for container in &fa.declaration.containers {
                partition_build_flags
                    .entry(container.clone())
                    .or_default()
                    .flag_artifacts
                    .push(message.clone());
            }
        }

        let artifact = ReleaseConfigArtifact {
            name: config.name.clone(),
            other_names: config.other_names.clone(),
            flag_artifacts: working
                .flag_artifacts
                .iter()
                .map(|fa| fa.to_message())
                .collect(),
            aconfig_value_sets,
            inherits,
            directories,
            value_directories,
            prior_stages: prior_stages.iter().cloned().collect(),
            release_config_type: config.release_config_type,
            disallow_lunch_use: config.disallow_lunch_use,
        };

        Ok(ResolvedReleaseConfig {
            name: config.name.clone(),
            flag_artifacts: working.flag_artifacts,
            files_used: working.files_used,
            prior_stages,
            partition_build_flags,
            artifact,
        })
    }

    fn inherit_build_variant(
        &mut self,
        config: &'a ReleaseConfig,
        working: &mut Working,
    ) -> Result<()> {
        let configs = self.configs;
        let options = &configs.options;
        let Some(variant_name) = options.build_variant.as_deref().filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        if variant_name == config.name {
            return Ok(());
        }

        let unavailable = |reason: String| Error::BuildVariantUnavailable {
            name: config.name.clone(),
            variant: variant_name.to_string(),
            reason,
        };

        let variant = match configs.get_release_config_strict(variant_name) {
            Ok(variant) => variant,
            Err(err) => {
                return match options.build_variant_policy {
                    BuildVariantPolicy::BestEffort => {
                        tracing::debug!(variant = variant_name, "No build variant config");
                        Ok(())
                    }
                    BuildVariantPolicy::Required => Err(unavailable(err.to_string())),
                };
            }
        };
        if variant.release_config_type != ReleaseConfigType::BuildVariant {
            return match options.build_variant_policy {
                BuildVariantPolicy::BestEffort => {
                    tracing::warn!(
                        variant = variant_name,
                        kind = %variant.release_config_type,
                        "Not a BUILD_VARIANT config, ignoring"
                    );
                    Ok(())
                }
                BuildVariantPolicy::Required => Err(unavailable(format!(
                    "{} has type {}",
                    variant.name, variant.release_config_type
                ))),
            };
        }

        let resolved = self.generate(variant)?;
        working.inherit(config, variant, &resolved)
    }

    /// Map contributing directory indexes to paths, enforcing that the config
    /// takes values from only one of the exclusive directories.
    fn directories(
        &self,
        config: &ReleaseConfig,
        dir_indexes: &BTreeSet<usize>,
        value_dir_indexes: &BTreeSet<usize>,
    ) -> Result<(Vec<String>, Vec<String>)> {
        let configs = self.configs;
        let mut directories = Vec::new();
        let mut value_directories = Vec::new();
        let mut exclusive_dir: Option<&str> = None;

        for (index, dir) in configs.config_dirs.iter().enumerate() {
            if dir_indexes.contains(&index) {
                directories.push(dir.clone());
            }
            if !value_dir_indexes.contains(&index) {
                continue;
            }
            let path = NormalizedPath::new(dir);
            for prefix in &configs.options.exclusive_dir_prefixes {
                if !path.starts_with_dir(prefix) {
                    continue;
                }
                if let Some(first) = exclusive_dir {
                    if !NormalizedPath::new(first).starts_with_dir(prefix) {
                        return Err(Error::ExclusiveDirectories {
                            name: config.name.clone(),
                            first: first.to_string(),
                            second: dir.clone(),
                        });
                    }
                }
                exclusive_dir = Some(dir);
            }
            value_directories.push(dir.clone());
        }
        Ok((directories, value_directories))
    }
}

impl Working {
    /// Merge a resolved parent into this config's flags.
    fn inherit(
        &mut self,
        config: &ReleaseConfig,
        parent: &ReleaseConfig,
        resolved: &ResolvedReleaseConfig,
    ) -> Result<()> {
        if config.release_config_type != parent.release_config_type
            && config.release_config_type.restricts_inheritance()
        {
            return Err(Error::InheritanceTypeMismatch {
                name: config.name.clone(),
                kind: config.release_config_type,
                parent: parent.name.clone(),
                parent_kind: parent.release_config_type,
            });
        }

        self.files_used.extend(resolved.files_used.iter().cloned());
        for inherited in resolved.flag_artifacts.iter() {
            let name = inherited.name();
            let fa = self
                .flag_artifacts
                .get_mut(name)
                .ok_or_else(|| Error::MissingInheritedFlag {
                    flag: name.to_string(),
                    parent: parent.name.clone(),
                })?;
            if inherited.redacted {
                fa.redact();
            }
            if name == RELEASE_ACONFIG_VALUE_SETS {
                // Value sets accumulate instead of overriding.
                let sets = inherited.value.string_value();
                if !sets.is_empty() {
                    fa.traces.extend(inherited.traces.iter().cloned());
                    fa.value = Value::String(format!("{} {}", fa.value.string_value(), sets));
                }
            } else if inherited.is_overridden() {
                fa.traces.extend(inherited.traces[1..].iter().cloned());
                fa.value = inherited.value.clone();
            }
        }
        Ok(())
    }

    /// Deduplicate the accumulated value sets and record the final value.
    fn finish_value_sets(&mut self) -> Vec<String> {
        let Some(fa) = self.flag_artifacts.get_mut(RELEASE_ACONFIG_VALUE_SETS) else {
            return Vec::new();
        };
        let sets = dedup_value_sets(fa.value.string_value());
        let value = Value::String(sets.join(" "));
        if fa.traces.last().map(|t| &t.value) != Some(&value) {
            fa.traces.push(Tracepoint::new(ENGINE_SOURCE, value.clone()));
        }
        fa.value = value;
        sets
    }
}
