//! Registry of release configs, aliases and base flag declarations

use crate::release_config::{ReleaseConfig, ResolvedReleaseConfig};
use crate::resolver::ResolveOptions;
use crate::{Error, FALLBACK_RELEASE_CONFIG, Result};
use rc_flags::{
    ENGINE_SOURCE, FlagArtifact, FlagArtifacts, FlagDeclaration, RELEASE_ACONFIG_VALUE_SETS,
    ReleaseConfigMapMessage, ReleaseConfigsArtifact, Tracepoint, Value, Workflow,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A loaded `release_config_map.toml`.
#[derive(Debug, Clone)]
pub struct ReleaseConfigMap {
    /// Config directory, as given to the scanner
    pub dir: String,
    /// Path of the map file
    pub path: String,
    pub message: ReleaseConfigMapMessage,
}

/// Every release config known to one run, plus the state they share.
///
/// Built by [`ConfigScanner`](crate::ConfigScanner); read-only during
/// resolution apart from the cache of resolved configs.
#[derive(Debug)]
pub struct ReleaseConfigs {
    /// Alias name -> target name
    pub(crate) aliases: BTreeMap<String, String>,

    /// Every declared flag at its default value
    pub(crate) flag_artifacts: FlagArtifacts,

    pub(crate) release_configs: BTreeMap<String, ReleaseConfig>,

    /// Indexed by declaration index
    pub(crate) release_config_maps: Vec<ReleaseConfigMap>,

    /// Config directories, indexed by declaration index
    pub(crate) config_dirs: Vec<String>,

    /// Declaration files, used by every config
    pub(crate) files_used: BTreeSet<String>,

    /// Unknown release names fall back to [`FALLBACK_RELEASE_CONFIG`]
    pub(crate) allow_missing: bool,

    pub(crate) options: ResolveOptions,

    pub(crate) resolved: BTreeMap<String, Arc<ResolvedReleaseConfig>>,
}

impl Default for ReleaseConfigs {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseConfigs {
    /// Create an empty registry holding only the engine-assembled
    /// `RELEASE_ACONFIG_VALUE_SETS` flag.
    pub fn new() -> Self {
        let mut flag_artifacts = FlagArtifacts::new();
        flag_artifacts.insert(FlagArtifact {
            declaration: FlagDeclaration {
                name: RELEASE_ACONFIG_VALUE_SETS.to_string(),
                namespace: "android_UNKNOWN".to_string(),
                description: "Aconfig value sets assembled by release-config".to_string(),
                bugs: Vec::new(),
                value: Value::Unspecified,
                workflow: Workflow::Manual,
                containers: ["system", "system_ext", "product", "vendor"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            },
            declaration_index: None,
            value: Value::String(String::new()),
            traces: vec![Tracepoint::new(ENGINE_SOURCE, Value::String(String::new()))],
            redacted: false,
        });

        Self {
            aliases: BTreeMap::new(),
            flag_artifacts,
            release_configs: BTreeMap::new(),
            release_config_maps: Vec::new(),
            config_dirs: Vec::new(),
            files_used: BTreeSet::new(),
            allow_missing: false,
            options: ResolveOptions::default(),
            resolved: BTreeMap::new(),
        }
    }

    /// Set the resolution options. Clears any cached resolution.
    pub fn set_options(&mut self, options: ResolveOptions) {
        self.options = options;
        self.resolved.clear();
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.set_options(options);
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Let unknown release names resolve to [`FALLBACK_RELEASE_CONFIG`].
    pub fn set_allow_missing(&mut self, allow_missing: bool) {
        self.allow_missing = allow_missing;
    }

    pub fn config_dirs(&self) -> &[String] {
        &self.config_dirs
    }

    pub fn release_config_maps(&self) -> &[ReleaseConfigMap] {
        &self.release_config_maps
    }

    /// Base flag artifacts: every declared flag at its default.
    pub fn flag_artifacts(&self) -> &FlagArtifacts {
        &self.flag_artifacts
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Release configs in name order.
    pub fn release_configs(&self) -> impl Iterator<Item = &ReleaseConfig> {
        self.release_configs.values()
    }

    pub fn files_used(&self) -> &BTreeSet<String> {
        &self.files_used
    }

    /// Look up a release config by name or alias.
    ///
    /// A miss is an error the caller may treat as "no such config". When
    /// missing configs are allowed, a miss returns
    /// [`FALLBACK_RELEASE_CONFIG`] if it exists.
    pub fn get_release_config(&self, name: &str) -> Result<&ReleaseConfig> {
        self.lookup(name, self.allow_missing)
    }

    /// Look up a release config by name or alias, never falling back.
    pub fn get_release_config_strict(&self, name: &str) -> Result<&ReleaseConfig> {
        self.lookup(name, false)
    }

    fn lookup(&self, name: &str, allow_missing: bool) -> Result<&ReleaseConfig> {
        let mut trace = vec![name.to_string()];
        let mut current = name;
        while let Some(target) = self.aliases.get(current) {
            if trace.contains(target) {
                trace.push(target.clone());
                return Err(Error::AliasLoop {
                    name: name.to_string(),
                    trace,
                });
            }
            trace.push(target.clone());
            current = target;
        }

        if let Some(config) = self.release_configs.get(current) {
            return Ok(config);
        }
        if allow_missing {
            if let Some(config) = self.release_configs.get(FALLBACK_RELEASE_CONFIG) {
                tracing::warn!(
                    missing = current,
                    fallback = FALLBACK_RELEASE_CONFIG,
                    "Release config not found, using fallback"
                );
                return Ok(config);
            }
        }
        Err(Error::ReleaseConfigNotFound {
            name: current.to_string(),
            trace,
        })
    }

    /// Every release config name and alias, sorted.
    pub fn get_all_release_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .release_configs
            .keys()
            .chain(self.aliases.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Names and aliases of the configs usable for lunch, sorted.
    pub fn get_listable_release_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .release_configs
            .values()
            .filter(|config| config.is_listable())
            .flat_map(|config| std::iter::once(&config.name).chain(config.other_names.iter()))
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Validate aliases and record them as other names of their targets.
    pub fn link_aliases(&mut self) -> Result<()> {
        let mut other_names: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (alias, target) in &self.aliases {
            if self.release_configs.contains_key(alias) {
                return Err(Error::AliasShadowsConfig {
                    name: alias.clone(),
                });
            }
            if !self.release_configs.contains_key(target) && !self.aliases.contains_key(target) {
                return Err(Error::DanglingAlias {
                    name: alias.clone(),
                    target: target.clone(),
                });
            }
            let canonical = self.get_release_config_strict(alias)?.name.clone();
            other_names.entry(canonical).or_default().push(alias.clone());
        }

        for config in self.release_configs.values_mut() {
            config.other_names = other_names.remove(&config.name).unwrap_or_default();
        }
        Ok(())
    }

    /// The cached resolution of `name`, if it has been resolved.
    pub fn resolved(&self, name: &str) -> Option<&Arc<ResolvedReleaseConfig>> {
        let config = self.get_release_config_strict(name).ok()?;
        self.resolved.get(&config.name)
    }

    /// Like [`resolved`](Self::resolved), but an error when unresolved.
    pub fn resolved_strict(&self, name: &str) -> Result<&Arc<ResolvedReleaseConfig>> {
        let config = self.get_release_config_strict(name)?;
        self.resolved
            .get(&config.name)
            .ok_or_else(|| Error::NotResolved {
                name: config.name.clone(),
            })
    }

    /// Resolve every release config and assemble the combined artifact.
    ///
    /// `target_release` may be an alias; it is looked up with
    /// [`get_release_config`](Self::get_release_config).
    pub fn generate_release_configs(
        &mut self,
        target_release: &str,
    ) -> Result<ReleaseConfigsArtifact> {
        let names: Vec<String> = self.release_configs.keys().cloned().collect();
        for name in &names {
            self.generate_release_config(name)?;
        }

        let target = self.get_release_config(target_release)?.name.clone();
        let release_config = self.resolved_strict(&target)?.artifact.clone();
        let mut other_release_configs = Vec::new();
        for name in names.iter().filter(|name| **name != target) {
            other_release_configs.push(self.resolved_strict(name)?.artifact.clone());
        }

        let release_config_maps_map = self
            .release_config_maps
            .iter()
            .map(|map| (map.dir.clone(), map.message.clone()))
            .collect();

        tracing::info!(
            target = %target,
            configs = names.len(),
            "Generated release configs"
        );
        Ok(ReleaseConfigsArtifact {
            release_config,
            other_release_configs,
            release_config_maps_map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_flags::ReleaseConfigType;

    fn registry_with(names: &[&str], aliases: &[(&str, &str)]) -> ReleaseConfigs {
        let mut configs = ReleaseConfigs::new();
        for name in names {
            configs.release_configs.insert(
                name.to_string(),
                ReleaseConfig::new(*name, 0, ReleaseConfigType::ReleaseConfig),
            );
        }
        for (alias, target) in aliases {
            configs.aliases.insert(alias.to_string(), target.to_string());
        }
        configs
    }

    #[test]
    fn new_registry_seeds_aconfig_value_sets() {
        let configs = ReleaseConfigs::new();
        let fa = configs.flag_artifacts().get(RELEASE_ACONFIG_VALUE_SETS).unwrap();
        assert_eq!(fa.declaration_index, None);
        assert_eq!(fa.traces.len(), 1);
        assert_eq!(fa.declared_in(), ENGINE_SOURCE);
    }

    #[test]
    fn get_release_config_follows_alias_chain() {
        let configs = registry_with(&["ap4a"], &[("next", "staging"), ("staging", "ap4a")]);
        assert_eq!(configs.get_release_config("next").unwrap().name, "ap4a");
    }

    #[test]
    fn get_release_config_reports_trace() {
        let configs = registry_with(&["ap4a"], &[("next", "gone")]);
        let err = configs.get_release_config("next").unwrap_err();
        match err {
            Error::ReleaseConfigNotFound { name, trace } => {
                assert_eq!(name, "gone");
                assert_eq!(trace, vec!["next", "gone"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn alias_loop_is_an_error() {
        let configs = registry_with(&[], &[("a", "b"), ("b", "a")]);
        assert!(matches!(
            configs.get_release_config("a"),
            Err(Error::AliasLoop { .. })
        ));
    }

    #[test]
    fn allow_missing_falls_back_only_in_non_strict_lookup() {
        let mut configs = registry_with(&["trunk_staging"], &[]);
        configs.set_allow_missing(true);

        assert_eq!(
            configs.get_release_config("vgsbr").unwrap().name,
            "trunk_staging"
        );
        assert!(configs.get_release_config_strict("vgsbr").is_err());
    }

    #[test]
    fn all_release_names_include_aliases_sorted() {
        let configs = registry_with(&["trunk", "ap4a"], &[("next", "ap4a")]);
        assert_eq!(configs.get_all_release_names(), vec!["ap4a", "next", "trunk"]);
    }

    #[test]
    fn link_aliases_sets_other_names() {
        let mut configs = registry_with(&["ap4a"], &[("next", "ap4a"), ("beta", "next")]);
        configs.link_aliases().unwrap();
        let config = configs.get_release_config_strict("ap4a").unwrap();
        assert_eq!(config.other_names, vec!["beta", "next"]);
        assert_eq!(
            configs.get_listable_release_names(),
            vec!["ap4a", "beta", "next"]
        );
    }

    #[test]
    fn link_aliases_rejects_shadowing_and_dangling() {
        let mut shadow = registry_with(&["ap4a", "next"], &[("next", "ap4a")]);
        assert!(matches!(
            shadow.link_aliases(),
            Err(Error::AliasShadowsConfig { .. })
        ));

        let mut dangling = registry_with(&["ap4a"], &[("next", "ap5a")]);
        assert!(matches!(
            dangling.link_aliases(),
            Err(Error::DanglingAlias { .. })
        ));
    }

    #[test]
    fn resolved_strict_errors_before_resolution() {
        let configs = registry_with(&["trunk"], &[]);
        assert!(matches!(
            configs.resolved_strict("trunk"),
            Err(Error::NotResolved { .. })
        ));
    }
}
