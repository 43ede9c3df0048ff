//! Config directory scanner
//!
//! Loads the ordered list of config directories into a [`ReleaseConfigs`]
//! registry. Each directory looks like:
//!
//! ```text
//! <dir>/
//!   release_config_map.toml
//!   flag_declarations/**/*.toml
//!   release_configs/<release>.toml
//!   flag_values/<release>/<FLAG>.toml
//! ```
//!
//! The position of a directory in the list is its declaration index.

use crate::registry::{ReleaseConfigMap, ReleaseConfigs};
use crate::release_config::{ReleaseConfig, ReleaseConfigContribution};
use crate::{Error, Result};
use rc_flags::{
    FlagArtifact, FlagDeclaration, FlagValue, FlagValueMessage, RELEASE_ACONFIG_VALUE_SETS,
    ReleaseConfigMapMessage, ReleaseConfigMessage, ReleaseConfigType, Value,
};
use rc_fs::constants::CONFIG_EXTENSION;
use rc_fs::{ConfigPath, ConfigStore, NormalizedPath, walk_files};
use std::path::Path;

/// Reads config directories relative to a source tree root.
#[derive(Debug, Clone)]
pub struct ConfigScanner {
    root: NormalizedPath,
    store: ConfigStore,
}

/// A config directory: where it is on disk and how it is named in output.
struct ConfigDir {
    /// Path used for I/O
    path: NormalizedPath,
    /// Path as given, used in traces and artifacts
    display: NormalizedPath,
}

impl ConfigDir {
    /// Name `file` (found under this directory) the way it appears in output.
    fn display_path(&self, file: &NormalizedPath) -> String {
        let relative = file
            .as_str()
            .strip_prefix(self.path.as_str())
            .unwrap_or(file.as_str())
            .trim_start_matches('/');
        self.display.join(relative).as_str().to_string()
    }
}

impl ConfigScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: NormalizedPath::new(root),
            store: ConfigStore::new(),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Load every directory, in order, and link aliases.
    pub fn scan<S: AsRef<str>>(&self, dirs: &[S]) -> Result<ReleaseConfigs> {
        let mut configs = ReleaseConfigs::new();
        for dir in dirs {
            self.load_release_config_map(&mut configs, dir.as_ref())?;
        }
        configs.link_aliases()?;
        tracing::info!(
            dirs = dirs.len(),
            release_configs = configs.release_configs.len(),
            flags = configs.flag_artifacts.len(),
            "Scanned config directories"
        );
        Ok(configs)
    }

    /// Load one config directory at the next declaration index.
    pub fn load_release_config_map(&self, configs: &mut ReleaseConfigs, dir: &str) -> Result<()> {
        let display = NormalizedPath::new(dir);
        if configs.config_dirs.iter().any(|d| d == display.as_str()) {
            return Err(Error::DuplicateConfigDir {
                dir: display.as_str().to_string(),
            });
        }
        let dir = ConfigDir {
            path: display.under(&self.root),
            display,
        };
        let index = configs.config_dirs.len();
        tracing::debug!(dir = %dir.display, index, "Loading config directory");

        let map_path = dir.path.join(ConfigPath::ReleaseConfigMap.as_str());
        let map_display = dir.display_path(&map_path);
        if !map_path.is_file() {
            return Err(Error::MissingConfigMap { path: map_display });
        }
        let message: ReleaseConfigMapMessage = self.store.load(&map_path)?;

        for alias in &message.aliases {
            if let Some(previous) = configs.aliases.get(&alias.name) {
                if *previous != alias.target {
                    return Err(Error::AliasRedefined {
                        name: alias.name.clone(),
                        previous: previous.clone(),
                        target: alias.target.clone(),
                        path: map_display,
                    });
                }
            }
            configs
                .aliases
                .insert(alias.name.clone(), alias.target.clone());
        }

        configs.config_dirs.push(dir.display.as_str().to_string());
        configs.files_used.insert(map_display.clone());

        self.load_declarations(configs, &dir, index, &message.default_containers)?;
        self.load_release_configs(configs, &dir, index)?;

        configs.release_config_maps.push(ReleaseConfigMap {
            dir: dir.display.as_str().to_string(),
            path: map_display,
            message,
        });
        Ok(())
    }

    fn load_declarations(
        &self,
        configs: &mut ReleaseConfigs,
        dir: &ConfigDir,
        index: usize,
        default_containers: &[String],
    ) -> Result<()> {
        let decl_dir = dir.path.join(ConfigPath::FlagDeclarations.as_str());
        for file in walk_files(&decl_dir, CONFIG_EXTENSION)? {
            let path = dir.display_path(&file);
            let mut declaration: FlagDeclaration = self.store.load(&file)?;
            if declaration.containers.is_empty() {
                declaration.containers = default_containers.to_vec();
            }
            declaration.validate(&path)?;

            if declaration.name == RELEASE_ACONFIG_VALUE_SETS {
                return Err(Error::ReservedFlag {
                    name: declaration.name,
                    path,
                });
            }
            if declaration.value == Value::Obsolete {
                return Err(Error::RedactedByDefault {
                    name: declaration.name,
                    path,
                });
            }

            match configs.flag_artifacts.get(&declaration.name) {
                Some(existing)
                    if existing.declaration_index == Some(index)
                        && existing.declaration == declaration =>
                {
                    tracing::debug!(flag = %declaration.name, %path, "Identical redeclaration");
                }
                Some(existing) => {
                    return Err(Error::FlagAlreadyDeclared {
                        name: declaration.name,
                        path,
                        existing: existing.declared_in().to_string(),
                    });
                }
                None => {
                    configs
                        .flag_artifacts
                        .insert(FlagArtifact::declare(declaration, Some(index), path.clone()));
                }
            }
            configs.files_used.insert(path);
        }
        Ok(())
    }

    fn load_release_configs(
        &self,
        configs: &mut ReleaseConfigs,
        dir: &ConfigDir,
        index: usize,
    ) -> Result<()> {
        let rc_dir = dir.path.join(ConfigPath::ReleaseConfigs.as_str());
        for file in walk_files(&rc_dir, CONFIG_EXTENSION)? {
            let path = dir.display_path(&file);
            let message: ReleaseConfigMessage = self.store.load(&file)?;
            if file.file_stem() != Some(message.name.as_str()) {
                return Err(Error::ReleaseConfigFileName {
                    name: message.name,
                    path,
                });
            }
            let kind = match message.release_config_type {
                None | Some(ReleaseConfigType::Unspecified) => ReleaseConfigType::ReleaseConfig,
                Some(kind) => kind,
            };
            let name = message.name.clone();

            let mut contribution = ReleaseConfigContribution::new(path.clone(), index, message);
            let values_dir = dir
                .path
                .join(ConfigPath::FlagValues.as_str())
                .join(&name);
            let mut value_files = Vec::new();
            for value_file in walk_files(&values_dir, CONFIG_EXTENSION)? {
                let value_path = dir.display_path(&value_file);
                let value: FlagValueMessage = self.store.load(&value_file)?;
                if value_file.file_stem() != Some(value.name.as_str()) {
                    return Err(Error::FlagValueFileName {
                        name: value.name,
                        path: value_path,
                    });
                }
                contribution
                    .flag_values
                    .push(FlagValue::from_message(value_path.clone(), value));
                value_files.push(value_path);
            }

            let config = configs
                .release_configs
                .entry(name.clone())
                .or_insert_with(|| ReleaseConfig::new(name.clone(), index, kind));
            if config.release_config_type != kind {
                return Err(Error::ReleaseConfigTypeMismatch {
                    name,
                    path,
                    expected: config.release_config_type,
                    found: kind,
                });
            }
            if let Some(existing) = config
                .contributions
                .iter()
                .find(|c| c.declaration_index == index)
            {
                return Err(Error::DuplicateContribution {
                    name,
                    path,
                    existing: existing.path.clone(),
                });
            }

            tracing::debug!(
                release_config = %name,
                %path,
                values = contribution.flag_values.len(),
                "Loaded contribution"
            );
            config.files_used.insert(path);
            config.files_used.extend(value_files);
            config.add_contribution(contribution);
        }
        Ok(())
    }
}
