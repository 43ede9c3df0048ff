//! Well-known file and directory names inside a config directory.

use std::path::Path;

/// Entries of a release config directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPath {
    /// The `release_config_map.toml` file describing the directory
    ReleaseConfigMap,
    /// The `flag_declarations` directory
    FlagDeclarations,
    /// The `release_configs` directory
    ReleaseConfigs,
    /// The `flag_values` directory, one subdirectory per release config
    FlagValues,
}

impl ConfigPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReleaseConfigMap => "release_config_map.toml",
            Self::FlagDeclarations => "flag_declarations",
            Self::ReleaseConfigs => "release_configs",
            Self::FlagValues => "flag_values",
        }
    }
}

/// Extension of every input file.
pub const CONFIG_EXTENSION: &str = "toml";

impl AsRef<Path> for ConfigPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for ConfigPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
