//! Flag declarations

use crate::{Error, Result, Value};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static FLAG_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap());

static CONTAINER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// How a flag's value advances through release stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Workflow {
    #[default]
    #[serde(rename = "UNSPECIFIED_WORKFLOW")]
    Unspecified,
    /// Boolean flag that launches through the release stages.
    Launch,
    /// Value chosen by prebuilt selection.
    Prebuilt,
    /// Value maintained by hand. The only kind allowed in `root`.
    Manual,
}

impl std::fmt::Display for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unspecified => "UNSPECIFIED_WORKFLOW",
            Self::Launch => "LAUNCH",
            Self::Prebuilt => "PREBUILT",
            Self::Manual => "MANUAL",
        };
        f.write_str(name)
    }
}

/// The canonical definition of a build flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagDeclaration {
    pub name: String,

    pub namespace: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bugs: Vec<String>,

    /// Default value
    #[serde(default)]
    pub value: Value,

    #[serde(default)]
    pub workflow: Workflow,

    /// Partitions the flag is exported to. Empty means "use the directory's
    /// default containers".
    #[serde(default)]
    pub containers: Vec<String>,
}

impl FlagDeclaration {
    /// Check the name and containers. `path` is only used for messages.
    pub fn validate(&self, path: &str) -> Result<()> {
        validate_flag_name(&self.name, path)?;
        for container in &self.containers {
            validate_container(container, path)?;
        }
        Ok(())
    }
}

pub fn validate_flag_name(name: &str, path: &str) -> Result<()> {
    if FLAG_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidFlagName {
            name: name.to_string(),
            path: path.to_string(),
        })
    }
}

pub fn validate_container(container: &str, path: &str) -> Result<()> {
    if CONTAINER_PATTERN.is_match(container) {
        Ok(())
    } else {
        Err(Error::InvalidContainer {
            container: container.to_string(),
            path: path.to_string(),
        })
    }
}
