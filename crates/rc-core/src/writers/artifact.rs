//! JSON artifacts describing every release config

use crate::registry::ReleaseConfigs;
use crate::{Error, Result};
use rc_flags::{
    ReleaseConfigContributionsArtifact, ReleaseConfigContributionsArtifacts,
    ReleaseConfigsArtifact,
};
use rc_fs::{ConfigStore, NormalizedPath};

/// Write the combined artifact. The format follows the extension of `path`.
pub fn write_artifact(artifact: &ReleaseConfigsArtifact, path: &NormalizedPath) -> Result<()> {
    ConfigStore::new().save(path, artifact)?;
    tracing::info!(path = %path, "Wrote release configs artifact");
    Ok(())
}

/// Directories that may contribute values to each release config, by name.
///
/// Every config must already be resolved, e.g. by
/// [`ReleaseConfigs::generate_release_configs`].
pub fn contributions_artifact(
    configs: &ReleaseConfigs,
) -> Result<ReleaseConfigContributionsArtifacts> {
    let release_config_contributions_artifact_list = configs
        .release_configs()
        .map(|config| -> Result<ReleaseConfigContributionsArtifact> {
            let resolved = configs.resolved(&config.name).ok_or_else(|| Error::NotResolved {
                name: config.name.clone(),
            })?;
            Ok(ReleaseConfigContributionsArtifact {
                name: config.name.clone(),
                contributing_directories: resolved.artifact.value_directories.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ReleaseConfigContributionsArtifacts {
        release_config_contributions_artifact_list,
    })
}

/// Write [`contributions_artifact`] to `path`.
pub fn write_contributions_artifact(configs: &ReleaseConfigs, path: &NormalizedPath) -> Result<()> {
    let artifact = contributions_artifact(configs)?;
    ConfigStore::new().save(path, &artifact)?;
    tracing::info!(path = %path, "Wrote release config contributions");
    Ok(())
}
