//! Makefile fragment for one resolved release config

use crate::registry::ReleaseConfigs;
use crate::release_config::ResolvedReleaseConfig;
use crate::Result;
use rc_flags::{
    FlagArtifact, RELEASE_ACONFIG_EXTRA_RELEASE_CONFIGS, RELEASE_ACONFIG_FLAG_DEFAULT_PERMISSION,
    RELEASE_ACONFIG_VALUE_SETS,
};
use rc_fs::{NormalizedPath, io};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Render the `.varmk` fragment for release config `name`.
///
/// `target_release` is the name the user asked for; it is noted in the
/// header when it differs (an alias, or a fallback). Resolves `name` and
/// any configs named in `RELEASE_ACONFIG_EXTRA_RELEASE_CONFIGS` as needed.
///
/// All assignments use `:=$=` so Make never re-expands values.
pub fn render_makefile(
    configs: &mut ReleaseConfigs,
    name: &str,
    target_release: &str,
) -> Result<String> {
    let config = configs.generate_release_config(name)?;

    let extra_names: Vec<String> = config
        .flag_artifacts
        .get(RELEASE_ACONFIG_EXTRA_RELEASE_CONFIGS)
        .map(|fa| {
            fa.value
                .marshal()
                .split(' ')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let mut extras: Vec<(String, Arc<ResolvedReleaseConfig>)> = Vec::new();
    for extra in extra_names {
        let resolved = configs.generate_release_config(&extra)?;
        extras.push((extra, resolved));
    }

    let mut flags: BTreeMap<String, &FlagArtifact> = config
        .flag_artifacts
        .iter()
        .map(|fa| (fa.name().to_string(), fa))
        .collect();
    for (extra, resolved) in &extras {
        for flag in [RELEASE_ACONFIG_VALUE_SETS, RELEASE_ACONFIG_FLAG_DEFAULT_PERMISSION] {
            if let Some(fa) = resolved.flag_artifacts.get(flag) {
                flags.insert(format!("{flag}_{extra}"), fa);
            }
        }
    }

    let mut partitions: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    let mut vars: BTreeMap<String, String> = BTreeMap::new();
    for (flag, fa) in &flags {
        let decl = &fa.declaration;
        for container in &decl.containers {
            partitions
                .entry(container.as_str())
                .or_default()
                .push(flag.as_str());
        }
        let mut add = |suffix: &str, value: String| {
            vars.insert(format!("_ALL_RELEASE_FLAGS.{flag}.{suffix}"), value);
        };
        add("TYPE", fa.value.value_type().to_string());
        add("PARTITIONS", decl.containers.join(" "));
        add("DEFAULT", decl.value.marshal());
        add("VALUE", fa.value.marshal());
        add("DECLARED_IN", fa.declared_in().to_string());
        add("SET_IN", fa.set_in().to_string());
        add("NAMESPACE", decl.namespace.clone());
    }

    let names: Vec<&str> = flags.keys().map(String::as_str).collect();
    let mut data = format!("# TARGET_RELEASE={}\n", config.name);
    if target_release != config.name {
        data.push_str(&format!("# User specified TARGET_RELEASE={target_release}\n"));
    }
    data.push_str(&format!(
        "ALL_RELEASE_CONFIGS_FOR_PRODUCT :=$= {}\n",
        configs.get_listable_release_names().join(" ")
    ));
    if config.disallow_lunch_use() {
        data.push_str("_disallow_lunch_use :=$= true\n");
    }
    data.push_str(&format!("_used_files := {}\n", config.sorted_file_list().join(" ")));
    data.push_str(&format!("_ALL_RELEASE_FLAGS :=$= {}\n", names.join(" ")));
    for (partition, members) in &partitions {
        data.push_str(&format!(
            "_ALL_RELEASE_FLAGS.PARTITIONS.{partition} :=$= {}\n",
            members.join(" ")
        ));
    }
    for (var, value) in &vars {
        data.push_str(&format!("{var} :=$= {value}\n"));
    }
    data.push_str("\n\n# Values for all build flags\n");
    for (flag, fa) in &flags {
        data.push_str(&format!("{flag} :=$= {}\n", fa.value.marshal()));
    }
    Ok(data)
}

/// Render the `.varmk` fragment and write it to `path` if it changed.
///
/// Returns true if the file was written.
pub fn write_makefile(
    configs: &mut ReleaseConfigs,
    name: &str,
    target_release: &str,
    path: &NormalizedPath,
) -> Result<bool> {
    let data = render_makefile(configs, name, target_release)?;
    let written = io::write_if_changed(path, &data)?;
    tracing::info!(path = %path, release_config = name, written, "Wrote makefile");
    Ok(written)
}
