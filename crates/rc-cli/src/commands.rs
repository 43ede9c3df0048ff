//! Command implementations

use crate::cli::{Cli, DEFAULT_MAP_DIRS};
use crate::error::{CliError, Result};
use rc_core::writers;
use rc_core::{BuildVariantPolicy, ConfigScanner, ReleaseConfigs, ResolveOptions};
use rc_fs::{ConfigPath, NormalizedPath};

/// Config directories to scan: the `--map` values, or the default
/// directories that hold a release config map.
pub fn map_dirs(top: &NormalizedPath, maps: &[String]) -> Result<Vec<String>> {
    if !maps.is_empty() {
        return Ok(maps.to_vec());
    }
    let found: Vec<String> = DEFAULT_MAP_DIRS
        .iter()
        .filter(|dir| {
            NormalizedPath::new(dir)
                .under(top)
                .join(ConfigPath::ReleaseConfigMap.as_str())
                .is_file()
        })
        .map(|dir| dir.to_string())
        .collect();
    if found.is_empty() {
        return Err(CliError::user(format!(
            "No release config maps found under {top}; pass --map"
        )));
    }
    Ok(found)
}

/// Scan the config directories and apply the resolution options.
pub fn load_configs(cli: &Cli) -> Result<ReleaseConfigs> {
    let top = NormalizedPath::new(&cli.top);
    let dirs = map_dirs(&top, &cli.maps)?;
    tracing::debug!(?dirs, "Scanning config directories");

    let mut configs = ConfigScanner::new(top.as_str()).scan(&dirs)?;
    configs.set_allow_missing(cli.allow_missing);
    configs.set_options(ResolveOptions {
        build_variant: cli.build_variant.clone(),
        build_variant_policy: if cli.require_build_variant {
            BuildVariantPolicy::Required
        } else {
            BuildVariantPolicy::BestEffort
        },
        ..ResolveOptions::default()
    });
    Ok(configs)
}

/// Print the release names usable as TARGET_RELEASE, one per line.
pub fn run_list(cli: &Cli) -> Result<()> {
    let configs = load_configs(cli)?;
    for name in configs.get_listable_release_names() {
        println!("{name}");
    }
    Ok(())
}

/// Resolve the requested release and write every output file.
///
/// Returns the written paths.
pub fn run_generate(cli: &Cli) -> Result<Vec<NormalizedPath>> {
    let top = NormalizedPath::new(&cli.top);
    let out_dir = NormalizedPath::new(&cli.out_dir).under(&top);
    let mut configs = load_configs(cli)?;
    let target = configs.get_release_config(&cli.release)?.name.clone();
    let mut written = Vec::new();

    let makefile = out_dir.join(&makefile_name(&cli.product, &cli.release));
    writers::write_makefile(&mut configs, &target, &cli.release, &makefile)?;
    written.push(makefile);

    if cli.all_make {
        let names: Vec<String> = configs.release_configs().map(|c| c.name.clone()).collect();
        for name in names.iter().filter(|name| **name != target) {
            let path = out_dir.join(&makefile_name(&cli.product, name));
            writers::write_makefile(&mut configs, name, name, &path)?;
            written.push(path);
        }
    }

    let resolved = configs.generate_release_config(&target)?;
    written.extend(writers::write_partition_build_flags(&resolved, &out_dir)?);

    if cli.json {
        let artifact = configs.generate_release_configs(&cli.release)?;
        let path = out_dir.join(&format!("release_config-{}-{}.json", cli.product, cli.release));
        writers::write_artifact(&artifact, &path)?;
        written.push(path);

        let path = out_dir.join(&format!("release_config_contributions-{}.json", cli.product));
        writers::write_contributions_artifact(&configs, &path)?;
        written.push(path);
    }

    if cli.inheritance {
        let path = out_dir.join(&format!("inheritance_graph-{}.dot", cli.product));
        writers::write_inheritance_graph(&configs, &path)?;
        written.push(path);
    }

    Ok(written)
}

fn makefile_name(product: &str, release: &str) -> String {
    format!("release_config-{product}-{release}.varmk")
}
