//! End-to-end tests of the scan -> resolve -> write pipeline
//!
//! The fixture mirrors a small source tree: a platform directory with the
//! root config and most declarations, and a vendor directory that declares
//! one more flag and overrides values for a release.

use pretty_assertions::assert_eq;
use rc_core::writers;
use rc_core::{ConfigScanner, ReleaseConfigs};
use rc_flags::{FlagArtifactsMessage, RELEASE_ACONFIG_VALUE_SETS, Value};
use rc_fs::{ConfigStore, NormalizedPath};
use rc_test_utils::ConfigTree;

const PLATFORM: &str = "build/release";
const VENDOR: &str = "vendor/google/release";

fn source_tree() -> ConfigTree {
    let tree = ConfigTree::new();

    tree.config_map(PLATFORM, &["system"], &[("next", "ap4a")]);
    tree.declare_flag(
        PLATFORM,
        "RELEASE_VERSION_NAME",
        "version/name.toml",
        "workflow = \"MANUAL\"\nvalue = { string_value = \"dev\" }",
    );
    tree.declare_flag(
        PLATFORM,
        "RELEASE_PLATFORM_VERSION",
        "version/platform.toml",
        "workflow = \"MANUAL\"",
    );
    tree.declare_flag(
        PLATFORM,
        "RELEASE_NEW_UI",
        "ui.toml",
        "workflow = \"LAUNCH\"\ncontainers = [\"system\", \"product\"]",
    );
    tree.declare_flag(PLATFORM, "RELEASE_OLD_API", "old_api.toml", "value = { bool_value = true }");
    tree.release_config(PLATFORM, "root", "");
    tree.flag_value(PLATFORM, "root", "RELEASE_VERSION_NAME", "{ string_value = \"root\" }");
    tree.release_config(PLATFORM, "trunk_staging", "aconfig_value_sets = [\"platform_sets\"]");
    tree.flag_value(PLATFORM, "trunk_staging", "RELEASE_NEW_UI", "{ bool_value = true }");
    tree.release_config(
        PLATFORM,
        "ap4a",
        "inherits = [\"trunk_staging\"]\nprior_stages = [\"ap3a\"]",
    );
    tree.redact(PLATFORM, "ap4a", "RELEASE_OLD_API");

    tree.config_map(VENDOR, &["vendor"], &[]);
    tree.declare_flag(VENDOR, "RELEASE_VENDOR_FEATURE", "feature.toml", "");
    tree.release_config(
        VENDOR,
        "ap4a",
        "aconfig_value_sets = [\"vendor_sets\", \"platform_sets\"]",
    );
    tree.flag_value(VENDOR, "ap4a", "RELEASE_VENDOR_FEATURE", "{ string_value = \"on\" }");
    tree.flag_value(VENDOR, "ap4a", "RELEASE_NEW_UI", "{ bool_value = false }");

    tree
}

fn scan(tree: &ConfigTree) -> ReleaseConfigs {
    ConfigScanner::new(tree.root())
        .scan(&[PLATFORM, VENDOR])
        .expect("fixture should scan")
}

#[test]
fn every_flag_value_matches_its_last_trace() {
    let tree = source_tree();
    let mut configs = scan(&tree);
    configs.generate_release_configs("trunk_staging").unwrap();

    for config in configs.release_configs() {
        let resolved = configs.resolved(&config.name).unwrap();
        for fa in resolved.flag_artifacts.iter() {
            let last = fa.traces.last().unwrap();
            assert_eq!(
                last.value, fa.value,
                "{} in {} does not match its last trace",
                fa.name(),
                config.name
            );
        }
    }
}

#[test]
fn release_resolves_across_directories() {
    let tree = source_tree();
    let mut configs = scan(&tree);
    let ap4a = configs.generate_release_config("next").unwrap();

    let value = |name: &str| ap4a.flag_artifacts.get(name).unwrap().value.clone();
    assert_eq!(value("RELEASE_VERSION_NAME"), Value::String("root".into()));
    assert_eq!(value("RELEASE_PLATFORM_VERSION"), Value::String("AP4A".into()));
    assert_eq!(value("RELEASE_NEW_UI"), Value::Bool(false));
    assert_eq!(value("RELEASE_VENDOR_FEATURE"), Value::String("on".into()));
    assert_eq!(value("RELEASE_OLD_API"), Value::Obsolete);

    assert_eq!(ap4a.artifact.inherits, vec!["root", "trunk_staging"]);
    assert_eq!(ap4a.artifact.aconfig_value_sets, vec!["platform_sets", "vendor_sets"]);
    assert_eq!(ap4a.artifact.directories, vec![PLATFORM, VENDOR]);
    assert_eq!(ap4a.artifact.value_directories, vec![PLATFORM, VENDOR]);
    assert_eq!(ap4a.artifact.prior_stages, vec!["ap3a"]);
    assert_eq!(ap4a.artifact.other_names, vec!["next"]);
}

#[test]
fn outputs_are_written_and_consistent() {
    let tree = source_tree();
    let mut configs = scan(&tree);
    let out = NormalizedPath::new(tree.path("out"));

    let makefile = out.join("release_config-product-next.varmk");
    writers::write_makefile(&mut configs, "ap4a", "next", &makefile).unwrap();
    let resolved = configs.generate_release_config("ap4a").unwrap();
    let partitions = writers::write_partition_build_flags(&resolved, &out).unwrap();
    let artifact = configs.generate_release_configs("next").unwrap();
    writers::write_artifact(&artifact, &out.join("release_config-product-next.json")).unwrap();
    writers::write_contributions_artifact(
        &configs,
        &out.join("release_config_contributions-product.json"),
    ).unwrap();
    writers::write_inheritance_graph(&configs, &out.join("inheritance_graph-product.dot")).unwrap();

    let varmk = tree.read("out/release_config-product-next.varmk");
    assert!(varmk.contains(
        "_ALL_RELEASE_FLAGS.PARTITIONS.vendor :=$= RELEASE_ACONFIG_VALUE_SETS RELEASE_VENDOR_FEATURE\n"
    ));
    assert!(varmk.contains("_ALL_RELEASE_FLAGS.RELEASE_OLD_API.VALUE :=$=  #OBSOLETE\n"));
    assert!(varmk.contains(
        "_ALL_RELEASE_FLAGS.RELEASE_VENDOR_FEATURE.SET_IN :=$= vendor/google/release/flag_values/ap4a/RELEASE_VENDOR_FEATURE.toml\n"
    ));

    // Redacted flags stay out of the partition files
    let names: Vec<&str> = partitions.iter().filter_map(|p| p.file_name()).collect();
    assert_eq!(
        names,
        vec![
            "build_flags_product.json",
            "build_flags_system.json",
            "build_flags_system_ext.json",
            "build_flags_vendor.json",
        ]
    );
    let system: FlagArtifactsMessage = ConfigStore::new()
        .load(&out.join("build_flags_system.json"))
        .unwrap();
    let system_flags: Vec<&str> = system
        .flag_artifacts
        .iter()
        .map(|f| f.flag_declaration.name.as_str())
        .collect();
    assert_eq!(
        system_flags,
        vec![
            RELEASE_ACONFIG_VALUE_SETS,
            "RELEASE_NEW_UI",
            "RELEASE_PLATFORM_VERSION",
            "RELEASE_VERSION_NAME",
        ]
    );

    let json: serde_json::Value =
        serde_json::from_str(&tree.read("out/release_config-product-next.json")).unwrap();
    assert_eq!(json["release_config"]["name"], "ap4a");
    assert_eq!(json["other_release_configs"].as_array().unwrap().len(), 2);

    let graph = tree.read("out/inheritance_graph-product.dot");
    assert!(graph.contains("\"ap4a\" -> \"trunk_staging\"\n"));
}

#[test]
fn rescanning_produces_identical_output() {
    let tree = source_tree();

    let render = || {
        let mut configs = scan(&tree);
        writers::render_makefile(&mut configs, "ap4a", "ap4a").unwrap()
    };
    assert_eq!(render(), render());
}
