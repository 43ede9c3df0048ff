//! End-to-end tests that invoke the compiled `release-config` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use rc_test_utils::ConfigTree;

const BUILD: &str = "build/release";

fn fixture() -> ConfigTree {
    let tree = ConfigTree::new();
    tree.config_map(BUILD, &["system"], &[("next", "ap4a")]);
    tree.declare_flag(BUILD, "RELEASE_FOO", "foo.toml", "value = { bool_value = false }");
    tree.release_config(BUILD, "trunk_staging", "aconfig_value_sets = [\"set_a\"]");
    tree.release_config(BUILD, "ap4a", "inherits = [\"trunk_staging\"]");
    tree.flag_value(BUILD, "ap4a", "RELEASE_FOO", "{ bool_value = true }");
    tree.release_config(BUILD, "eng", "release_config_type = \"BUILD_VARIANT\"");
    tree
}

/// `release-config` rooted at `tree`, with the build environment cleared.
fn release_config(tree: &ConfigTree) -> Command {
    let mut cmd = Command::cargo_bin("release-config").unwrap();
    cmd.current_dir(tree.root())
        .env_remove("TARGET_RELEASE")
        .env_remove("TARGET_PRODUCT")
        .env_remove("TARGET_BUILD_VARIANT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_exits_zero() {
    let tree = ConfigTree::new();
    release_config(&tree)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--map"));
}

#[test]
fn list_prints_listable_names() {
    let tree = fixture();
    release_config(&tree)
        .arg("--list")
        .assert()
        .success()
        .stdout("ap4a\nnext\ntrunk_staging\n");
}

#[test]
fn generate_writes_makefile_and_partition_flags() {
    let tree = fixture();
    release_config(&tree)
        .args(["--release", "next", "--product", "aosp_arm64"])
        .assert()
        .success();

    let out = "out/soong/release-config";
    let varmk = tree.read(&format!("{out}/release_config-aosp_arm64-next.varmk"));
    assert!(varmk.starts_with("# TARGET_RELEASE=ap4a\n# User specified TARGET_RELEASE=next\n"));
    assert!(varmk.contains("\nRELEASE_FOO :=$= true\n"));
    assert!(varmk.contains("\nRELEASE_ACONFIG_VALUE_SETS :=$= set_a\n"));

    tree.assert_file_exists(&format!("{out}/build_flags_system.json"));
    tree.assert_file_exists(&format!("{out}/release_config_contributions-aosp_arm64.json"));
    tree.assert_file_not_exists(&format!("{out}/inheritance_graph-aosp_arm64.dot"));

    let json = tree.read(&format!("{out}/release_config-aosp_arm64-next.json"));
    let artifact: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(artifact["release_config"]["name"], "ap4a");
}

#[test]
fn target_release_comes_from_the_environment() {
    let tree = fixture();
    release_config(&tree)
        .env("TARGET_RELEASE", "ap4a")
        .args(["--json", "false", "--inheritance"])
        .assert()
        .success();

    tree.assert_file_exists("out/soong/release-config/release_config-product-ap4a.varmk");
    tree.assert_file_exists("out/soong/release-config/inheritance_graph-product.dot");
    tree.assert_file_not_exists("out/soong/release-config/release_config-product-ap4a.json");
}

#[test]
fn all_make_writes_every_config() {
    let tree = fixture();
    release_config(&tree)
        .args(["--all-make", "--json", "false"])
        .assert()
        .success();

    for name in ["trunk_staging", "ap4a", "eng"] {
        tree.assert_file_exists(&format!(
            "out/soong/release-config/release_config-product-{name}.varmk"
        ));
    }
}

#[test]
fn all_make_with_alias_writes_target_once() {
    let tree = fixture();
    release_config(&tree)
        .args(["--release", "next", "--all-make", "--json", "false"])
        .assert()
        .success();

    let out = "out/soong/release-config";
    let varmk = tree.read(&format!("{out}/release_config-product-next.varmk"));
    assert!(varmk.starts_with("# TARGET_RELEASE=ap4a\n"));
    tree.assert_file_not_exists(&format!("{out}/release_config-product-ap4a.varmk"));
    for name in ["trunk_staging", "eng"] {
        tree.assert_file_exists(&format!("{out}/release_config-product-{name}.varmk"));
    }
}

#[test]
fn unknown_release_fails() {
    let tree = fixture();
    release_config(&tree)
        .args(["--release", "vgsbr"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing config vgsbr"));
}

#[test]
fn allow_missing_falls_back_to_trunk_staging() {
    let tree = fixture();
    release_config(&tree)
        .args(["--release", "vgsbr", "--allow-missing", "--json", "false"])
        .assert()
        .success();

    let varmk = tree.read("out/soong/release-config/release_config-product-vgsbr.varmk");
    assert!(varmk.starts_with("# TARGET_RELEASE=trunk_staging\n"));
}

#[test]
fn required_build_variant_must_exist() {
    let tree = fixture();
    tree.declare_flag(BUILD, "RELEASE_BUILD_USE_VARIANT_FLAGS", "variant.toml", "");
    tree.flag_value(
        BUILD,
        "trunk_staging",
        "RELEASE_BUILD_USE_VARIANT_FLAGS",
        "{ bool_value = true }",
    );

    release_config(&tree)
        .args(["--build-variant", "user", "--json", "false"])
        .assert()
        .success();

    release_config(&tree)
        .args(["--build-variant", "user", "--require-build-variant", "--json", "false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires build variant user"));
}

#[test]
fn missing_config_map_is_reported() {
    let tree = ConfigTree::new();
    release_config(&tree)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No release config maps found"));
}
