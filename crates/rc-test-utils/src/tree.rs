//! [`ConfigTree`] builder for release config test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary source tree holding release config directories.
///
/// Every helper takes the config directory relative to the tree root and
/// writes TOML in the layout the scanner reads.
///
/// # Example
///
/// ```rust,no_run
/// use rc_test_utils::ConfigTree;
///
/// let tree = ConfigTree::new();
/// tree.config_map("build/release", &["system"], &[("next", "ap4a")]);
/// tree.declare_flag("build/release", "RELEASE_FOO", "foo.toml", "workflow = \"LAUNCH\"");
/// tree.release_config("build/release", "ap4a", "aconfig_value_sets = [\"set_a\"]");
/// tree.flag_value("build/release", "ap4a", "RELEASE_FOO", "{ bool_value = true }");
/// ```
pub struct ConfigTree {
    temp_dir: TempDir,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigTree {
    /// Create an empty temporary tree.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative`.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", path.display()));
    }

    /// Read `relative` as a string.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.path(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    /// Write `<dir>/release_config_map.toml`.
    pub fn config_map(&self, dir: &str, default_containers: &[&str], aliases: &[(&str, &str)]) {
        let containers = default_containers
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let mut content = format!("default_containers = [{containers}]\n");
        for (name, target) in aliases {
            content.push_str(&format!(
                "\n[[aliases]]\nname = \"{name}\"\ntarget = \"{target}\"\n"
            ));
        }
        self.write(&format!("{dir}/release_config_map.toml"), &content);
    }

    /// Write `<dir>/flag_declarations/<file>` declaring `name`.
    ///
    /// `body` holds any further top-level keys, e.g.
    /// `value = { bool_value = true }` or `workflow = "MANUAL"`.
    pub fn declare_flag(&self, dir: &str, name: &str, file: &str, body: &str) {
        let content = format!("name = \"{name}\"\nnamespace = \"build\"\n{body}\n");
        self.write(&format!("{dir}/flag_declarations/{file}"), &content);
    }

    /// Write `<dir>/release_configs/<name>.toml`.
    pub fn release_config(&self, dir: &str, name: &str, body: &str) {
        let content = format!("name = \"{name}\"\n{body}\n");
        self.write(&format!("{dir}/release_configs/{name}.toml"), &content);
    }

    /// Write `<dir>/flag_values/<release>/<flag>.toml`.
    ///
    /// `value` is a TOML value such as `{ string_value = "x" }`.
    pub fn flag_value(&self, dir: &str, release: &str, flag: &str, value: &str) {
        let content = format!("name = \"{flag}\"\nvalue = {value}\n");
        self.write(&format!("{dir}/flag_values/{release}/{flag}.toml"), &content);
    }

    /// Write a flag value file that redacts `flag` in `release`.
    pub fn redact(&self, dir: &str, release: &str, flag: &str) {
        let content = format!("name = \"{flag}\"\nredacted = true\n");
        self.write(&format!("{dir}/flag_values/{release}/{flag}.toml"), &content);
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    /// Assert that `relative` does **not** exist.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(
            !path.exists(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }
}
