//! CLI argument parsing using clap derive

use clap::{ArgAction, Parser};

/// Config directories used when no --map is given, relative to --top.
pub const DEFAULT_MAP_DIRS: [&str; 3] = [
    "build/release",
    "vendor/google_shared/build/release",
    "vendor/google/release",
];

/// Resolve release configs and write the build's flag files
#[derive(Parser, Debug)]
#[command(name = "release-config")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Top of the source tree
    #[arg(long, default_value = ".")]
    pub top: String,

    /// Config directory holding a release_config_map.toml. Repeatable;
    /// order sets the declaration index.
    #[arg(long = "map")]
    pub maps: Vec<String>,

    /// Release config to generate
    #[arg(long, env = "TARGET_RELEASE", default_value = "trunk_staging")]
    pub release: String,

    /// Product name used in output file names
    #[arg(long, env = "TARGET_PRODUCT", default_value = "product")]
    pub product: String,

    /// Build variant whose BUILD_VARIANT config is applied on request
    #[arg(long, env = "TARGET_BUILD_VARIANT")]
    pub build_variant: Option<String>,

    /// Fail if the requested build variant config cannot be applied
    #[arg(long)]
    pub require_build_variant: bool,

    /// Fall back to trunk_staging for unknown release names
    #[arg(long)]
    pub allow_missing: bool,

    /// Output directory, relative to --top unless absolute
    #[arg(long, default_value = "out/soong/release-config")]
    pub out_dir: String,

    /// Write the JSON artifacts
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub json: bool,

    /// Write a makefile for every release config
    #[arg(long)]
    pub all_make: bool,

    /// Write the inheritance graph
    #[arg(long)]
    pub inheritance: bool,

    /// Print the release configs usable as TARGET_RELEASE and exit
    #[arg(long)]
    pub list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
