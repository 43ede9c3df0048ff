//! Error types for rc-core

/// Result type for rc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while scanning config directories or resolving releases.
///
/// Every variant names the release config, flag and/or file involved so the
/// message points at the input to fix.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A config directory was listed twice
    #[error("Duplicate config directory {dir}")]
    DuplicateConfigDir { dir: String },

    /// A config directory has no release_config_map.toml
    #[error("No release config map at {path}")]
    MissingConfigMap { path: String },

    #[error("{path}: alias {name} redefined from {previous} to {target}")]
    AliasRedefined {
        name: String,
        previous: String,
        target: String,
        path: String,
    },

    #[error("Alias {name} is a declared release config")]
    AliasShadowsConfig { name: String },

    #[error("Alias {name} points to non-existing config {target}")]
    DanglingAlias { name: String, target: String },

    #[error("Alias loop detected for {name}: {}", trace.join(" -> "))]
    AliasLoop { name: String, trace: Vec<String> },

    #[error("{path}: {name} is a reserved build flag")]
    ReservedFlag { name: String, path: String },

    #[error("Duplicate definition of {name} in {path}: already declared in {existing}")]
    FlagAlreadyDeclared {
        name: String,
        path: String,
        existing: String,
    },

    #[error("{name} may not be redacted by default ({path})")]
    RedactedByDefault { name: String, path: String },

    #[error("{path} incorrectly declares release config {name}")]
    ReleaseConfigFileName { name: String, path: String },

    #[error("{path} incorrectly sets value for flag {name}")]
    FlagValueFileName { name: String, path: String },

    #[error("{path}: release config {name} already has a contribution from {existing}")]
    DuplicateContribution {
        name: String,
        path: String,
        existing: String,
    },

    #[error("{path}: mismatching release_config_type {found} for {name} (declared as {expected})")]
    ReleaseConfigTypeMismatch {
        name: String,
        path: String,
        expected: rc_flags::ReleaseConfigType,
        found: rc_flags::ReleaseConfigType,
    },

    #[error("Missing config {name}. Trace={}", trace.join(" -> "))]
    ReleaseConfigNotFound { name: String, trace: Vec<String> },

    #[error("Loop detected for release config {name}")]
    InheritanceLoop { name: String },

    #[error("{name} cannot inherit from alias {alias}")]
    InheritFromAlias { name: String, alias: String },

    #[error("Release config {name} (type '{kind}') cannot inherit from {parent} (type '{parent_kind}')")]
    InheritanceTypeMismatch {
        name: String,
        kind: rc_flags::ReleaseConfigType,
        parent: String,
        parent_kind: rc_flags::ReleaseConfigType,
    },

    #[error("Could not inherit flag {flag} from {parent}")]
    MissingInheritedFlag { flag: String, parent: String },

    #[error("Setting value for undefined flag {flag} in {path}")]
    UndefinedFlag { flag: String, path: String },

    #[error("Setting value for flag {flag} (declared in {declared_in}) not allowed in {path}")]
    SetBeforeDeclare {
        flag: String,
        declared_in: String,
        path: String,
    },

    #[error("Setting value for non-MANUAL flag {flag} is not allowed in {path}")]
    NonManualInRoot { flag: String, path: String },

    #[error("{name} does not allow build flag overrides: {flag} set in {path}")]
    AconfigFlagsOnly {
        name: String,
        flag: String,
        path: String,
    },

    #[error("{name} is declared in both {first} and {second}")]
    ExclusiveDirectories {
        name: String,
        first: String,
        second: String,
    },

    #[error("Release config {name} requires build variant {variant}: {reason}")]
    BuildVariantUnavailable {
        name: String,
        variant: String,
        reason: String,
    },

    #[error("Release config {name} has not been resolved")]
    NotResolved { name: String },

    // Transparent wrappers for underlying crate errors
    /// Flag model error from rc-flags
    #[error(transparent)]
    Flags(#[from] rc_flags::Error),

    /// Filesystem error from rc-fs
    #[error(transparent)]
    Fs(#[from] rc_fs::Error),
}
