//! Error types for rc-flags

/// Result type for rc-flags operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating or updating flags
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Flag names are upper-case identifiers
    #[error("{path}: invalid flag name {name:?}")]
    InvalidFlagName { name: String, path: String },

    /// Container names are lower-case identifiers
    #[error("{path}: flag declaration has invalid container {container:?}")]
    InvalidContainer { container: String, path: String },

    /// A plain value was assigned to a flag that is already redacted
    #[error("Cannot set value for redacted flag {name} in {path}")]
    RedactedFlag { name: String, path: String },

    /// A value was routed to the artifact of a different flag
    #[error("{path}: value for flag {found} applied to flag {expected}")]
    NameMismatch {
        expected: String,
        found: String,
        path: String,
    },
}
