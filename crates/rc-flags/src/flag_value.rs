//! Flag value assignments

use crate::Value;
use crate::messages::FlagValueMessage;

/// One assignment of a value to a flag, with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValue {
    /// Path of the file providing the value
    pub path: String,
    pub name: String,
    pub value: Value,
    /// The assignment hides the flag instead of setting it.
    pub redacted: bool,
}

impl FlagValue {
    pub fn new(path: impl Into<String>, name: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            value,
            redacted: false,
        }
    }

    /// Build a value from a parsed `flag_values` file.
    pub fn from_message(path: impl Into<String>, message: FlagValueMessage) -> Self {
        Self {
            path: path.into(),
            name: message.name,
            value: message.value,
            redacted: message.redacted,
        }
    }

    /// A value that redacts the flag.
    pub fn redaction(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            value: Value::Obsolete,
            redacted: true,
        }
    }
}
