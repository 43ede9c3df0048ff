//! Tagged flag values

use serde::{Deserialize, Serialize};

/// The value of a build flag.
///
/// Serialized with the field names of the original message, e.g.
/// `{ "bool_value": true }` or `{ "string_value": "x" }`; the unit variants
/// appear as the bare strings `"unspecified_value"` and `"obsolete"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    #[default]
    #[serde(rename = "unspecified_value")]
    Unspecified,
    #[serde(rename = "string_value")]
    String(String),
    #[serde(rename = "bool_value")]
    Bool(bool),
    /// The flag is obsolete (redacted).
    #[serde(rename = "obsolete")]
    Obsolete,
}

impl Value {
    /// Render the value the way Make sees it.
    ///
    /// `false` renders as the empty string so that `ifeq (,$(FLAG))` style
    /// tests work.
    pub fn marshal(&self) -> String {
        match self {
            Self::Unspecified => String::new(),
            Self::String(s) => s.clone(),
            Self::Bool(true) => "true".to_string(),
            Self::Bool(false) => String::new(),
            Self::Obsolete => " #OBSOLETE".to_string(),
        }
    }

    /// Parse a rendered value. `true`/`false` (any case) become bools.
    pub fn unmarshal(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::String(s.to_string()),
        }
    }

    /// Name of the value type, as written to `_ALL_RELEASE_FLAGS.<flag>.TYPE`.
    pub fn value_type(&self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::String(_) => "string",
            Self::Bool(_) => "bool",
            Self::Obsolete => "obsolete",
        }
    }

    /// The string payload, or `""` for non-string values.
    pub fn string_value(&self) -> &str {
        match self {
            Self::String(s) => s,
            _ => "",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.marshal())
    }
}
