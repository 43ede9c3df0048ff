//! Resolved flag state with provenance

use crate::messages::FlagArtifactMessage;
use crate::{Error, FlagDeclaration, FlagValue, Result, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One provenance record: where a value was established or changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracepoint {
    pub source: String,
    pub value: Value,
}

impl Tracepoint {
    pub fn new(source: impl Into<String>, value: Value) -> Self {
        Self {
            source: source.into(),
            value,
        }
    }
}

/// The state of one flag within one release config.
///
/// `traces[0]` is always the declaration (or the engine, for synthesized
/// flags). Traces are only ever appended.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagArtifact {
    pub declaration: FlagDeclaration,
    /// Index of the config directory that declared the flag. `None` for
    /// flags synthesized by the engine, which may be set anywhere.
    pub declaration_index: Option<usize>,
    pub value: Value,
    pub traces: Vec<Tracepoint>,
    pub redacted: bool,
}

impl FlagArtifact {
    /// Create the base artifact for a declaration found in `source`.
    pub fn declare(
        declaration: FlagDeclaration,
        declaration_index: Option<usize>,
        source: impl Into<String>,
    ) -> Self {
        let value = declaration.value.clone();
        Self {
            traces: vec![Tracepoint::new(source, value.clone())],
            declaration,
            declaration_index,
            value,
            redacted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    /// Apply a value assignment, recording it in the traces.
    pub fn update_value(&mut self, flag_value: &FlagValue) -> Result<()> {
        if flag_value.name != self.declaration.name {
            return Err(Error::NameMismatch {
                expected: self.declaration.name.clone(),
                found: flag_value.name.clone(),
                path: flag_value.path.clone(),
            });
        }
        if flag_value.redacted {
            self.redact();
            self.traces
                .push(Tracepoint::new(flag_value.path.clone(), Value::Obsolete));
            return Ok(());
        }
        if self.redacted {
            return Err(Error::RedactedFlag {
                name: self.declaration.name.clone(),
                path: flag_value.path.clone(),
            });
        }
        self.traces
            .push(Tracepoint::new(flag_value.path.clone(), flag_value.value.clone()));
        self.value = flag_value.value.clone();
        Ok(())
    }

    /// Hide the flag. Its traces are kept.
    pub fn redact(&mut self) {
        self.redacted = true;
        self.value = Value::Obsolete;
    }

    /// File that declared the flag.
    pub fn declared_in(&self) -> &str {
        self.traces.first().map(|t| t.source.as_str()).unwrap_or("")
    }

    /// File that last set the flag.
    pub fn set_in(&self) -> &str {
        self.traces.last().map(|t| t.source.as_str()).unwrap_or("")
    }

    /// True when something after the declaration assigned a value.
    pub fn is_overridden(&self) -> bool {
        self.traces.len() > 1
    }

    /// Full message, with traces.
    pub fn to_message(&self) -> FlagArtifactMessage {
        FlagArtifactMessage {
            flag_declaration: self.declaration.clone(),
            value: self.value.clone(),
            traces: self.traces.clone(),
        }
    }

    /// Message without traces, or `None` for a redacted flag.
    pub fn marshal_without_traces(&self) -> Option<FlagArtifactMessage> {
        if self.redacted {
            return None;
        }
        Some(FlagArtifactMessage {
            flag_declaration: self.declaration.clone(),
            value: self.value.clone(),
            traces: Vec::new(),
        })
    }
}

/// Flag artifacts keyed by flag name.
///
/// `Clone` is a deep copy: every artifact owns its traces, so a clone can be
/// mutated without affecting the original.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagArtifacts {
    artifacts: BTreeMap<String, FlagArtifact>,
}

impl FlagArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, artifact: FlagArtifact) {
        self.artifacts.insert(artifact.name().to_string(), artifact);
    }

    pub fn get(&self, name: &str) -> Option<&FlagArtifact> {
        self.artifacts.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FlagArtifact> {
        self.artifacts.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.artifacts.contains_key(name)
    }

    /// Flag names in sorted order.
    pub fn sorted_flag_names(&self) -> Vec<String> {
        self.artifacts.keys().cloned().collect()
    }

    /// Artifacts in flag-name order.
    pub fn iter(&self) -> impl Iterator<Item = &FlagArtifact> {
        self.artifacts.values()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
