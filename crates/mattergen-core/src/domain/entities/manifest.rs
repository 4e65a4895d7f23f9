use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DomainError;

const DEPENDENCIES: &str = "dependencies";
const DIRECT: &str = "direct";
const INDIRECT: &str = "indirect";

/// Dependency name → version (or version constraint).
pub type VersionMap = BTreeMap<String, String>;

/// A project manifest (`elm.json`-style JSON document).
///
/// Only the `dependencies` section is interpreted; every other field is kept
/// verbatim so a merged manifest differs from its source in that section only.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    document: Map<String, Value>,
}

/// The `dependencies` section of an application manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    pub direct: VersionMap,
    pub indirect: VersionMap,
}

/// One extra constraint passed to the solver, rendered as `name@constraint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: String,
    pub version: String,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// Concrete versions chosen by the solver for every dependency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedVersions(pub VersionMap);

impl Manifest {
    /// Parse a manifest document. The top level must be a JSON object.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DomainError::MalformedManifest {
                reason: e.to_string(),
            })?;

        match value {
            Value::Object(document) => Ok(Self { document }),
            other => Err(DomainError::MalformedManifest {
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// The direct dependency set, or `None` if the section is absent.
    pub fn direct(&self) -> Option<VersionMap> {
        self.section(DIRECT)
    }

    /// The indirect (derived) dependency set; empty when absent.
    pub fn indirect(&self) -> VersionMap {
        self.section(INDIRECT).unwrap_or_default()
    }

    /// Direct dependencies of an application manifest.
    ///
    /// A missing or empty `dependencies.direct` section means this is not an
    /// application manifest.
    pub fn require_direct(&self) -> Result<VersionMap, DomainError> {
        match self.direct() {
            Some(direct) if !direct.is_empty() => Ok(direct),
            _ => Err(DomainError::MissingDirectDependencies),
        }
    }

    /// Extra solver constraints pinning every direct dependency.
    pub fn direct_constraints(&self) -> Result<Vec<Constraint>, DomainError> {
        Ok(self
            .require_direct()?
            .into_iter()
            .map(|(name, version)| Constraint { name, version })
            .collect())
    }

    /// Replace the `dependencies` section, leaving every other field intact.
    pub fn with_dependencies(mut self, dependencies: &Dependencies) -> Self {
        let mut section = Map::new();
        section.insert(DIRECT.into(), to_object(&dependencies.direct));
        section.insert(INDIRECT.into(), to_object(&dependencies.indirect));
        self.document
            .insert(DEPENDENCIES.into(), Value::Object(section));
        self
    }

    /// Pretty-printed JSON, with a trailing newline.
    pub fn to_json_pretty(&self) -> String {
        let mut text = serde_json::to_string_pretty(&self.document)
            .unwrap_or_else(|_| String::from("{}"));
        text.push('\n');
        text
    }

    fn section(&self, key: &str) -> Option<VersionMap> {
        let section = self.document.get(DEPENDENCIES)?.as_object()?.get(key)?;
        let entries = section.as_object()?;
        Some(
            entries
                .iter()
                .filter_map(|(name, v)| v.as_str().map(|v| (name.clone(), v.to_string())))
                .collect(),
        )
    }
}

impl Dependencies {
    /// Split resolved versions into direct and indirect sets.
    ///
    /// Names in `direct_names` become direct; everything else the solver
    /// pinned is indirect.
    pub fn partition(resolved: &ResolvedVersions, direct_names: &BTreeSet<String>) -> Self {
        let (direct, indirect) = resolved
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .partition(|(name, _)| direct_names.contains(name));
        Self { direct, indirect }
    }
}

fn to_object(map: &VersionMap) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
