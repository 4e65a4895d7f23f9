//! Messages exchanged with the generation engine.
//!
//! On the wire every message is adjacently tagged:
//! `{"port": "<channel>", "payload": <payload>}`.
//!
//! | Direction     | Port               | Payload             |
//! |---------------|--------------------|---------------------|
//! | host → engine | `add`              | [`InputRecord`]     |
//! | host → engine | `noMoreInputFiles` | number of records   |
//! | host → engine | `effectsPerformed` | owning file path    |
//! | engine → host | `show`             | [`DisplayMessage`]s |
//! | engine → host | `performEffect`    | [`EffectRequest`]   |
//! | engine → host | `writeFiles`       | [`GeneratedFile`]s  |
//! | engine → host | `terminate`        | any reason value    |

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entities::{document::InputRecord, effect::EffectRequest, output::GeneratedFile};

/// Host → engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", content = "payload", rename_all = "camelCase")]
pub enum HostMessage {
    Add(InputRecord),
    NoMoreInputFiles(usize),
    EffectsPerformed(String),
}

/// Engine → host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", content = "payload", rename_all = "camelCase")]
pub enum EngineMessage {
    Show(Vec<DisplayMessage>),
    PerformEffect(EffectRequest),
    WriteFiles(Vec<GeneratedFile>),
    Terminate(Value),
}

impl EngineMessage {
    /// Human-readable form of a `terminate` payload.
    pub fn describe_reason(reason: &Value) -> String {
        match reason {
            Value::String(s) => s.clone(),
            Value::Null => "no reason given".to_string(),
            other => other.to_string(),
        }
    }
}

/// An advisory message the engine wants shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub level: DisplayLevel,
    pub message: String,
}

impl DisplayMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: DisplayLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: DisplayLevel::Success,
            message: message.into(),
        }
    }
}

/// Level of a [`DisplayMessage`]. Levels other than `info` and `success`
/// are carried through as [`DisplayLevel::Other`] and not rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayLevel {
    Info,
    Success,
    Other(String),
}

impl From<String> for DisplayLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "info" => Self::Info,
            "success" => Self::Success,
            _ => Self::Other(s),
        }
    }
}

impl From<DisplayLevel> for String {
    fn from(level: DisplayLevel) -> Self {
        level.to_string()
    }
}

impl fmt::Display for DisplayLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Success => f.write_str("success"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// The single startup parameter handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineFlags {
    pub path_sep: String,
}

impl EngineFlags {
    /// Flags describing the running host.
    pub fn for_host() -> Self {
        Self {
            path_sep: std::path::MAIN_SEPARATOR.to_string(),
        }
    }
}
