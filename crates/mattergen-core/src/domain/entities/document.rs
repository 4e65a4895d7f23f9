use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed document: front-matter data plus the body that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Front-matter fields. An empty object when the document has none.
    pub data: Value,
    /// Everything after the closing delimiter.
    pub content: String,
}

impl FrontMatter {
    /// A document without front-matter.
    pub fn body_only(content: impl Into<String>) -> Self {
        Self {
            data: Value::Object(Default::default()),
            content: content.into(),
        }
    }
}

/// One discovered input document, as sent to the engine on `add`.
///
/// `file_path` is relative to the configured input root and uses the host's
/// path separator; the engine is told which separator at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub file_path: String,
    pub file_frontmatter: FrontMatter,
}

impl InputRecord {
    pub fn new(file_path: impl Into<String>, front_matter: FrontMatter) -> Self {
        Self {
            file_path: file_path.into(),
            file_frontmatter: front_matter,
        }
    }
}
