use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A side effect the engine wants performed for one of its files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectRequest {
    /// Owning file; echoed back on `effectsPerformed`.
    pub file_path: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// One step of an [`EffectRequest`]: a handler name plus opaque arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Registered handler capability name (e.g. `image`).
    pub with: String,
    #[serde(default)]
    pub args: Value,
}

impl Action {
    pub fn new(with: impl Into<String>, args: Value) -> Self {
        Self {
            with: with.into(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_wire_shape() {
        let req: EffectRequest = serde_json::from_value(json!({
            "filePath": "blog/first.md",
            "actions": [{ "with": "image", "args": { "paths": {} } }]
        }))
        .unwrap();
        assert_eq!(req.file_path, "blog/first.md");
        assert_eq!(req.actions[0].with, "image");
    }

    #[test]
    fn missing_actions_default_to_empty() {
        let req: EffectRequest =
            serde_json::from_value(json!({ "filePath": "a.md" })).unwrap();
        assert!(req.actions.is_empty());
    }
}
