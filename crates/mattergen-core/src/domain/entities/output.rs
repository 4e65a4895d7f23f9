use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{DomainError, RelativePath};

/// One file produced by the engine, relative to the source directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFile {
    pub file_path: String,
    pub file_contents: String,
}

impl GeneratedFile {
    pub fn new(file_path: impl Into<String>, file_contents: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            file_contents: file_contents.into(),
        }
    }
}

/// The complete output of one build. Written all-or-nothing.
///
/// Construction validates every path, so an `OutputSet` never contains an
/// absolute path, a `..` escape or a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSet {
    files: Vec<(RelativePath, String)>,
}

impl OutputSet {
    pub fn new(files: Vec<GeneratedFile>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        let mut validated = Vec::with_capacity(files.len());

        for file in files {
            let path = RelativePath::try_new(file.file_path)?;
            if !seen.insert(path.clone()) {
                return Err(DomainError::DuplicatePath {
                    path: path.to_string(),
                });
            }
            validated.push((path, file.file_contents));
        }

        Ok(Self { files: validated })
    }

    pub fn files(&self) -> impl Iterator<Item = (&RelativePath, &str)> {
        self.files.iter().map(|(p, c)| (p, c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
