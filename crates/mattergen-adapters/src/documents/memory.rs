use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mattergen_core::{
    application::{ApplicationError, ports::DocumentSource},
    domain::InputRecord,
    error::CoreResult,
};

use super::front_matter::parse_front_matter;

/// In-memory documents for testing, discovered in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentSource {
    root: PathBuf,
    documents: Vec<(PathBuf, String)>,
}

impl MemoryDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            documents: Vec::new(),
        }
    }

    /// Add a document at `relative` (to the root).
    pub fn with_document(mut self, relative: impl AsRef<Path>, text: impl Into<String>) -> Self {
        self.documents
            .push((self.root.join(relative), text.into()));
        self
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    fn discover(&self) -> CoreResult<Vec<PathBuf>> {
        Ok(self.documents.iter().map(|(path, _)| path.clone()).collect())
    }

    async fn load(&self, path: &Path) -> CoreResult<InputRecord> {
        let load_error = |reason: String| ApplicationError::DocumentLoad {
            path: path.to_path_buf(),
            reason,
        };

        let (_, text) = self
            .documents
            .iter()
            .find(|(p, _)| p == path)
            .ok_or_else(|| load_error("no such document".into()))?;
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|e| load_error(e.to_string()))?;
        let front_matter = parse_front_matter(text).map_err(|e| load_error(e.to_string()))?;

        Ok(InputRecord::new(relative.to_string_lossy(), front_matter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn discovers_in_insertion_order_and_parses() {
        let source = MemoryDocumentSource::new("/site/content")
            .with_document("z.md", "---\ntitle: Z\n---\n")
            .with_document("a.md", "plain");

        let paths = source.discover().unwrap();
        assert_eq!(paths[0], PathBuf::from("/site/content/z.md"));

        let record = source.load(&paths[0]).await.unwrap();
        assert_eq!(record.file_path, "z.md");
        assert_eq!(record.file_frontmatter.data["title"], "Z");
    }
}
