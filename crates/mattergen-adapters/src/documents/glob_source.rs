use std::path::{Path, PathBuf};

use async_trait::async_trait;
use globset::{Glob, GlobMatcher};
use mattergen_core::{
    application::{ApplicationError, ports::DocumentSource},
    domain::{BuildConfig, InputRecord},
    error::{CoreError, CoreResult},
};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use super::front_matter::parse_front_matter;

/// Finds documents under an input root by glob and reads them from disk.
///
/// Discovery order is sorted by path, so repeated builds send records in
/// the same order. Symbolic links are followed; a linked document is
/// reported under its link path.
#[derive(Debug, Clone)]
pub struct GlobDocumentSource {
    root: PathBuf,
    matcher: GlobMatcher,
}

impl GlobDocumentSource {
    pub fn new(root: impl Into<PathBuf>, pattern: &str) -> CoreResult<Self> {
        let glob = Glob::new(pattern).map_err(|e| {
            CoreError::from(ApplicationError::InvalidInputGlob {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(Self {
            root: root.into(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn from_config(config: &BuildConfig) -> CoreResult<Self> {
        Self::new(config.input_root(), &config.input_glob)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load_error(path: &Path, reason: impl ToString) -> CoreError {
        ApplicationError::DocumentLoad {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl DocumentSource for GlobDocumentSource {
    #[instrument(skip_all, fields(root = %self.root.display()))]
    fn discover(&self) -> CoreResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            warn!("Input directory does not exist, no documents to process");
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name() {
            let entry = entry.map_err(|e| Self::load_error(&self.root, e))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if self.matcher.is_match(relative) {
                found.push(entry.path().to_path_buf());
            }
        }

        debug!(count = found.len(), "Documents discovered");
        Ok(found)
    }

    async fn load(&self, path: &Path) -> CoreResult<InputRecord> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Self::load_error(path, e))?;
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| Self::load_error(path, "outside the input directory"))?;
        let front_matter = parse_front_matter(&text).map_err(|e| Self::load_error(path, e))?;

        Ok(InputRecord::new(relative.to_string_lossy(), front_matter))
    }
}
