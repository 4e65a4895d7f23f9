//! Per-build private directory.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Scratch space owned by exactly one build.
///
/// A temporary workspace is removed from disk when dropped, so an aborted
/// build leaves nothing behind.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    _dir: Option<TempDir>,
}

impl Workspace {
    /// Create a fresh directory under the system temp dir.
    pub fn temporary(prefix: &str) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        Ok(Self {
            root: dir.path().to_path_buf(),
            _dir: Some(dir),
        })
    }

    /// Use an existing location; nothing is removed on drop.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            _dir: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Engine build tree; the compiler runs here.
    pub fn engine_dir(&self) -> PathBuf {
        self.root.join("engine")
    }

    /// Library and host entry document, next to the engine tree.
    pub fn host_src_dir(&self) -> PathBuf {
        self.root.join("src")
    }

    /// The compiled engine.
    pub fn artifact_path(&self) -> PathBuf {
        self.root.join("engine.js")
    }

    /// Generated files land here before a commit.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join("output")
    }
}
