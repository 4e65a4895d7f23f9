//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use mattergen_core::{
    application::{ApplicationError, Workspace, ports::Filesystem},
    error::{CoreError, CoreResult},
};
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> CoreResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> CoreResult<()> {
        ensure_parent(path)?;
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> CoreResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> CoreResult<()> {
        ensure_parent(to)?;
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn copy_dir(&self, from: &Path, to: &Path) -> CoreResult<()> {
        for entry in WalkDir::new(from) {
            let entry = entry.map_err(|e| CoreError::from(ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: format!("Failed to walk directory: {}", e),
            }))?;
            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| CoreError::Internal {
                    message: format!("walked outside {}: {}", from.display(), e),
                })?;
            let target = to.join(relative);

            if entry.file_type().is_dir() {
                self.create_dir_all(&target)?;
            } else {
                std::fs::copy(entry.path(), &target)
                    .map_err(|e| map_io_error(entry.path(), e, "copy file"))?;
            }
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn empty_dir(&self, path: &Path) -> CoreResult<()> {
        if !path.exists() {
            return self.create_dir_all(path);
        }
        let entries = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "read directory"))?;
            let child = entry.path();
            let result = if child.is_dir() {
                std::fs::remove_dir_all(&child)
            } else {
                std::fs::remove_file(&child)
            };
            result.map_err(|e| map_io_error(&child, e, "remove"))?;
        }
        Ok(())
    }

    fn create_workspace(&self, prefix: &str) -> CoreResult<Workspace> {
        Workspace::temporary(prefix).map_err(|e| map_io_error(&std::env::temp_dir(), e, "create workspace"))
    }
}

fn ensure_parent(path: &Path) -> CoreResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| map_io_error(parent, e, "create directory")),
        _ => Ok(()),
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> CoreError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
