//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use mattergen_core::{
    application::{ApplicationError, Workspace, ports::Filesystem},
    error::CoreResult,
};

const WORKSPACE_ROOT: &str = "/memory/tmp";

/// In-memory filesystem for testing.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the service owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    workspaces: usize,
}

impl MemoryFilesystemInner {
    fn add_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn put(&mut self, path: &Path, content: String) {
        if let Some(parent) = path.parent() {
            self.add_dirs(parent);
        }
        self.files.insert(path.to_path_buf(), content);
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.put(path.as_ref(), content.into());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Files below `dir`, relative to it, sorted.
    pub fn files_under(&self, dir: impl AsRef<Path>) -> Vec<PathBuf> {
        let dir = dir.as_ref();
        self.inner
            .read()
            .map(|inner| {
                inner
                    .files
                    .keys()
                    .filter_map(|p| p.strip_prefix(dir).ok().map(Path::to_path_buf))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of workspaces handed out so far.
    pub fn workspaces_created(&self) -> usize {
        self.inner.read().map(|inner| inner.workspaces).unwrap_or(0)
    }

    fn read(&self) -> CoreResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn write(&self) -> CoreResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> CoreResult<()> {
        self.write()?.add_dirs(path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> CoreResult<()> {
        self.write()?.put(path, content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> CoreResult<String> {
        self.read()?.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn copy_file(&self, from: &Path, to: &Path) -> CoreResult<()> {
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)
    }

    fn copy_dir(&self, from: &Path, to: &Path) -> CoreResult<()> {
        let mut inner = self.write()?;
        if !inner.directories.contains(from) {
            return Err(ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "No such directory".into(),
            }
            .into());
        }

        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|d| d.strip_prefix(from).ok().map(|rel| to.join(rel)))
            .collect();
        let files: Vec<(PathBuf, String)> = inner
            .files
            .iter()
            .filter_map(|(p, c)| p.strip_prefix(from).ok().map(|rel| (to.join(rel), c.clone())))
            .collect();

        for dir in dirs {
            inner.add_dirs(&dir);
        }
        for (path, content) in files {
            inner.put(&path, content);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn empty_dir(&self, path: &Path) -> CoreResult<()> {
        let mut inner = self.write()?;
        inner.files.retain(|p, _| !p.starts_with(path));
        inner
            .directories
            .retain(|d| d == path || !d.starts_with(path));
        inner.add_dirs(path);
        Ok(())
    }

    fn create_workspace(&self, prefix: &str) -> CoreResult<Workspace> {
        let mut inner = self.write()?;
        inner.workspaces += 1;
        let root = Path::new(WORKSPACE_ROOT).join(format!("{}{}", prefix, inner.workspaces));
        inner.add_dirs(&root);
        Ok(Workspace::at(root))
    }
}
