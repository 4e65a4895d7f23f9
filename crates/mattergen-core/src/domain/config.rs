//! Build configuration, threaded explicitly into every component.

use std::path::{Path, PathBuf};

/// Everything one build needs to know about the host project and the engine.
///
/// Relative paths are interpreted against `project_root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub project_root: PathBuf,
    /// Directory scanned for documents.
    pub input_dir: PathBuf,
    /// Glob matched against paths relative to `input_dir`.
    pub input_glob: String,
    /// Host source directory receiving generated modules.
    pub source_dir: PathBuf,
    /// Module directory below `source_dir` that a commit replaces.
    pub content_module: String,
    /// Host document handed to the engine build, relative to `source_dir`.
    pub entry_document: PathBuf,
    /// Host manifest, relative to `project_root`.
    pub host_manifest: PathBuf,
    pub engine: EngineLayout,
    /// Skip the overwrite confirmation.
    pub assume_yes: bool,
}

/// Where the engine's sources live and how they are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineLayout {
    pub root: PathBuf,
    /// Program sources below `root`, copied to `<workspace>/engine/<program_dir>`.
    pub program_dir: PathBuf,
    /// Optional support library below `root`, copied to `<workspace>/src`.
    pub library_dir: Option<PathBuf>,
    /// Engine manifest file name below `root`.
    pub manifest: PathBuf,
    /// Entry source, relative to the engine build directory.
    pub entry: PathBuf,
}

impl Default for EngineLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("engine"),
            program_dir: PathBuf::from("src"),
            library_dir: Some(PathBuf::from("lib")),
            manifest: PathBuf::from("elm.json"),
            entry: PathBuf::from("src/Main.elm"),
        }
    }
}

impl BuildConfig {
    /// Defaults for a project rooted at `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            input_dir: PathBuf::from("content"),
            input_glob: "**/*.md".to_string(),
            source_dir: PathBuf::from("src"),
            content_module: "Content".to_string(),
            entry_document: PathBuf::from("Content.elm"),
            host_manifest: PathBuf::from("elm.json"),
            engine: EngineLayout::default(),
            assume_yes: false,
        }
    }

    pub fn with_engine(mut self, engine: EngineLayout) -> Self {
        self.engine = engine;
        self
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn input_root(&self) -> PathBuf {
        self.project_root.join(&self.input_dir)
    }

    pub fn source_root(&self) -> PathBuf {
        self.project_root.join(&self.source_dir)
    }

    /// The directory a commit empties and refills.
    pub fn content_dir(&self) -> PathBuf {
        self.source_root().join(&self.content_module)
    }

    pub fn host_manifest_path(&self) -> PathBuf {
        self.project_root.join(&self.host_manifest)
    }

    pub fn entry_document_path(&self) -> PathBuf {
        self.source_root().join(&self.entry_document)
    }

    /// Engine root; relative roots resolve against the project.
    pub fn engine_root(&self) -> PathBuf {
        self.project_path(&self.engine.root)
    }

    pub fn engine_manifest_path(&self) -> PathBuf {
        self.engine_root().join(&self.engine.manifest)
    }

    /// Resolve a project-relative path; absolute paths pass through.
    pub fn project_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.project_root.join(path)
    }
}
