//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what a build needs from external systems.
//! The `mattergen-adapters` crate provides implementations.

use std::any::Any;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::application::workspace::Workspace;
use crate::domain::{
    BuildConfig, Constraint, DisplayMessage, EngineFlags, EngineMessage, HostMessage, InputRecord,
    ResolvedVersions,
};
use crate::error::CoreResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `mattergen_adapters::filesystem::LocalFilesystem` (production)
/// - `mattergen_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> CoreResult<()>;

    /// Write content to a file, creating parent directories.
    fn write_file(&self, path: &Path, content: &str) -> CoreResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> CoreResult<String>;

    /// Copy one file, creating the destination's parent directories.
    fn copy_file(&self, from: &Path, to: &Path) -> CoreResult<()>;

    /// Recursively copy the contents of `from` into `to`, merging with
    /// whatever `to` already holds.
    fn copy_dir(&self, from: &Path, to: &Path) -> CoreResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove everything inside `path`; create it if missing.
    fn empty_dir(&self, path: &Path) -> CoreResult<()>;

    /// Create a fresh private workspace for one build.
    fn create_workspace(&self, prefix: &str) -> CoreResult<Workspace>;
}

/// Port for the external constraint solver.
///
/// A synchronous call: resolution happens before anything else in a build.
#[cfg_attr(test, mockall::automock)]
pub trait DependencySolver: Send + Sync {
    /// Solve `manifest` with `extra` constraints added.
    fn solve(&self, extra: &[Constraint], manifest: &Path) -> CoreResult<ResolvedVersions>;
}

/// One compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileJob {
    /// Directory the compiler runs in.
    pub working_dir: PathBuf,
    /// Entry source, relative to `working_dir`.
    pub entry: PathBuf,
    /// Where the single output artifact goes.
    pub artifact: PathBuf,
}

/// Port for the external compiler that builds the engine.
#[cfg_attr(test, mockall::automock)]
pub trait Compiler: Send + Sync {
    fn compile(&self, job: &CompileJob) -> CoreResult<()>;
}

/// Live connection to a running engine.
///
/// Owns both channel ends plus an opaque guard that keeps adapter resources
/// (child process, pump tasks) alive; dropping the handle tears them down.
pub struct EngineHandle {
    sender: UnboundedSender<HostMessage>,
    receiver: UnboundedReceiver<EngineMessage>,
    guard: EngineGuard,
}

/// Keeps whatever backs an engine alive until dropped.
#[derive(Default)]
pub struct EngineGuard(Option<Box<dyn Any + Send>>);

impl EngineHandle {
    pub fn new(
        sender: UnboundedSender<HostMessage>,
        receiver: UnboundedReceiver<EngineMessage>,
    ) -> Self {
        Self {
            sender,
            receiver,
            guard: EngineGuard::default(),
        }
    }

    pub fn with_guard(mut self, guard: impl Any + Send) -> Self {
        self.guard = EngineGuard(Some(Box::new(guard)));
        self
    }

    pub fn into_parts(
        self,
    ) -> (
        UnboundedSender<HostMessage>,
        UnboundedReceiver<EngineMessage>,
        EngineGuard,
    ) {
        (self.sender, self.receiver, self.guard)
    }
}

/// Port for loading a compiled engine artifact.
///
/// Implemented by:
/// - `mattergen_adapters::engine::ProcessEngineLoader` (child process, JSON lines)
/// - `mattergen_adapters::engine::InProcessEngineLoader` (tokio task, testing)
#[async_trait]
pub trait EngineLoader: Send + Sync {
    async fn load(&self, artifact: &Path, flags: &EngineFlags) -> CoreResult<EngineHandle>;
}

/// Port for discovering and reading input documents.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Document locations, in discovery order.
    fn discover(&self) -> CoreResult<Vec<PathBuf>>;

    /// Read and parse one discovered document.
    async fn load(&self, path: &Path) -> CoreResult<InputRecord>;
}

/// A named side-effect plugin (e.g. `image`).
#[async_trait]
pub trait EffectHandler: Send + Sync {
    /// Capability name matched against `Action::with`.
    fn name(&self) -> &str;

    async fn perform(&self, config: &BuildConfig, args: &Value) -> CoreResult<()>;
}

/// Port for the overwrite confirmation.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer: Send + Sync {
    /// Ask whether `target` may be overwritten.
    fn confirm(&self, target: &Path) -> CoreResult<bool>;
}

/// Port for the post-commit formatting pass.
#[cfg_attr(test, mockall::automock)]
pub trait Formatter: Send + Sync {
    fn format(&self, dir: &Path) -> CoreResult<()>;
}

/// Port for rendering the engine's advisory messages.
pub trait DisplaySink: Send + Sync {
    fn show(&self, message: &DisplayMessage);
}
