//! Staging and commit of generated output.
//!
//! Output is first written below the workspace; only a confirmed commit
//! touches the host source tree.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Confirmer, Filesystem, Formatter},
        workspace::Workspace,
    },
    domain::{BuildConfig, OutputSet},
    error::CoreResult,
};

/// Output written to the staging directory, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedOutput {
    root: PathBuf,
    files: usize,
}

impl StagedOutput {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file_count(&self) -> usize {
        self.files
    }
}

pub struct StagingArea<'a> {
    filesystem: &'a dyn Filesystem,
    root: PathBuf,
}

impl<'a> StagingArea<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, workspace: &Workspace) -> Self {
        Self {
            filesystem,
            root: workspace.staging_dir(),
        }
    }

    /// Write every generated file below the staging root.
    #[instrument(skip_all, fields(files = output.len()))]
    pub fn stage(&self, output: &OutputSet) -> CoreResult<StagedOutput> {
        self.filesystem.create_dir_all(&self.root)?;
        for (path, contents) in output.files() {
            self.filesystem.write_file(&self.root.join(path), contents)?;
        }

        Ok(StagedOutput {
            root: self.root.clone(),
            files: output.len(),
        })
    }
}

/// What a successful commit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReport {
    /// The content directory that was replaced.
    pub target: PathBuf,
    pub files_written: usize,
    /// `false` when the formatter failed; the files are committed regardless.
    pub formatted: bool,
}

pub struct Committer<'a> {
    config: &'a BuildConfig,
    filesystem: &'a dyn Filesystem,
    confirmer: &'a dyn Confirmer,
    formatter: &'a dyn Formatter,
}

impl<'a> Committer<'a> {
    pub fn new(
        config: &'a BuildConfig,
        filesystem: &'a dyn Filesystem,
        confirmer: &'a dyn Confirmer,
        formatter: &'a dyn Formatter,
    ) -> Self {
        Self {
            config,
            filesystem,
            confirmer,
            formatter,
        }
    }

    /// Replace the content directory with the staged tree.
    ///
    /// Asks for confirmation unless the build is pre-authorized. Declining
    /// leaves the target untouched. The content directory is emptied, then
    /// the staged tree is copied into the source directory; this is not
    /// atomic.
    #[instrument(skip_all, fields(target = %self.config.content_dir().display()))]
    pub fn commit(&self, staged: &StagedOutput) -> CoreResult<CommitReport> {
        let target = self.config.content_dir();

        if !self.config.assume_yes && !self.confirmer.confirm(&target)? {
            info!("Commit declined");
            return Err(ApplicationError::UserCancelled.into());
        }

        self.filesystem.empty_dir(&target)?;
        self.filesystem
            .copy_dir(staged.root(), &self.config.source_root())?;
        info!(files = staged.file_count(), "Output committed");

        let formatted = match self.formatter.format(&target) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Formatter failed, keeping unformatted output");
                false
            }
        };

        Ok(CommitReport {
            target,
            files_written: staged.file_count(),
            formatted,
        })
    }
}
