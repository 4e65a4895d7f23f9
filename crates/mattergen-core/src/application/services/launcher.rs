//! Engine launch: lay out a private workspace, compile the engine and start it.

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{CompileJob, Compiler, EngineHandle, EngineLoader, Filesystem},
        workspace::Workspace,
    },
    domain::{BuildConfig, EngineFlags, Manifest},
    error::{CoreError, CoreResult},
};

const WORKSPACE_PREFIX: &str = "mattergen-";

/// A running engine plus the workspace it was built in.
///
/// The workspace must outlive the engine, so the two travel together.
pub struct LaunchedEngine {
    pub workspace: Workspace,
    pub handle: EngineHandle,
}

pub struct EngineLauncher<'a> {
    config: &'a BuildConfig,
    filesystem: &'a dyn Filesystem,
    compiler: &'a dyn Compiler,
    loader: &'a dyn EngineLoader,
}

impl<'a> EngineLauncher<'a> {
    pub fn new(
        config: &'a BuildConfig,
        filesystem: &'a dyn Filesystem,
        compiler: &'a dyn Compiler,
        loader: &'a dyn EngineLoader,
    ) -> Self {
        Self {
            config,
            filesystem,
            compiler,
            loader,
        }
    }

    /// Build the engine against `manifest` in a fresh workspace and load it.
    #[instrument(skip_all)]
    pub async fn launch(&self, manifest: &Manifest) -> CoreResult<LaunchedEngine> {
        let workspace = self.filesystem.create_workspace(WORKSPACE_PREFIX)?;
        debug!(workspace = %workspace.root().display(), "Workspace created");

        self.prepare(&workspace, manifest)?;

        let job = CompileJob {
            working_dir: workspace.engine_dir(),
            entry: self.config.engine.entry.clone(),
            artifact: workspace.artifact_path(),
        };
        self.compiler.compile(&job).map_err(build_failed)?;
        info!(artifact = %job.artifact.display(), "Engine compiled");

        let handle = self
            .loader
            .load(&job.artifact, &EngineFlags::for_host())
            .await
            .map_err(build_failed)?;

        Ok(LaunchedEngine { workspace, handle })
    }

    /// Copy engine sources, merged manifest, support library and the host
    /// entry document into the workspace.
    fn prepare(&self, workspace: &Workspace, manifest: &Manifest) -> CoreResult<()> {
        let engine = &self.config.engine;
        let engine_root = self.config.engine_root();
        let engine_dir = workspace.engine_dir();

        self.filesystem.copy_dir(
            &engine_root.join(&engine.program_dir),
            &engine_dir.join(&engine.program_dir),
        )?;
        self.filesystem
            .write_file(&engine_dir.join(&engine.manifest), &manifest.to_json_pretty())?;

        if let Some(library) = &engine.library_dir {
            let library = engine_root.join(library);
            if self.filesystem.exists(&library) {
                self.filesystem.copy_dir(&library, &workspace.host_src_dir())?;
            }
        }

        let entry = self.config.entry_document_path();
        if !self.filesystem.exists(&entry) {
            return Err(ApplicationError::EngineBuildFailed {
                reason: format!("entry document not found: {}", entry.display()),
            }
            .into());
        }
        self.filesystem.copy_file(
            &entry,
            &workspace.host_src_dir().join(&self.config.entry_document),
        )
    }
}

fn build_failed(err: CoreError) -> CoreError {
    match err {
        CoreError::Application(ApplicationError::EngineBuildFailed { .. }) => err,
        other => ApplicationError::EngineBuildFailed {
            reason: other.to_string(),
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockCompiler, MockFilesystem};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLoader {
        loaded: Mutex<Vec<(PathBuf, EngineFlags)>>,
    }

    #[async_trait]
    impl EngineLoader for RecordingLoader {
        async fn load(&self, artifact: &Path, flags: &EngineFlags) -> CoreResult<EngineHandle> {
            self.loaded
                .lock()
                .unwrap()
                .push((artifact.to_path_buf(), flags.clone()));
            let (sender, _) = tokio::sync::mpsc::unbounded_channel();
            let (_, receiver) = tokio::sync::mpsc::unbounded_channel();
            Ok(EngineHandle::new(sender, receiver))
        }
    }

    fn manifest() -> Manifest {
        Manifest::parse(r#"{ "dependencies": { "direct": { "a/b": "1.0.0" }, "indirect": {} } }"#)
            .unwrap()
    }

    fn workspace_filesystem() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_create_workspace()
            .times(1)
            .returning(|_| Ok(Workspace::at("/ws")));
        fs.expect_copy_dir().returning(|_, _| Ok(()));
        fs.expect_write_file().returning(|_, _| Ok(()));
        fs.expect_copy_file().returning(|_, _| Ok(()));
        fs
    }

    #[tokio::test]
    async fn lays_out_workspace_then_compiles_and_loads() {
        let cfg = BuildConfig::new("/site");
        let mut fs = workspace_filesystem();
        fs.expect_exists().returning(|_| true);
        let mut compiler = MockCompiler::new();
        compiler
            .expect_compile()
            .withf(|job| {
                job.working_dir == Path::new("/ws/engine")
                    && job.entry == Path::new("src/Main.elm")
                    && job.artifact == Path::new("/ws/engine.js")
            })
            .times(1)
            .returning(|_| Ok(()));
        let loader = RecordingLoader::default();

        let launched = EngineLauncher::new(&cfg, &fs, &compiler, &loader)
            .launch(&manifest())
            .await
            .unwrap();

        assert_eq!(launched.workspace.root(), Path::new("/ws"));
        let loaded = loader.loaded.lock().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, PathBuf::from("/ws/engine.js"));
        assert_eq!(loaded[0].1, EngineFlags::for_host());
    }

    #[tokio::test]
    async fn compiler_failure_stops_before_loading() {
        let cfg = BuildConfig::new("/site");
        let mut fs = workspace_filesystem();
        fs.expect_exists().returning(|_| true);
        let mut compiler = MockCompiler::new();
        compiler.expect_compile().returning(|_| {
            Err(CoreError::Internal {
                message: "compiler exited with status 1".into(),
            })
        });
        let loader = RecordingLoader::default();

        let result = EngineLauncher::new(&cfg, &fs, &compiler, &loader)
            .launch(&manifest())
            .await;

        assert!(matches!(
            result,
            Err(CoreError::Application(ApplicationError::EngineBuildFailed { .. }))
        ));
        assert!(loader.loaded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_entry_document_fails_the_build() {
        let cfg = BuildConfig::new("/site");
        let mut fs = workspace_filesystem();
        fs.expect_exists()
            .returning(|path| path != Path::new("/site/src/Content.elm"));
        let mut compiler = MockCompiler::new();
        compiler.expect_compile().never();
        let loader = RecordingLoader::default();

        let result = EngineLauncher::new(&cfg, &fs, &compiler, &loader)
            .launch(&manifest())
            .await;

        match result {
            Err(CoreError::Application(ApplicationError::EngineBuildFailed { reason })) => {
                assert!(reason.contains("Content.elm"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected failure"),
        }
    }
}
