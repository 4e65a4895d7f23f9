//! Build Service - main application orchestrator.
//!
//! This service coordinates one content build:
//! 1. Resolve the engine manifest against the host's dependencies
//! 2. Discover input documents
//! 3. Compile and start the engine in a private workspace
//! 4. Run the message exchange
//! 5. Stage the generated files and commit them on confirmation
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::{
    bridge::{DEFAULT_LOAD_CONCURRENCY, MessageBridge},
    effects::{EffectExecutor, HandlerRegistry},
    launcher::EngineLauncher,
    resolver::DependencyResolver,
    staging::{Committer, StagingArea},
};
use crate::{
    application::{
        ApplicationError,
        ports::{
            Compiler, Confirmer, DependencySolver, DisplaySink, DocumentSource, EngineLoader,
            Filesystem, Formatter,
        },
    },
    domain::BuildConfig,
    error::CoreResult,
};

/// Summary of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub build_id: Uuid,
    /// The content directory that now holds the output.
    pub target: PathBuf,
    pub inputs: usize,
    pub effects_performed: usize,
    pub files_written: usize,
    pub formatted: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BuildReport {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Main build service.
///
/// Owns the adapters; every build gets its own workspace, engine and
/// staging area.
pub struct BuildService {
    config: BuildConfig,
    filesystem: Arc<dyn Filesystem>,
    solver: Arc<dyn DependencySolver>,
    compiler: Arc<dyn Compiler>,
    engine_loader: Arc<dyn EngineLoader>,
    documents: Arc<dyn DocumentSource>,
    confirmer: Arc<dyn Confirmer>,
    formatter: Arc<dyn Formatter>,
    display: Arc<dyn DisplaySink>,
    handlers: HandlerRegistry,
    load_concurrency: usize,
}

impl BuildService {
    pub fn builder(config: BuildConfig) -> BuildServiceBuilder {
        BuildServiceBuilder::new(config)
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Run one build end to end.
    pub async fn build(&self) -> CoreResult<BuildReport> {
        let build_id = Uuid::new_v4();
        let span = info_span!(
            "build",
            %build_id,
            project = %self.config.project_root.display()
        );
        self.run(build_id).instrument(span).await
    }

    async fn run(&self, build_id: Uuid) -> CoreResult<BuildReport> {
        let started_at = Utc::now();
        info!("Starting content build");

        // 1. Resolve dependencies before anything touches disk
        let manifest =
            DependencyResolver::new(&self.config, &*self.filesystem, &*self.solver).resolve()?;

        // 2. Discover inputs
        let paths = self.documents.discover()?;
        info!(documents = paths.len(), "Input documents discovered");

        // 3. Launch engine
        let launched = EngineLauncher::new(
            &self.config,
            &*self.filesystem,
            &*self.compiler,
            &*self.engine_loader,
        )
        .launch(&manifest)
        .await?;

        // 4. Exchange messages
        let executor = EffectExecutor::new(&self.config, &self.handlers);
        let outcome = MessageBridge::new(&*self.documents, executor, &*self.display)
            .load_concurrency(self.load_concurrency)
            .run(launched.handle, paths)
            .await?;

        // 5. Stage, then commit
        let staged = StagingArea::new(&*self.filesystem, &launched.workspace).stage(&outcome.output)?;
        let commit = Committer::new(
            &self.config,
            &*self.filesystem,
            &*self.confirmer,
            &*self.formatter,
        )
        .commit(&staged)?;

        let finished_at = Utc::now();
        info!(files = commit.files_written, "Build completed successfully");

        Ok(BuildReport {
            build_id,
            target: commit.target,
            inputs: outcome.inputs_sent,
            effects_performed: outcome.effects_performed,
            files_written: commit.files_written,
            formatted: commit.formatted,
            started_at,
            finished_at,
        })
    }
}

/// Assembles a [`BuildService`] from adapters.
///
/// Every port except the effect handlers is required.
pub struct BuildServiceBuilder {
    config: BuildConfig,
    filesystem: Option<Arc<dyn Filesystem>>,
    solver: Option<Arc<dyn DependencySolver>>,
    compiler: Option<Arc<dyn Compiler>>,
    engine_loader: Option<Arc<dyn EngineLoader>>,
    documents: Option<Arc<dyn DocumentSource>>,
    confirmer: Option<Arc<dyn Confirmer>>,
    formatter: Option<Arc<dyn Formatter>>,
    display: Option<Arc<dyn DisplaySink>>,
    handlers: HandlerRegistry,
    load_concurrency: usize,
}

impl BuildServiceBuilder {
    fn new(config: BuildConfig) -> Self {
        Self {
            config,
            filesystem: None,
            solver: None,
            compiler: None,
            engine_loader: None,
            documents: None,
            confirmer: None,
            formatter: None,
            display: None,
            handlers: HandlerRegistry::new(),
            load_concurrency: DEFAULT_LOAD_CONCURRENCY,
        }
    }

    pub fn filesystem(mut self, filesystem: Arc<dyn Filesystem>) -> Self {
        self.filesystem = Some(filesystem);
        self
    }

    pub fn solver(mut self, solver: Arc<dyn DependencySolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    pub fn compiler(mut self, compiler: Arc<dyn Compiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn engine_loader(mut self, loader: Arc<dyn EngineLoader>) -> Self {
        self.engine_loader = Some(loader);
        self
    }

    pub fn documents(mut self, documents: Arc<dyn DocumentSource>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn confirmer(mut self, confirmer: Arc<dyn Confirmer>) -> Self {
        self.confirmer = Some(confirmer);
        self
    }

    pub fn formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn display(mut self, display: Arc<dyn DisplaySink>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn load_concurrency(mut self, n: usize) -> Self {
        self.load_concurrency = n;
        self
    }

    pub fn build(self) -> CoreResult<BuildService> {
        Ok(BuildService {
            filesystem: required(self.filesystem, "filesystem")?,
            solver: required(self.solver, "dependency solver")?,
            compiler: required(self.compiler, "compiler")?,
            engine_loader: required(self.engine_loader, "engine loader")?,
            documents: required(self.documents, "document source")?,
            confirmer: required(self.confirmer, "confirmer")?,
            formatter: required(self.formatter, "formatter")?,
            display: required(self.display, "display")?,
            handlers: self.handlers,
            load_concurrency: self.load_concurrency,
            config: self.config,
        })
    }
}

fn required<T>(value: Option<T>, name: &'static str) -> CoreResult<T> {
    value.ok_or_else(|| ApplicationError::AdapterNotConfigured { name }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFormatter;
    use crate::error::CoreError;

    #[test]
    fn builder_reports_first_missing_adapter() {
        let result = BuildService::builder(BuildConfig::new("."))
            .formatter(Arc::new(MockFormatter::new()))
            .build();

        match result {
            Err(CoreError::Application(ApplicationError::AdapterNotConfigured { name })) => {
                assert_eq!(name, "filesystem");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("builder accepted missing adapters"),
        }
    }

    #[test]
    fn report_elapsed_is_non_negative() {
        let now = Utc::now();
        let report = BuildReport {
            build_id: Uuid::new_v4(),
            target: PathBuf::from("/site/src/Content"),
            inputs: 0,
            effects_performed: 0,
            files_written: 0,
            formatted: true,
            started_at: now,
            finished_at: now + chrono::Duration::milliseconds(5),
        };
        assert_eq!(report.elapsed().num_milliseconds(), 5);
    }
}
